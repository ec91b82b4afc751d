use serde::Serialize;

use crate::parse::{self, SalaryEstimate};
use crate::site::RawListing;

/// Whether a headline salary figure comes from the employer or from the
/// platform's own estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EstimateType {
    Employer,
    Glassdoor,
}

/// Pay frequency of the average base salary shown on the salary tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PayPeriod {
    Hourly,
    Yearly,
}

/// One scraped job listing. Every field the page may not carry is an
/// explicit `Option`, so a legitimate zero or negative value can never be
/// confused with "not found".
#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub estimate_type: Option<EstimateType>,
    pub salary_lower: Option<i64>,
    pub salary_upper: Option<i64>,
    pub rating: Option<String>,
    pub base_salary: Option<f64>,
    pub base_salary_period: Option<PayPeriod>,
    pub year_founded: Option<i32>,
    pub years_active: Option<i32>,
    pub industry: Option<String>,
    pub sector: Option<String>,
    pub company_type: Option<String>,
    pub revenue: Option<String>,
    pub headquarters: Option<String>,
    pub size: Option<String>,
    pub description: Option<String>,
}

impl JobRecord {
    /// Compose a record from the raw texts one open listing yielded.
    ///
    /// `current_year` feeds the years-active derivation; callers pass the
    /// current calendar year, tests pass a fixed one.
    pub fn from_raw(raw: &RawListing, current_year: i32) -> Self {
        // The employer element carries rating text on a second line.
        let company = raw
            .company
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();

        let SalaryEstimate {
            estimate_type,
            lower,
            upper,
        } = raw
            .salary_text
            .as_deref()
            .map(parse::parse_salary_text)
            .unwrap_or_default();

        let (base_salary, base_salary_period) = raw
            .base_salary_text
            .as_deref()
            .map(parse::parse_base_salary)
            .unwrap_or((None, None));

        let (year_founded, years_active) = raw
            .founded
            .as_deref()
            .map(|text| parse::years_active(text, current_year))
            .unwrap_or((None, None));

        Self {
            title: raw.title.trim().to_string(),
            company,
            location: raw.location.trim().to_string(),
            estimate_type,
            salary_lower: lower,
            salary_upper: upper,
            rating: raw.rating.as_deref().map(|s| s.trim().to_string()),
            base_salary,
            base_salary_period,
            year_founded,
            years_active,
            industry: raw.industry.as_deref().and_then(parse::company_field),
            sector: raw.sector.as_deref().and_then(parse::company_field),
            company_type: raw.company_type.as_deref().and_then(parse::company_field),
            revenue: raw.revenue.as_deref().and_then(parse::company_field),
            headquarters: raw.headquarters.as_deref().and_then(parse::company_field),
            size: raw.size.as_deref().and_then(parse::company_field),
            description: raw.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_listing() -> RawListing {
        RawListing {
            company: "Acme Corp\n4.1".to_string(),
            title: "Data Engineer".to_string(),
            location: "Berlin".to_string(),
            salary_text: Some("$60K - $80K (Employer est.)".to_string()),
            rating: Some("4.1".to_string()),
            base_salary_text: Some("$70,000/yr (est.)".to_string()),
            description: Some("Build pipelines.".to_string()),
            founded: Some("1990".to_string()),
            industry: Some("Software".to_string()),
            sector: Some("Information Technology".to_string()),
            company_type: Some("Company - Private".to_string()),
            revenue: Some("Unknown / Non-Applicable".to_string()),
            headquarters: Some("Berlin, Germany".to_string()),
            size: Some("51 to 200 Employees".to_string()),
        }
    }

    #[test]
    fn composes_full_record() {
        let record = JobRecord::from_raw(&raw_listing(), 2024);
        assert_eq!(record.company, "Acme Corp");
        assert_eq!(record.title, "Data Engineer");
        assert_eq!(record.estimate_type, Some(EstimateType::Employer));
        assert_eq!(record.salary_lower, Some(60_000));
        assert_eq!(record.salary_upper, Some(80_000));
        assert_eq!(record.base_salary, Some(70_000.0));
        assert_eq!(record.base_salary_period, Some(PayPeriod::Yearly));
        assert_eq!(record.year_founded, Some(1990));
        assert_eq!(record.years_active, Some(34));
        assert_eq!(record.revenue, None);
        assert_eq!(record.size.as_deref(), Some("51 to 200 Employees"));
    }

    #[test]
    fn absent_optionals_stay_absent() {
        let raw = RawListing {
            company: "Acme Corp".to_string(),
            title: "Data Engineer".to_string(),
            location: "Berlin".to_string(),
            ..RawListing::default()
        };
        let record = JobRecord::from_raw(&raw, 2024);
        assert_eq!(record.estimate_type, None);
        assert_eq!(record.salary_lower, None);
        assert_eq!(record.salary_upper, None);
        assert_eq!(record.base_salary, None);
        assert_eq!(record.base_salary_period, None);
        assert_eq!(record.year_founded, None);
        assert_eq!(record.years_active, None);
        assert_eq!(record.industry, None);
        assert_eq!(record.description, None);
    }
}
