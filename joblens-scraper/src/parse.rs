//! Pure text parsers turning extracted page text into normalized fields.

use std::sync::LazyLock;

use joblens_common::{JoblensError, Result};
use regex::Regex;
use url::Url;

use crate::record::{EstimateType, PayPeriod};

static RE_ESTIMATE_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(Employer|Glassdoor)").expect("estimate-type regex"));

static RE_SALARY_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\d{0,4}\.?\d{1,4}?[KM]?\s?-?\s?(\$\d{0,4}\.?\d{1,4}?[KM]?)?")
        .expect("salary-range regex")
});

static RE_SINGLE_SALARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\d*\.?[KM]?\d*").expect("single-salary regex"));

static RE_AVG_BASE_SAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d*([,.]\d*)+").expect("base-salary regex"));

static RE_PAY_PERIOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(hr|yr)").expect("pay-period regex"));

/// Values the site shows when company information is not on file.
pub const UNKNOWN_COMPANY_VALUES: [&str; 2] = ["Unknown", "Unknown / Non-Applicable"];

/// Parsed headline salary: the estimate origin plus numeric bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SalaryEstimate {
    pub estimate_type: Option<EstimateType>,
    pub lower: Option<i64>,
    pub upper: Option<i64>,
}

/// Parse a headline salary blurb such as
/// `"$60K - $80K (Employer est.)"` into estimate type and bounds.
///
/// A hyphenated range yields both bounds; a lone dollar value is used for
/// both; text without a recognizable dollar pattern yields absent bounds.
pub fn parse_salary_text(text: &str) -> SalaryEstimate {
    let estimate_type = RE_ESTIMATE_TYPE.find(text).map(|m| match m.as_str() {
        "Employer" => EstimateType::Employer,
        _ => EstimateType::Glassdoor,
    });

    let range = RE_SALARY_RANGE.find(text).map(|m| m.as_str());
    let (lower, upper) = match range.and_then(|r| r.split_once('-')) {
        Some((low, high)) => (parse_money(low), parse_money(high)),
        None => match RE_SINGLE_SALARY.find(text) {
            Some(m) => {
                let value = parse_money(m.as_str());
                (value, value)
            }
            None => (None, None),
        },
    };

    SalaryEstimate {
        estimate_type,
        lower,
        upper,
    }
}

/// Normalize a money token like `"$60K"`, `"$1.5M"`, or `"$70000"` into a
/// whole-dollar amount.
fn parse_money(token: &str) -> Option<i64> {
    let token = token.trim().trim_start_matches('$').trim();
    let (digits, multiplier) = match token.strip_suffix(['K', 'k']) {
        Some(rest) => (rest, 1_000.0),
        None => match token.strip_suffix(['M', 'm']) {
            Some(rest) => (rest, 1_000_000.0),
            None => (token, 1.0),
        },
    };
    if digits.is_empty() {
        return None;
    }
    digits
        .parse::<f64>()
        .ok()
        .map(|value| (value * multiplier).round() as i64)
}

/// Extract the numeric value and the pay frequency from an average base
/// salary blurb such as `"$108,000/yr (est.)"`.
pub fn parse_base_salary(text: &str) -> (Option<f64>, Option<PayPeriod>) {
    let value = RE_AVG_BASE_SAL
        .find(text)
        .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok());

    let period = RE_PAY_PERIOD.find(text).map(|m| match m.as_str() {
        "hr" => PayPeriod::Hourly,
        _ => PayPeriod::Yearly,
    });

    (value, period)
}

/// Derive founding year and years active from a founding-year string.
///
/// Unknown sentinels and non-numeric text map to absent values for both.
pub fn years_active(founded: &str, current_year: i32) -> (Option<i32>, Option<i32>) {
    let trimmed = founded.trim();
    if trimmed.is_empty() || UNKNOWN_COMPANY_VALUES.contains(&trimmed) {
        return (None, None);
    }
    match trimmed.parse::<i32>() {
        Ok(year) => (Some(year), Some(current_year - year)),
        Err(_) => (None, None),
    }
}

/// Normalize a company-metadata field: the unknown sentinels and empty
/// text map to an absent value.
pub fn company_field(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() || UNKNOWN_COMPANY_VALUES.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Compose the search URL for a job keyword.
///
/// The keyword is lower-cased and hyphenated; the `KO0,{n}` segment carries
/// the slug length, mirroring what the search box produces.
pub fn search_url(keyword: &str) -> Result<Url> {
    let slug = keyword
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        return Err(JoblensError::Config(
            "search keyword must not be empty".to_string(),
        ));
    }
    let len = slug.chars().count();
    let url = format!(
        "https://www.glassdoor.com/Job/{slug}-jobs-SRCH_KO0,{len}.htm?clickSource=searchBox"
    );
    Url::parse(&url).map_err(|e| JoblensError::Config(format!("invalid search url: {e}")))
}
