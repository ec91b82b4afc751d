//! The collection loop: paginate, open listings, extract with bounded
//! retry, and report shortfalls.

use std::time::Duration;

use chrono::Datelike;
use joblens_common::{JoblensError, Result};
use tracing::{info, warn};

use crate::record::JobRecord;
use crate::site::{JobSite, RawListing};

/// Bounded exponential backoff for per-listing extraction.
///
/// A listing gets `max_attempts` tries with doubling delays; after that
/// it is skipped with a warning rather than stalling the whole run.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (zero-based): base * 2^attempt,
    /// capped at 30 seconds.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(1u32 << attempt.min(6))
            .min(Duration::from_secs(30))
    }
}

/// Scrape up to `count` listings for `keyword` and return them in the
/// order encountered.
///
/// Terminates early with a shortfall warning when pagination is exhausted;
/// the partial result set is still returned. Configuration mistakes (an
/// empty keyword) fail before any navigation.
pub async fn fetch_jobs<S: JobSite + Send>(
    site: &mut S,
    keyword: &str,
    count: usize,
    policy: &RetryPolicy,
    verbose: bool,
) -> Result<Vec<JobRecord>> {
    if keyword.trim().is_empty() {
        return Err(JoblensError::Config(
            "search keyword must not be empty".to_string(),
        ));
    }

    let current_year = chrono::Local::now().year();
    let mut records: Vec<JobRecord> = Vec::new();

    site.open_search(keyword).await?;

    while records.len() < count {
        site.dismiss_popups().await?;
        let available = site.listing_count().await?;

        for index in 0..available {
            if records.len() >= count {
                break;
            }

            info!(
                target: "scrape",
                progress = records.len(),
                requested = count,
                index,
                "opening listing"
            );

            site.dismiss_popups().await?;
            site.open_listing(index).await?;
            site.dismiss_popups().await?;

            match extract_with_retry(site, policy).await {
                Ok(raw) => {
                    let record = JobRecord::from_raw(&raw, current_year);
                    if verbose {
                        log_record(&record);
                    }
                    records.push(record);
                }
                Err(JoblensError::RetriesExhausted { attempts }) => {
                    warn!(
                        target: "scrape",
                        index,
                        attempts,
                        "listing skipped after exhausting retries"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        if records.len() >= count {
            break;
        }
        if !site.advance_page().await? {
            warn!(
                target: "scrape",
                collected = records.len(),
                requested = count,
                "no more listings to scrape; only {} of {} were available",
                records.len(),
                count
            );
            break;
        }
    }

    Ok(records)
}

/// Extract the open listing, retrying with exponential backoff on any
/// fault except configuration errors.
async fn extract_with_retry<S: JobSite + Send>(
    site: &mut S,
    policy: &RetryPolicy,
) -> Result<RawListing> {
    for attempt in 0..policy.max_attempts {
        match site.read_listing().await {
            Ok(raw) => return Ok(raw),
            Err(e @ JoblensError::Config(_)) => return Err(e),
            Err(e) => {
                let delay = policy.delay_for(attempt);
                warn!(
                    target: "scrape",
                    attempt = attempt + 1,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "listing extraction failed; backing off"
                );
                if attempt + 1 < policy.max_attempts {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
    Err(JoblensError::RetriesExhausted {
        attempts: policy.max_attempts,
    })
}

/// Verbose mode: one event carrying every field of the composed record.
fn log_record(record: &JobRecord) {
    info!(
        target: "scrape.record",
        title = %record.title,
        company = %record.company,
        location = %record.location,
        estimate_type = ?record.estimate_type,
        salary_lower = ?record.salary_lower,
        salary_upper = ?record.salary_upper,
        rating = ?record.rating,
        base_salary = ?record.base_salary,
        base_salary_period = ?record.base_salary_period,
        year_founded = ?record.year_founded,
        years_active = ?record.years_active,
        industry = ?record.industry,
        sector = ?record.sector,
        company_type = ?record.company_type,
        revenue = ?record.revenue,
        headquarters = ?record.headquarters,
        size = ?record.size,
        description_len = record.description.as_ref().map(|d| d.len()).unwrap_or(0),
        "scraped listing"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay: Duration::from_millis(500),
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(500));
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        // Exponent is clamped, and the overall delay never exceeds 30s.
        assert_eq!(policy.delay_for(9), Duration::from_secs(30));
    }
}
