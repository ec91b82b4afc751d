use std::time::Duration;

use async_trait::async_trait;
use joblens_common::{JoblensError, Result};
use joblens_scraper::{fetch_jobs, JobSite, RawListing, RetryPolicy};

/// In-memory site: a fixed number of listings per results page, with an
/// optional run of injected driver faults before reads start succeeding.
struct MockSite {
    listings_per_page: Vec<usize>,
    page: usize,
    opened: Option<usize>,
    fail_reads: u32,
    reads_attempted: u32,
    searches: Vec<String>,
}

impl MockSite {
    fn new(listings_per_page: Vec<usize>) -> Self {
        Self {
            listings_per_page,
            page: 0,
            opened: None,
            fail_reads: 0,
            reads_attempted: 0,
            searches: Vec::new(),
        }
    }

    fn with_failing_reads(mut self, n: u32) -> Self {
        self.fail_reads = n;
        self
    }
}

#[async_trait]
impl JobSite for MockSite {
    async fn open_search(&mut self, keyword: &str) -> Result<()> {
        self.searches.push(keyword.to_string());
        Ok(())
    }

    async fn dismiss_popups(&mut self) -> Result<()> {
        Ok(())
    }

    async fn listing_count(&mut self) -> Result<usize> {
        Ok(self.listings_per_page[self.page])
    }

    async fn open_listing(&mut self, index: usize) -> Result<()> {
        self.opened = Some(index);
        Ok(())
    }

    async fn read_listing(&mut self) -> Result<RawListing> {
        self.reads_attempted += 1;
        if self.fail_reads > 0 {
            self.fail_reads -= 1;
            return Err(JoblensError::Driver(anyhow::anyhow!(
                "simulated driver fault"
            )));
        }
        let index = self
            .opened
            .ok_or_else(|| JoblensError::ElementMissing("no listing open".into()))?;
        Ok(RawListing {
            company: format!("Company {} {}\n4.2", self.page, index),
            title: format!("Data Engineer {index}"),
            location: "Remote".to_string(),
            salary_text: Some("$60K - $80K (Employer est.)".to_string()),
            founded: Some("1990".to_string()),
            industry: Some("Software".to_string()),
            ..RawListing::default()
        })
    }

    async fn advance_page(&mut self) -> Result<bool> {
        if self.page + 1 < self.listings_per_page.len() {
            self.page += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(1),
    }
}

#[tokio::test]
async fn collects_exactly_the_requested_count() {
    let mut site = MockSite::new(vec![5]);
    let records = fetch_jobs(&mut site, "data engineer", 5, &fast_policy(), false)
        .await
        .unwrap();

    assert_eq!(records.len(), 5);
    assert_eq!(site.searches, vec!["data engineer".to_string()]);
    for record in &records {
        assert!(record.company.starts_with("Company"));
        assert_eq!(record.salary_lower, Some(60_000));
        assert_eq!(record.salary_upper, Some(80_000));
        assert_eq!(record.year_founded, Some(1990));
    }
}

#[tokio::test]
async fn never_collects_more_than_requested() {
    let mut site = MockSite::new(vec![3, 3, 3]);
    let records = fetch_jobs(&mut site, "data engineer", 4, &fast_policy(), false)
        .await
        .unwrap();
    assert_eq!(records.len(), 4);
}

#[tokio::test]
async fn exhausted_pagination_reports_shortfall_not_error() {
    let mut site = MockSite::new(vec![2]);
    let records = fetch_jobs(&mut site, "data engineer", 5, &fast_policy(), false)
        .await
        .unwrap();
    // Only two listings existed; the run still succeeds with a partial set.
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn empty_keyword_is_a_config_error() {
    let mut site = MockSite::new(vec![5]);
    let err = fetch_jobs(&mut site, "   ", 5, &fast_policy(), false)
        .await
        .unwrap_err();
    assert!(matches!(err, JoblensError::Config(_)));
    // Fails before any navigation.
    assert!(site.searches.is_empty());
}

#[tokio::test]
async fn transient_driver_faults_are_retried() {
    let mut site = MockSite::new(vec![2]).with_failing_reads(2);
    let records = fetch_jobs(&mut site, "data engineer", 2, &fast_policy(), false)
        .await
        .unwrap();

    // Two faults burned two attempts on the first listing; both listings
    // were still collected.
    assert_eq!(records.len(), 2);
    assert_eq!(site.reads_attempted, 4);
}

#[tokio::test]
async fn listing_is_skipped_after_retries_exhaust() {
    // More faults than the policy allows: the first listing is skipped,
    // the second still collected.
    let mut site = MockSite::new(vec![2]).with_failing_reads(3);
    let records = fetch_jobs(&mut site, "data engineer", 2, &fast_policy(), false)
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Data Engineer 1");
}

#[tokio::test]
async fn paginates_across_result_pages() {
    let mut site = MockSite::new(vec![2, 2]);
    let records = fetch_jobs(&mut site, "data engineer", 4, &fast_policy(), false)
        .await
        .unwrap();

    assert_eq!(records.len(), 4);
    assert!(records[3].company.starts_with("Company 1"));
}
