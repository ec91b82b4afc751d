use async_trait::async_trait;
use joblens_common::Result;

/// The raw texts one open listing yields, before any parsing.
///
/// Company, title, and location are mandatory; a listing that cannot
/// supply them fails extraction. Every other field degrades to `None`
/// when its element is absent.
#[derive(Debug, Clone, Default)]
pub struct RawListing {
    pub company: String,
    pub title: String,
    pub location: String,
    pub salary_text: Option<String>,
    pub rating: Option<String>,
    pub base_salary_text: Option<String>,
    pub description: Option<String>,
    pub founded: Option<String>,
    pub industry: Option<String>,
    pub sector: Option<String>,
    pub company_type: Option<String>,
    pub revenue: Option<String>,
    pub headquarters: Option<String>,
    pub size: Option<String>,
}

/// Browser-facing capability surface the collection loop drives.
///
/// The loop owns the pacing (retries, shortfall reporting); implementations
/// own the selectors and the WebDriver session. Keeping the trait at this
/// granularity lets tests exercise the loop with an in-memory site.
#[async_trait]
pub trait JobSite {
    /// Navigate to the search results for `keyword`.
    async fn open_search(&mut self, keyword: &str) -> Result<()>;

    /// Close any interstitial popups. Best effort: an absent popup is a
    /// no-op, not an error.
    async fn dismiss_popups(&mut self) -> Result<()>;

    /// Number of listings on the current results page.
    async fn listing_count(&mut self) -> Result<usize>;

    /// Open the listing at `index` on the current results page.
    async fn open_listing(&mut self, index: usize) -> Result<()>;

    /// Extract the raw fields of the currently open listing.
    async fn read_listing(&mut self) -> Result<RawListing>;

    /// Advance to the next results page. `Ok(false)` means there is no
    /// next-page control, i.e. the listings are exhausted.
    async fn advance_page(&mut self) -> Result<bool>;
}
