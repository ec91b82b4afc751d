//! WebDriver-backed [`JobSite`] implementation for Glassdoor.

use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use joblens_common::{JoblensError, Result};
use joblens_drivers::browser::driver::JoblensDriver;
use joblens_drivers::browser::page::{JoblensPage, Target};
use tracing::debug;

use crate::parse::search_url;
use crate::site::{JobSite, RawListing};

/// XPath selectors for the pieces of a listing page.
mod selectors {
    pub const LISTING: &str = "//*[@data-test='jobListing']";

    pub const SALARY_MODAL_TITLE: &str = "//div[@class='modal_title']";
    pub const SALARY_MODAL_CLOSE: &str =
        "//span[@alt='Close' and contains(@class, 'modal_closeIcon')]";
    pub const LOGIN_MODAL_CLOSE: &str = "//*[@id='JAModal']/div/div[2]/span";

    pub const COMPANY: &str =
        "//*[@data-test='hero-header-module']//*[@data-test='employerName']//self::div";
    pub const TITLE: &str = "//*[@data-test='hero-header-module']//*[@data-test='jobTitle']";
    pub const LOCATION: &str = "//*[@data-test='hero-header-module']//*[@data-test='location']";
    pub const SALARY: &str = "//*[@data-test='hero-header-module']//*[@data-test='detailSalary']";
    pub const RATING: &str = "//*[@data-test='detailRating']";
    pub const BASE_SALARY: &str =
        "//div[contains(@class, 'salaryTab')]//following::div[contains(text(), '$')]";
    pub const DESCRIPTION: &str = "//*[contains(@class,'jobDescriptionContent')]";

    pub const NEXT_BUTTON: &str =
        "//button[(@data-test='pagination-next') and (contains(@class, 'nextButton'))]";

    /// Company-metadata values sit next to a label anchor inside the
    /// basic-info block.
    pub fn company_info(label: &str) -> String {
        format!(
            "//div[@id='EmpBasicInfo']/descendant::*[contains(text(),'{label}')]/following::*"
        )
    }
}

/// How long to poll for pages and listing panes to render.
#[derive(Debug, Clone)]
pub struct SiteWaits {
    /// Results page after navigation or pagination.
    pub page: Duration,
    /// Listing detail pane after a click.
    pub listing: Duration,
}

impl Default for SiteWaits {
    fn default() -> Self {
        Self {
            page: Duration::from_secs(10),
            listing: Duration::from_secs(5),
        }
    }
}

/// Glassdoor driven through a WebDriver session.
pub struct GlassdoorSite {
    driver: JoblensDriver,
    page: Option<JoblensPage>,
    waits: SiteWaits,
}

impl GlassdoorSite {
    pub fn new(driver: JoblensDriver, waits: SiteWaits) -> Self {
        Self {
            driver,
            page: None,
            waits,
        }
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.driver.close().await
    }

    fn page(&self) -> Result<&JoblensPage> {
        self.page
            .as_ref()
            .ok_or_else(|| JoblensError::Driver(anyhow!("no search page open; call open_search first")))
    }

    /// Read an optional field: an absent element becomes `None`, any other
    /// fault propagates.
    async fn optional_text(&self, target: Target<'_>) -> Result<Option<String>> {
        match self.page()?.find(target).await {
            Ok(element) => Ok(Some(element.text().await?)),
            Err(e) if e.is_element_missing() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn company_info_text(&self, label: &str) -> Result<Option<String>> {
        let xpath = selectors::company_info(label);
        self.optional_text(Target::XPath(&xpath)).await
    }

    /// Click a best-effort close control if it is present.
    async fn click_if_present(&self, target: Target<'_>) -> Result<()> {
        match self.page()?.find(target).await {
            Ok(element) => element.click().await,
            Err(e) if e.is_element_missing() => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl JobSite for GlassdoorSite {
    async fn open_search(&mut self, keyword: &str) -> Result<()> {
        let url = search_url(keyword)?;
        debug!(target: "glassdoor", url = %url, "opening search page");
        let page = self.driver.goto(url.as_str()).await?;

        // Zero results is legitimate, so a render timeout is not an error
        // here; the collection loop sees an empty listing count instead.
        match page
            .wait_for(Target::XPath(selectors::LISTING), self.waits.page)
            .await
        {
            Ok(_) => {}
            Err(JoblensError::Timeout(_)) => {}
            Err(e) => return Err(e),
        }

        self.page = Some(page);
        Ok(())
    }

    async fn dismiss_popups(&mut self) -> Result<()> {
        // Salary-estimate modal: only close it when the title says so,
        // other modals share the class name.
        match self.page()?.find(Target::XPath(selectors::SALARY_MODAL_TITLE)).await {
            Ok(title) => {
                if title.text().await?.contains("Salary") {
                    debug!(target: "glassdoor", "dismissing salary estimate popup");
                    self.click_if_present(Target::XPath(selectors::SALARY_MODAL_CLOSE))
                        .await?;
                }
            }
            Err(e) if e.is_element_missing() => {}
            Err(e) => return Err(e),
        }

        self.click_if_present(Target::XPath(selectors::LOGIN_MODAL_CLOSE))
            .await
    }

    async fn listing_count(&mut self) -> Result<usize> {
        let listings = self
            .page()?
            .find_all(Target::XPath(selectors::LISTING))
            .await?;
        Ok(listings.len())
    }

    async fn open_listing(&mut self, index: usize) -> Result<()> {
        let listings = self
            .page()?
            .find_all(Target::XPath(selectors::LISTING))
            .await?;
        let listing = listings
            .get(index)
            .cloned()
            .ok_or_else(|| JoblensError::ElementMissing(format!("listing #{index}")))?;
        listing.click().await?;

        // The detail pane renders asynchronously; give it a bounded wait.
        // A timeout is tolerated: extraction retries pick it up from here.
        match self
            .page()?
            .wait_for(Target::XPath(selectors::TITLE), self.waits.listing)
            .await
        {
            Ok(_) | Err(JoblensError::Timeout(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn read_listing(&mut self) -> Result<RawListing> {
        let page = self.page()?;

        // Mandatory fields: absence fails the listing.
        let company = page.find(Target::XPath(selectors::COMPANY)).await?.text().await?;
        let title = page.find(Target::XPath(selectors::TITLE)).await?.text().await?;
        let location = page
            .find(Target::XPath(selectors::LOCATION))
            .await?
            .text()
            .await?;

        Ok(RawListing {
            company,
            title,
            location,
            salary_text: self.optional_text(Target::XPath(selectors::SALARY)).await?,
            rating: self.optional_text(Target::XPath(selectors::RATING)).await?,
            base_salary_text: self
                .optional_text(Target::XPath(selectors::BASE_SALARY))
                .await?,
            description: self
                .optional_text(Target::XPath(selectors::DESCRIPTION))
                .await?,
            founded: self.company_info_text("Founded").await?,
            industry: self.company_info_text("Industry").await?,
            sector: self.company_info_text("Sector").await?,
            company_type: self.company_info_text("Type").await?,
            revenue: self.company_info_text("Revenue").await?,
            headquarters: self.company_info_text("Headquarters").await?,
            size: self.company_info_text("Size").await?,
        })
    }

    async fn advance_page(&mut self) -> Result<bool> {
        match self.page()?.find(Target::XPath(selectors::NEXT_BUTTON)).await {
            Ok(button) => {
                debug!(target: "glassdoor", "advancing to next results page");
                button.click().await?;
                match self
                    .page()?
                    .wait_for(Target::XPath(selectors::LISTING), self.waits.page)
                    .await
                {
                    Ok(_) | Err(JoblensError::Timeout(_)) => Ok(true),
                    Err(e) => Err(e),
                }
            }
            Err(e) if e.is_element_missing() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_info_xpath_embeds_label() {
        let xpath = selectors::company_info("Founded");
        assert_eq!(
            xpath,
            "//div[@id='EmpBasicInfo']/descendant::*[contains(text(),'Founded')]/following::*"
        );
    }
}
