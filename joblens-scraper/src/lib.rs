//! Job-listing scraping core.
//!
//! Drives a search on Glassdoor, pages through the results, opens each
//! listing, extracts its fields, and dumps the collected records to a
//! pretty-printed JSON file.
//!
//! - [`site::JobSite`]: the browser-facing capability surface
//! - [`glassdoor::GlassdoorSite`]: the WebDriver-backed implementation
//! - [`parse`]: pure text parsers for salary, pay period, founding year
//! - [`scrape::fetch_jobs`]: the collection loop with bounded retry
//! - [`dump`]: JSON serialisation of the collected records

pub mod dump;
pub mod glassdoor;
pub mod parse;
pub mod record;
pub mod scrape;
pub mod site;

pub use record::{EstimateType, JobRecord, PayPeriod};
pub use scrape::{fetch_jobs, RetryPolicy};
pub use site::{JobSite, RawListing};
