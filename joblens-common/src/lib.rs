//! Common types shared across the joblens workspace.
//!
//! This crate defines the shared error taxonomy and the observability
//! helpers used by every binary and integration test. It is intentionally
//! lightweight so that all crates can depend on it without heavy
//! transitive costs.
//!
//! - [`JoblensError`] and [`Result`]: shared error handling
//! - [`observability`]: centralised tracing/logging initialisation

pub mod observability;

/// Error types used across the joblens workspace.
///
/// The scraping code distinguishes "an element is simply not on the page"
/// (frequent, expected, mapped to an absent field) from "the WebDriver
/// session itself misbehaved" (retried with backoff) and from
/// configuration mistakes (fatal, never retried).
#[derive(thiserror::Error, Debug)]
pub enum JoblensError {
    /// Configuration was incomplete or invalid (unsupported driver kind,
    /// missing search keyword). Terminates the run immediately.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The WebDriver session reported an error that is not a plain
    /// element miss.
    #[error("Driver error: {0}")]
    Driver(#[from] anyhow::Error),

    /// A locator matched nothing on the current page.
    #[error("Element not found: {0}")]
    ElementMissing(String),

    /// The bounded per-listing retry policy gave up.
    #[error("Extraction failed after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    /// A poll-until-present deadline elapsed.
    #[error("Timed out waiting for element: {0}")]
    Timeout(String),
}

impl JoblensError {
    /// True when the error means "locator matched nothing", which optional
    /// field extraction maps to an absent value.
    pub fn is_element_missing(&self) -> bool {
        matches!(self, JoblensError::ElementMissing(_))
    }
}

/// Convenient alias for results that use [`JoblensError`].
pub type Result<T> = std::result::Result<T, JoblensError>;
