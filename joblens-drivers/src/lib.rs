//! Driver layer for browser automation.
//!
//! This crate wraps a WebDriver session behind a small capability surface:
//! connect, navigate, locate one/many elements, click, read visible text,
//! and poll until an element appears. The scraping code depends only on
//! this surface, not on `fantoccini` directly.
//!
//! - [`browser::driver::JoblensDriver`]: WebDriver client wrapper
//! - [`browser::page::JoblensPage`]: DOM lookup helpers
//! - [`browser::page::Target`]: CSS/XPath locator wrapper
pub mod browser;
