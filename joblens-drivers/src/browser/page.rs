use fantoccini::error::CmdError;
use fantoccini::{elements::Element, Client, Locator};
use joblens_common::{JoblensError, Result};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// A locator the page can resolve: CSS selector or XPath expression.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Css(&'a str),
    XPath(&'a str),
}

impl<'a> Target<'a> {
    fn as_locator(&self) -> Locator<'a> {
        match self {
            Target::Css(s) => Locator::Css(s),
            Target::XPath(s) => Locator::XPath(s),
        }
    }
}

impl fmt::Display for Target<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Css(s) => write!(f, "css:{s}"),
            Target::XPath(s) => write!(f, "xpath:{s}"),
        }
    }
}

/// Translate a `fantoccini` command error into the shared taxonomy.
///
/// A plain element miss becomes [`JoblensError::ElementMissing`] so that
/// optional-field extraction can degrade to an absent value; everything
/// else is a driver fault.
fn lookup_error(target: &Target<'_>, err: CmdError) -> JoblensError {
    if err.is_no_such_element() {
        JoblensError::ElementMissing(target.to_string())
    } else {
        JoblensError::Driver(anyhow::Error::new(err))
    }
}

/// High-level page wrapper providing element queries.
pub struct JoblensPage {
    client: Client,
}

impl JoblensPage {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Find a single element. Absence surfaces as
    /// [`JoblensError::ElementMissing`].
    pub async fn find(&self, target: Target<'_>) -> Result<JoblensElement> {
        let element = self
            .client
            .find(target.as_locator())
            .await
            .map_err(|e| lookup_error(&target, e))?;
        Ok(JoblensElement::new(element))
    }

    /// Find zero or more elements, in document order.
    pub async fn find_all(&self, target: Target<'_>) -> Result<Vec<JoblensElement>> {
        let elements = self
            .client
            .find_all(target.as_locator())
            .await
            .map_err(|e| lookup_error(&target, e))?;
        Ok(elements.into_iter().map(JoblensElement::new).collect())
    }

    /// Poll until `target` is present, up to the given deadline.
    ///
    /// Replaces fixed-duration sleeps: returns as soon as the element
    /// renders and fails with [`JoblensError::Timeout`] once the deadline
    /// elapses.
    pub async fn wait_for(&self, target: Target<'_>, at_most: Duration) -> Result<JoblensElement> {
        debug!(target: "browser.page", locator = %target, timeout_ms = at_most.as_millis() as u64, "waiting for element");
        let element = self
            .client
            .wait()
            .at_most(at_most)
            .for_element(target.as_locator())
            .await
            .map_err(|e| match e {
                CmdError::WaitTimeout => JoblensError::Timeout(target.to_string()),
                other => lookup_error(&target, other),
            })?;
        Ok(JoblensElement::new(element))
    }

    /// Return the current page URL.
    pub async fn url(&self) -> Result<String> {
        self.client
            .current_url()
            .await
            .map(|url| url.to_string())
            .map_err(|e| JoblensError::Driver(anyhow::Error::new(e)))
    }
}

/// Wrapper for DOM elements with lookup helpers consistent with
/// [`JoblensPage`].
#[derive(Clone)]
pub struct JoblensElement {
    element: Element,
}

impl JoblensElement {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    /// Click the element. Consumes the handle; the DOM may change under it.
    pub async fn click(self) -> Result<()> {
        self.element
            .click()
            .await
            .map_err(|e| JoblensError::Driver(anyhow::Error::new(e)))?;
        Ok(())
    }

    /// Return the element's visible text.
    pub async fn text(&self) -> Result<String> {
        self.element
            .text()
            .await
            .map_err(|e| JoblensError::Driver(anyhow::Error::new(e)))
    }

    /// Read an attribute value.
    pub async fn attr(&self, attribute: &str) -> Result<Option<String>> {
        self.element
            .attr(attribute)
            .await
            .map_err(|e| JoblensError::Driver(anyhow::Error::new(e)))
    }

    /// Find a child element.
    pub async fn find(&self, target: Target<'_>) -> Result<JoblensElement> {
        let element = self
            .element
            .find(target.as_locator())
            .await
            .map_err(|e| lookup_error(&target, e))?;
        Ok(JoblensElement::new(element))
    }

    /// Find zero or more child elements.
    pub async fn find_all(&self, target: Target<'_>) -> Result<Vec<JoblensElement>> {
        let elements = self
            .element
            .find_all(target.as_locator())
            .await
            .map_err(|e| lookup_error(&target, e))?;
        Ok(elements.into_iter().map(JoblensElement::new).collect())
    }
}
