use crate::browser::page::JoblensPage;
use fantoccini::ClientBuilder;
use joblens_common::{JoblensError, Result};
use serde_json::json;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::info;
use webdriver::capabilities::Capabilities;

/// Which browser family the WebDriver endpoint is driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    Chrome,
    Gecko,
}

impl FromStr for DriverKind {
    type Err = JoblensError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" | "chromium" | "chromedriver" => Ok(DriverKind::Chrome),
            "gecko" | "firefox" | "geckodriver" => Ok(DriverKind::Gecko),
            other => Err(JoblensError::Config(format!(
                "unsupported driver kind '{other}'; expected 'chrome' or 'gecko'"
            ))),
        }
    }
}

/// Connection settings for the WebDriver session.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// WebDriver endpoint, e.g. `http://localhost:9515` for chromedriver.
    pub endpoint: String,
    pub kind: DriverKind,
    pub headless: bool,
    /// Optional path to the browser executable.
    pub binary: Option<String>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9515".to_string(),
            kind: DriverKind::Chrome,
            headless: false,
            binary: None,
        }
    }
}

/// Thin wrapper around a `fantoccini` WebDriver client.
pub struct JoblensDriver {
    client: fantoccini::Client,
}

impl JoblensDriver {
    /// Connect to a running WebDriver service with capabilities derived
    /// from the requested browser kind.
    pub async fn connect(config: &DriverConfig) -> Result<Self> {
        let caps = build_capabilities(config);

        info!(
            target: "browser.driver",
            endpoint = %config.endpoint,
            kind = ?config.kind,
            headless = config.headless,
            "connecting WebDriver session"
        );

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&config.endpoint)
            .await
            .map_err(|e| JoblensError::Driver(anyhow::Error::new(e)))?;

        Ok(Self { client })
    }

    /// Navigate to `url` and return a [`JoblensPage`] for element lookups.
    pub async fn goto(&mut self, url: &str) -> Result<JoblensPage> {
        self.client
            .goto(url)
            .await
            .map_err(|e| JoblensError::Driver(anyhow::Error::new(e)))?;
        Ok(JoblensPage::new(self.client.clone()))
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client
            .close()
            .await
            .map_err(|e| JoblensError::Driver(anyhow::Error::new(e)))?;
        Ok(())
    }
}

fn build_capabilities(config: &DriverConfig) -> Capabilities {
    let mut caps = Capabilities::new();

    match config.kind {
        DriverKind::Chrome => {
            let mut opts = HashMap::new();
            let mut args: Vec<String> = vec!["--disable-blink-features=AutomationControlled".into()];
            if config.headless {
                args.push("--headless=new".into());
                args.push("--disable-gpu".into());
            }
            opts.insert("args".to_string(), json!(args));
            if let Some(binary) = &config.binary {
                opts.insert("binary".to_string(), json!(binary));
            }
            caps.insert("goog:chromeOptions".to_string(), json!(opts));
        }
        DriverKind::Gecko => {
            let mut opts = HashMap::new();
            let mut args: Vec<String> = Vec::new();
            if config.headless {
                args.push("-headless".into());
            }
            opts.insert("args".to_string(), json!(args));
            if let Some(binary) = &config.binary {
                opts.insert("binary".to_string(), json!(binary));
            }
            caps.insert("moz:firefoxOptions".to_string(), json!(opts));
        }
    }

    caps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_kind_accepts_common_aliases() {
        assert_eq!("Chrome".parse::<DriverKind>().unwrap(), DriverKind::Chrome);
        assert_eq!("firefox".parse::<DriverKind>().unwrap(), DriverKind::Gecko);
        assert_eq!(
            " geckodriver ".parse::<DriverKind>().unwrap(),
            DriverKind::Gecko
        );
    }

    #[test]
    fn driver_kind_rejects_unknown() {
        let err = "safari".parse::<DriverKind>().unwrap_err();
        assert!(matches!(err, JoblensError::Config(_)));
    }

    #[test]
    fn chrome_headless_args_present() {
        let cfg = DriverConfig {
            headless: true,
            ..DriverConfig::default()
        };
        let caps = build_capabilities(&cfg);
        let args = caps["goog:chromeOptions"]["args"].to_string();
        assert!(args.contains("--headless=new"));
    }

    #[test]
    fn gecko_binary_propagated() {
        let cfg = DriverConfig {
            kind: DriverKind::Gecko,
            binary: Some("/usr/bin/firefox".into()),
            ..DriverConfig::default()
        };
        let caps = build_capabilities(&cfg);
        assert_eq!(caps["moz:firefoxOptions"]["binary"], json!("/usr/bin/firefox"));
    }
}
