//! Loader for workspace configuration with YAML + environment overlays.
//!
//! A `joblens.yaml` file supplies the base settings; `JOBLENS_`-prefixed
//! environment variables override it (`JOBLENS_WEBDRIVER__HEADLESS=true`),
//! and `${VAR}` placeholders inside string values are expanded before the
//! strongly typed structs are materialised.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// Top-level configuration for a scraping run.
#[derive(Debug, Default, Deserialize)]
pub struct JoblensConfig {
    #[serde(default)]
    pub webdriver: WebDriverSettings,
    #[serde(default)]
    pub scrape: ScrapeSettings,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub output: OutputSettings,
}

/// Where and how to reach the WebDriver endpoint.
#[derive(Debug, Deserialize)]
pub struct WebDriverSettings {
    /// WebDriver endpoint, e.g. a running chromedriver or geckodriver.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Browser kind: `chrome` or `gecko`.
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub headless: bool,
    /// Optional path to the browser executable.
    #[serde(default)]
    pub binary: Option<String>,
}

impl Default for WebDriverSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            kind: default_kind(),
            headless: false,
            binary: None,
        }
    }
}

/// What to scrape and how patiently to wait for pages to render.
#[derive(Debug, Deserialize)]
pub struct ScrapeSettings {
    /// Job keyword, e.g. "data engineer". May instead come from the CLI.
    #[serde(default)]
    pub keyword: Option<String>,
    /// Number of listings to collect.
    #[serde(default)]
    pub count: usize,
    /// Log every composed record field-by-field.
    #[serde(default)]
    pub verbose: bool,
    /// Upper bound on waiting for a results page to render.
    #[serde(default = "default_page_wait_secs")]
    pub page_wait_secs: u64,
    /// Upper bound on waiting for an opened listing to render.
    #[serde(default = "default_listing_wait_secs")]
    pub listing_wait_secs: u64,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            keyword: None,
            count: 0,
            verbose: false,
            page_wait_secs: default_page_wait_secs(),
            listing_wait_secs: default_listing_wait_secs(),
        }
    }
}

/// Bounded exponential backoff for per-listing extraction.
#[derive(Debug, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

/// Where the collected records end up.
#[derive(Debug, Default, Deserialize)]
pub struct OutputSettings {
    /// Output file path; defaults to a timestamped name in the working
    /// directory when unset.
    #[serde(default)]
    pub path: Option<String>,
}

fn default_endpoint() -> String {
    "http://localhost:9515".into()
}
fn default_kind() -> String {
    "chrome".into()
}
fn default_page_wait_secs() -> u64 {
    10
}
fn default_listing_wait_secs() -> u64 {
    5
}
fn default_max_attempts() -> u32 {
    5
}
fn default_base_delay_ms() -> u64 {
    500
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct JoblensConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for JoblensConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl JoblensConfigLoader {
    /// Start an empty loader. File sources are attached explicitly;
    /// `JOBLENS_` env overrides are merged last, in [`Self::load`], so
    /// they always win over file values.
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be absent, so runs configured purely through
    /// environment variables or CLI flags still work.
    pub fn with_file_optional<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into a
    /// strongly typed [`JoblensConfig`], expanding `${VAR}` placeholders
    /// along the way.
    ///
    /// ```
    /// use joblens_config::JoblensConfigLoader;
    ///
    /// let cfg = JoblensConfigLoader::new()
    ///     .with_yaml_str("scrape:\n  keyword: data engineer\n  count: 5\n")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(cfg.scrape.keyword.as_deref(), Some("data engineer"));
    /// assert_eq!(cfg.scrape.count, 5);
    /// assert_eq!(cfg.webdriver.endpoint, "http://localhost:9515");
    /// ```
    pub fn load(self) -> Result<JoblensConfig, ConfigError> {
        // The env source goes on top of every file source: later sources
        // take precedence in the `config` crate, and env must win.
        // try_parsing lets numeric/bool overrides like JOBLENS_SCRAPE__COUNT
        // deserialize into typed fields.
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("JOBLENS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Round-trip through serde_json::Value so env expansion can walk
        // every string before the typed deserialize.
        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: JoblensConfig =
            serde_json::from_value(v).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("JL_TEST_FOO", Some("bar"), || {
            let mut v = json!("prefix-${JL_TEST_FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_nested_values() {
        temp_env::with_var("JL_TEST_DRIVER", Some("/usr/bin/chromium"), || {
            let mut v = json!({
                "webdriver": { "binary": "${JL_TEST_DRIVER}" },
                "count": 3,
                "flag": true
            });
            expand_env_in_value(&mut v);
            assert_eq!(v["webdriver"]["binary"], json!("/usr/bin/chromium"));
            assert_eq!(v["count"], json!(3));
        });
    }

    #[test]
    fn unset_variable_left_verbatim() {
        let mut v = json!("${JL_TEST_DEFINITELY_UNSET_VAR}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("${JL_TEST_DEFINITELY_UNSET_VAR}"));
    }

    #[test]
    fn defaults_cover_every_section() {
        let cfg = JoblensConfig::default();
        assert_eq!(cfg.webdriver.kind, "chrome");
        assert!(!cfg.webdriver.headless);
        assert_eq!(cfg.retry.max_attempts, 5);
        assert_eq!(cfg.retry.base_delay_ms, 500);
        assert!(cfg.output.path.is_none());
    }
}
