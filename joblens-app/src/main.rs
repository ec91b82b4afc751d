use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use joblens_common::observability::{init_logging, LogConfig};
use joblens_config::{JoblensConfig, JoblensConfigLoader};
use joblens_drivers::browser::driver::{DriverConfig, DriverKind, JoblensDriver};
use joblens_scraper::dump::{default_output_path, write_records};
use joblens_scraper::glassdoor::{GlassdoorSite, SiteWaits};
use joblens_scraper::{fetch_jobs, RetryPolicy};
use tracing::info;

/// Scrape job listings from Glassdoor into a JSON file.
#[derive(Debug, Parser)]
#[command(name = "joblens", version, about)]
struct Args {
    /// Job keyword to search for, e.g. "data engineer".
    #[arg(long)]
    keyword: Option<String>,

    /// Number of listings to collect.
    #[arg(long)]
    count: Option<usize>,

    /// Output file; defaults to a timestamped name.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Configuration file (YAML); `joblens.yaml` is picked up if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// WebDriver endpoint, e.g. http://localhost:9515.
    #[arg(long)]
    webdriver_url: Option<String>,

    /// Browser kind: chrome or gecko.
    #[arg(long)]
    driver: Option<String>,

    /// Run the browser without a visible window.
    #[arg(long)]
    headless: bool,

    /// Log every composed record field-by-field.
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config file (env wins), then CLI flags on top.
    let mut cfg: JoblensConfig = match &args.config {
        Some(path) => JoblensConfigLoader::new().with_file(path).load()?,
        None => JoblensConfigLoader::new()
            .with_file_optional("joblens.yaml")
            .load()?,
    };
    apply_cli_overrides(&mut cfg, &args);

    init_logging(LogConfig {
        emit_stderr: true,
        ..LogConfig::default()
    })?;

    let keyword = cfg
        .scrape
        .keyword
        .clone()
        .unwrap_or_default();
    let count = cfg.scrape.count;

    let driver_config = DriverConfig {
        endpoint: cfg.webdriver.endpoint.clone(),
        kind: cfg.webdriver.kind.parse::<DriverKind>()?,
        headless: cfg.webdriver.headless,
        binary: cfg.webdriver.binary.clone(),
    };
    let waits = SiteWaits {
        page: Duration::from_secs(cfg.scrape.page_wait_secs),
        listing: Duration::from_secs(cfg.scrape.listing_wait_secs),
    };
    let policy = RetryPolicy {
        max_attempts: cfg.retry.max_attempts,
        base_delay: Duration::from_millis(cfg.retry.base_delay_ms),
    };

    let driver = JoblensDriver::connect(&driver_config).await?;
    let mut site = GlassdoorSite::new(driver, waits);

    let outcome = fetch_jobs(&mut site, &keyword, count, &policy, cfg.scrape.verbose).await;
    // Close the session before acting on the result so a failed run does
    // not leave a browser behind.
    let close_result = site.close().await;

    let records = outcome?;
    close_result?;

    let out_path = cfg
        .output
        .path
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(default_output_path);
    write_records(&records, &out_path)?;

    info!(
        target: "joblens",
        records = records.len(),
        requested = count,
        path = %out_path.display(),
        "run complete"
    );
    Ok(())
}

fn apply_cli_overrides(cfg: &mut JoblensConfig, args: &Args) {
    if let Some(keyword) = &args.keyword {
        cfg.scrape.keyword = Some(keyword.clone());
    }
    if let Some(count) = args.count {
        cfg.scrape.count = count;
    }
    if let Some(out) = &args.out {
        cfg.output.path = Some(out.display().to_string());
    }
    if let Some(url) = &args.webdriver_url {
        cfg.webdriver.endpoint = url.clone();
    }
    if let Some(driver) = &args.driver {
        cfg.webdriver.kind = driver.clone();
    }
    if args.headless {
        cfg.webdriver.headless = true;
    }
    if args.verbose {
        cfg.scrape.verbose = true;
    }
}
