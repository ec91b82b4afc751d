use joblens_config::JoblensConfigLoader;
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn test_config_load() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
webdriver:
  endpoint: "http://localhost:4444"
  kind: gecko
  headless: true
scrape:
  keyword: "data engineer"
  count: 5
  verbose: true
retry:
  max_attempts: 3
  base_delay_ms: 250
output:
  path: "jobs.json"
"#;
    let p = write_yaml(&tmp, "joblens.yaml", file_yaml);

    let config = JoblensConfigLoader::new()
        .with_file(p)
        .load()
        .expect("load system config");

    assert_eq!(config.webdriver.endpoint, "http://localhost:4444");
    assert_eq!(config.webdriver.kind, "gecko");
    assert!(config.webdriver.headless);
    assert_eq!(config.scrape.keyword.as_deref(), Some("data engineer"));
    assert_eq!(config.scrape.count, 5);
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.output.path.as_deref(), Some("jobs.json"));
}

#[test]
#[serial]
fn test_env_overrides_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "joblens.yaml", "scrape:\n  count: 2\n");

    temp_env::with_var("JOBLENS_SCRAPE__COUNT", Some("9"), || {
        let config = JoblensConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load with env override");
        assert_eq!(config.scrape.count, 9);
    });
}

#[test]
#[serial]
fn test_missing_optional_file_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let absent = tmp.path().join("nope.yaml");

    let config = JoblensConfigLoader::new()
        .with_file_optional(&absent)
        .load()
        .expect("defaults without a file");

    assert_eq!(config.webdriver.endpoint, "http://localhost:9515");
    assert_eq!(config.scrape.count, 0);
    assert!(config.scrape.keyword.is_none());
}

#[test]
#[serial]
fn test_shell_expansion_in_file_values() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "joblens.yaml",
        "webdriver:\n  binary: \"${JOBLENS_TEST_BINARY}\"\n",
    );

    temp_env::with_var("JOBLENS_TEST_BINARY", Some("/opt/chrome/chrome"), || {
        let config = JoblensConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load with expansion");
        assert_eq!(config.webdriver.binary.as_deref(), Some("/opt/chrome/chrome"));
    });
}
