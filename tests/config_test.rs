//! Configuration loading from the shipped file and the environment

use std::path::Path;

use berthwatch::config::Config;
use berthwatch::models::KeySchema;
use serial_test::serial;
use tempfile::NamedTempFile;

const ENV_VARS: &[&str] = &[
    "BERTHWATCH_API_URL",
    "BERTHWATCH_PAGE_SIZE",
    "BERTHWATCH_MAX_PAGES",
    "BERTHWATCH_STATUSES",
    "BERTHWATCH_KEY_SCHEMA",
    "BERTHWATCH_CACHE_TTL",
];

fn clear_env() {
    for name in ENV_VARS {
        std::env::remove_var(name);
    }
}

/// Test that the shipped config.toml parses and validates
#[test]
fn test_shipped_config_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.toml");
    let config = Config::from_file(&path).unwrap();

    config.validate().unwrap();
    assert_eq!(config.api.page_size, 100);
    assert_eq!(config.api.max_pages, 20);
    assert_eq!(config.schedule.key_schema, KeySchema::VesselVoyage);
    assert_eq!(config.schedule.fields.forecast, "PrevisaoAtracacao");
    assert_eq!(config.cache.ttl_secs, 600);
}

/// Test that a file only overriding the key schema keeps the other defaults
#[test]
fn test_partial_config_file() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "[schedule]\nkey_schema = \"vessel_only\"\n").unwrap();

    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.schedule.key_schema, KeySchema::VesselOnly);
    assert_eq!(config.api.request_timeout_secs, 15);
    assert!(config.cache.enabled);
}

/// Test that a malformed file is reported, not defaulted
#[test]
fn test_invalid_config_file() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "[api\npage_size = ").unwrap();

    assert!(Config::from_file(file.path()).is_err());
}

/// Test environment overrides
#[test]
#[serial]
fn test_from_env_overrides() {
    clear_env();
    std::env::set_var("BERTHWATCH_API_URL", "http://localhost:8080/schedule");
    std::env::set_var("BERTHWATCH_PAGE_SIZE", "50");
    std::env::set_var("BERTHWATCH_STATUSES", "PREVISTO, ATRACADO");
    std::env::set_var("BERTHWATCH_KEY_SCHEMA", "vessel-carrier-voyage");
    std::env::set_var("BERTHWATCH_CACHE_TTL", "30");

    let config = Config::from_env().unwrap();
    clear_env();

    assert_eq!(config.api.url, "http://localhost:8080/schedule");
    assert_eq!(config.api.page_size, 50);
    assert_eq!(config.api.statuses, vec!["PREVISTO", "ATRACADO"]);
    assert_eq!(config.schedule.key_schema, KeySchema::VesselCarrierVoyage);
    assert_eq!(config.cache_ttl(), chrono::Duration::seconds(30));
    config.validate().unwrap();
}

/// Test that an unknown key schema in the environment is an error
#[test]
#[serial]
fn test_from_env_rejects_unknown_schema() {
    clear_env();
    std::env::set_var("BERTHWATCH_KEY_SCHEMA", "container_only");

    let result = Config::from_env();
    clear_env();

    assert!(result.is_err());
}

/// Test that zero page size fails validation
#[test]
#[serial]
fn test_from_env_zero_page_size_is_invalid() {
    clear_env();
    std::env::set_var("BERTHWATCH_PAGE_SIZE", "0");

    let config = Config::from_env().unwrap();
    clear_env();

    assert!(config.validate().is_err());
}
