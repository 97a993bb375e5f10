// Config loading and validation tests

use procmeter::config::AppConfig;
use std::path::Path;

const VALID_CONFIG: &str = r#"
[collector]
proc_root = "/proc"
page_size_bytes = 4096
clock_tick_ms = 10

[monitoring]
sample_interval_ms = 1000
max_samples = 5
stats_log_interval_secs = 60

[output]
path = "data/run.json"
"#;

const MINIMAL_CONFIG: &str = r#"
[monitoring]
sample_interval_ms = 500
stats_log_interval_secs = 30
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.collector.proc_root, Path::new("/proc"));
    assert_eq!(config.collector.page_size_bytes, 4096);
    assert_eq!(config.collector.clock_tick_ms, 10);
    assert_eq!(config.monitoring.sample_interval_ms, 1000);
    assert_eq!(config.monitoring.max_samples, 5);
    assert_eq!(config.output.path.as_deref(), Some("data/run.json"));
}

#[test]
fn test_config_defaults_when_omitted() {
    let config = AppConfig::load_from_str(MINIMAL_CONFIG).expect("minimal");
    assert_eq!(config.collector.proc_root, Path::new("/proc"));
    assert_eq!(config.collector.page_size_bytes, 4096);
    assert_eq!(config.collector.clock_tick_ms, 10);
    assert_eq!(config.monitoring.max_samples, 0);
    assert!(config.output.path.is_none());
}

#[test]
fn test_config_validation_rejects_page_size_zero() {
    let bad = VALID_CONFIG.replace("page_size_bytes = 4096", "page_size_bytes = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("page_size_bytes"));
}

#[test]
fn test_config_validation_rejects_negative_clock_tick() {
    let bad = VALID_CONFIG.replace("clock_tick_ms = 10", "clock_tick_ms = -10");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("clock_tick_ms"));
}

#[test]
fn test_config_validation_rejects_empty_proc_root() {
    let bad = VALID_CONFIG.replace("proc_root = \"/proc\"", "proc_root = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("proc_root"));
}

#[test]
fn test_config_validation_rejects_sample_interval_zero() {
    let bad = VALID_CONFIG.replace("sample_interval_ms = 1000", "sample_interval_ms = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("sample_interval_ms"));
}

#[test]
fn test_config_validation_rejects_stats_log_interval_zero() {
    let bad = VALID_CONFIG.replace(
        "stats_log_interval_secs = 60",
        "stats_log_interval_secs = 0",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("stats_log_interval_secs"));
}

#[test]
fn test_config_validation_rejects_empty_output_path() {
    let bad = VALID_CONFIG.replace("path = \"data/run.json\"", "path = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("output.path"));
}

#[test]
fn test_config_rejects_missing_monitoring_section() {
    let err = AppConfig::load_from_str("[collector]\nclock_tick_ms = 10\n").unwrap_err();
    assert!(err.to_string().contains("monitoring"));
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_load_from_file_via_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    unsafe { std::env::set_var("CONFIG_FILE", path.to_str().unwrap()) };
    let result = AppConfig::load();
    unsafe { std::env::remove_var("CONFIG_FILE") };
    let config = result.expect("load from CONFIG_FILE");
    assert_eq!(config.monitoring.max_samples, 5);
}
