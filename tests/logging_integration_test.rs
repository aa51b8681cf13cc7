//! Integration tests for logging functionality
//!
//! A process can install only one global subscriber, so file logging is
//! exercised by a single test.

use envcast::config::LoggingConfig;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_path, "./logs");
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_file_logging_writes_json_lines() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };
    assert!(!log_path.exists());

    let guard = envcast::logging::init_logging("debug", &config).unwrap();
    tracing::info!(target: "envcast::settings", setting = "PORT", "Applying environment override");
    drop(guard);

    let log_file = log_path.join("envcast.log");
    assert!(log_file.exists());

    let contents = std::fs::read_to_string(&log_file).unwrap();
    let lines: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert!(lines
        .iter()
        .any(|line| line["fields"]["message"] == "Applying environment override"
            && line["fields"]["setting"] == "PORT"));
}
