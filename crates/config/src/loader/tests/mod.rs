//! Tests for the configuration loader builder.
//!
//! Invariants:
//! - Tests touching the environment use `serial_test` plus `env_lock()`.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub mod basic_tests;
pub mod file_tests;

/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

/// Loader pre-populated with a complete, valid configuration.
pub fn complete_loader() -> crate::ConfigLoader {
    crate::ConfigLoader::new()
        .with_ticket_service_url("https://sso.example.com/cas/v1/tickets".to_string())
        .with_service_url("https://svc.example.com/api".to_string())
        .with_username("alice".to_string())
        .with_password("s3cret".to_string())
}

/// Write a JSON config file into `dir` and return its path.
pub fn create_test_config_file(dir: &Path, value: serde_json::Value) -> PathBuf {
    let config_path = dir.join("cas.json");
    let mut file = std::fs::File::create(&config_path).unwrap();
    writeln!(file, "{}", value).unwrap();
    config_path
}
