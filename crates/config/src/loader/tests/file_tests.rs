//! JSON config file tests for the configuration loader builder.

use super::{complete_loader, create_test_config_file};
use crate::loader::builder::ConfigLoader;
use crate::loader::error::ConfigError;
use crate::types::TicketParam;
use secrecy::ExposeSecret;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_file_provides_complete_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_test_config_file(
        temp_dir.path(),
        serde_json::json!({
            "ticket_service_url": "https://sso.example.com/cas/v1/tickets/",
            "service_url": "https://svc.example.com/routing",
            "login_redirect_url": "https://sso.example.com/cas/login",
            "ticket_param": "SAMLart",
            "username": "file-user",
            "password": "file-pass",
            "timeout_seconds": 12,
            "max_redirects": 4
        }),
    );

    let config = ConfigLoader::new()
        .with_config_path(path)
        .from_file()
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(
        config.connection.ticket_service_url,
        "https://sso.example.com/cas/v1/tickets"
    );
    assert_eq!(config.connection.service_url, "https://svc.example.com/routing");
    assert_eq!(config.connection.ticket_param, TicketParam::SamlArt);
    assert_eq!(config.connection.timeout, Duration::from_secs(12));
    assert_eq!(config.connection.max_redirects, 4);
    assert_eq!(config.auth.username, "file-user");
    assert_eq!(config.auth.password.expose_secret(), "file-pass");
}

#[test]
fn test_file_without_path_is_noop() {
    let config = complete_loader().from_file().unwrap().build().unwrap();
    assert_eq!(config.auth.username, "alice");
}

#[test]
fn test_builder_values_survive_partial_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_test_config_file(
        temp_dir.path(),
        serde_json::json!({ "skip_verify": true }),
    );

    let config = complete_loader()
        .with_config_path(path)
        .from_file()
        .unwrap()
        .build()
        .unwrap();

    assert!(config.connection.skip_verify);
    assert_eq!(config.connection.service_url, "https://svc.example.com/api");
}

#[test]
fn test_missing_file_is_read_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.json");

    let result = ConfigLoader::new().with_config_path(path.clone()).from_file();

    match result {
        Err(ConfigError::ConfigFileRead { path: reported }) => assert_eq!(reported, path),
        Err(e) => panic!("Expected ConfigFileRead, got {:?}", e),
        Ok(_) => panic!("Expected ConfigFileRead, got Ok"),
    }
}

#[test]
fn test_malformed_file_does_not_leak_contents() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.json");
    std::fs::write(&path, r#"{"password": "hunter2", "#).unwrap();

    let result = ConfigLoader::new().with_config_path(path).from_file();

    match result {
        Err(err @ ConfigError::ConfigFileParse { .. }) => {
            assert!(!err.to_string().contains("hunter2"));
        }
        Err(e) => panic!("Expected ConfigFileParse, got {:?}", e),
        Ok(_) => panic!("Expected ConfigFileParse, got Ok"),
    }
}

#[test]
fn test_file_values_do_not_override_builder() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_test_config_file(
        temp_dir.path(),
        serde_json::json!({
            "username": "file-user",
            "login_redirect_url": "",
            "max_redirects": 7
        }),
    );

    let config = complete_loader()
        .with_max_redirects(3)
        .with_config_path(path)
        .from_file()
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.auth.username, "alice");
    assert_eq!(config.connection.max_redirects, 3);
    assert_eq!(config.connection.login_redirect_url, "");
}
