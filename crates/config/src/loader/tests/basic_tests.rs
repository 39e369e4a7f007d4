//! Basic loader tests: required fields, defaults and URL normalization.

use super::complete_loader;
use crate::constants::{DEFAULT_LOGIN_REDIRECT_URL, DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT_SECS};
use crate::loader::builder::ConfigLoader;
use crate::loader::error::ConfigError;
use crate::types::TicketParam;
use secrecy::ExposeSecret;
use std::time::Duration;

#[test]
fn test_loader_complete_config() {
    let config = complete_loader().build().unwrap();

    assert_eq!(
        config.connection.ticket_service_url,
        "https://sso.example.com/cas/v1/tickets"
    );
    assert_eq!(config.connection.service_url, "https://svc.example.com/api");
    assert_eq!(config.auth.username, "alice");
    assert_eq!(config.auth.password.expose_secret(), "s3cret");
}

#[test]
fn test_loader_defaults() {
    let config = complete_loader().build().unwrap();

    assert_eq!(config.connection.login_redirect_url, DEFAULT_LOGIN_REDIRECT_URL);
    assert_eq!(config.connection.ticket_param, TicketParam::Ticket);
    assert_eq!(
        config.connection.timeout,
        Duration::from_secs(DEFAULT_TIMEOUT_SECS)
    );
    assert_eq!(config.connection.max_redirects, DEFAULT_MAX_REDIRECTS);
    assert!(!config.connection.skip_verify);
}

#[test]
fn test_loader_strips_trailing_slashes() {
    let config = complete_loader()
        .with_ticket_service_url("https://sso.example.com/cas/v1/tickets/".to_string())
        .with_service_url("https://svc.example.com/api//".to_string())
        .with_login_redirect_url("https://sso.example.com/cas/login/".to_string())
        .build()
        .unwrap();

    assert_eq!(
        config.connection.ticket_service_url,
        "https://sso.example.com/cas/v1/tickets"
    );
    assert_eq!(config.connection.service_url, "https://svc.example.com/api");
    assert_eq!(
        config.connection.login_redirect_url,
        "https://sso.example.com/cas/login"
    );
}

#[test]
fn test_loader_missing_service_url() {
    let result = ConfigLoader::new()
        .with_ticket_service_url("https://sso.example.com/cas/v1/tickets".to_string())
        .with_username("alice".to_string())
        .with_password("pw".to_string())
        .build();

    assert!(matches!(result, Err(ConfigError::MissingField("service_url"))));
}

#[test]
fn test_loader_missing_ticket_service_url() {
    let result = ConfigLoader::new()
        .with_service_url("https://svc.example.com".to_string())
        .with_username("alice".to_string())
        .with_password("pw".to_string())
        .build();

    assert!(matches!(
        result,
        Err(ConfigError::MissingField("ticket_service_url"))
    ));
}

#[test]
fn test_loader_missing_password() {
    let result = ConfigLoader::new()
        .with_ticket_service_url("https://sso.example.com/cas/v1/tickets".to_string())
        .with_service_url("https://svc.example.com".to_string())
        .with_username("alice".to_string())
        .build();

    assert!(matches!(result, Err(ConfigError::MissingAuth)));
}

#[test]
fn test_loader_rejects_non_http_scheme() {
    let result = complete_loader()
        .with_service_url("ftp://svc.example.com".to_string())
        .build();

    match result {
        Err(ConfigError::InvalidValue { var, message }) => {
            assert_eq!(var, "service_url");
            assert!(message.contains("scheme"));
        }
        other => panic!("Expected InvalidValue, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_loader_rejects_relative_url() {
    let result = complete_loader()
        .with_ticket_service_url("/cas/v1/tickets".to_string())
        .build();

    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue { ref var, .. }) if var == "ticket_service_url"
    ));
}

#[test]
fn test_loader_blank_url_is_missing() {
    let result = complete_loader().with_service_url("   ".to_string()).build();

    assert!(matches!(result, Err(ConfigError::MissingField("service_url"))));
}
