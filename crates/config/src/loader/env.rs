//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read and parse `CAS_*` environment variables.
//! - Apply environment variable values to a ConfigLoader instance.
//!
//! Does NOT handle:
//! - Loading from config files (see file.rs).
//! - Building the final Config (see builder.rs).
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - Invalid values return ConfigError::InvalidValue naming the variable.

use secrecy::SecretString;
use std::str::FromStr;
use std::time::Duration;

use super::builder::ConfigLoader;
use super::error::ConfigError;
use crate::types::TicketParam;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_env<T: FromStr>(var: &str, value: &str, expected: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        var: var.to_string(),
        message: expected.to_string(),
    })
}

/// Apply environment variable configuration to the loader.
pub fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if let Some(url) = env_var_or_none("CAS_TICKET_SERVICE_URL") {
        loader.set_ticket_service_url(Some(url));
    }
    if let Some(url) = env_var_or_none("CAS_SERVICE_URL") {
        loader.set_service_url(Some(url));
    }
    if let Some(url) = env_var_or_none("CAS_LOGIN_REDIRECT_URL") {
        loader.set_login_redirect_url(Some(url));
    }
    if let Some(username) = env_var_or_none("CAS_USERNAME") {
        loader.set_username(Some(username));
    }
    if let Some(password) = env_var_or_none("CAS_PASSWORD") {
        loader.set_password(Some(SecretString::new(password.into())));
    }
    if let Some(flag) = env_var_or_none("CAS_MOD_AUTH_CAS") {
        let mod_auth_cas: bool = parse_env("CAS_MOD_AUTH_CAS", &flag, "must be true or false")?;
        loader.set_ticket_param(Some(TicketParam::from_mod_auth_cas(mod_auth_cas)));
    }
    // An explicit parameter name wins over the mod_auth_cas flag.
    if let Some(param) = env_var_or_none("CAS_TICKET_PARAM") {
        let param = param
            .parse::<TicketParam>()
            .map_err(|message| ConfigError::InvalidValue {
                var: "CAS_TICKET_PARAM".to_string(),
                message,
            })?;
        loader.set_ticket_param(Some(param));
    }
    if let Some(skip) = env_var_or_none("CAS_SKIP_VERIFY") {
        loader.set_skip_verify(Some(parse_env(
            "CAS_SKIP_VERIFY",
            &skip,
            "must be true or false",
        )?));
    }
    if let Some(timeout) = env_var_or_none("CAS_TIMEOUT") {
        let secs: u64 = parse_env("CAS_TIMEOUT", &timeout, "must be a number")?;
        loader.set_timeout(Some(Duration::from_secs(secs)));
    }
    if let Some(redirects) = env_var_or_none("CAS_MAX_REDIRECTS") {
        loader.set_max_redirects(Some(parse_env(
            "CAS_MAX_REDIRECTS",
            &redirects,
            "must be a non-negative integer",
        )?));
    }

    // Only consult CAS_CONFIG_PATH when no path was set through the builder.
    if loader.config_path().is_none()
        && let Some(config_path) = env_var_or_none("CAS_CONFIG_PATH")
    {
        loader.set_config_path(Some(std::path::PathBuf::from(config_path)));
    }

    Ok(())
}
