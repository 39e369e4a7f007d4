//! Connection configuration types for CAS clients.
//!
//! Responsibilities:
//! - Define endpoint settings (ticket service, target service, login page).
//! - Define the ticket query-parameter convention (`ticket` vs `SAMLart`).
//! - Define the main `Config` structure combining connection and auth.
//! - Provide serialization helpers for `Duration`.
//!
//! Does NOT handle:
//! - Configuration loading from files/env (see `loader` module).
//! - Actual network connections (see client crate).
//!
//! Invariants:
//! - All duration fields are serialized as seconds (integers).
//! - URLs built through `ConfigLoader` never end with a trailing slash.

use crate::constants::{DEFAULT_LOGIN_REDIRECT_URL, DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT_SECS};
use crate::types::auth::AuthConfig;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Module for serializing Duration as seconds (integer).
mod duration_seconds {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// Query parameter name a service ticket is attached under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TicketParam {
    /// `ticket`, used by services behind mod_auth_cas.
    #[default]
    #[serde(rename = "ticket")]
    Ticket,
    /// `SAMLart`, used by SAML-style service validation.
    #[serde(rename = "SAMLart")]
    SamlArt,
}

impl TicketParam {
    /// Select the parameter from the mod_auth_cas flag.
    pub fn from_mod_auth_cas(mod_auth_cas: bool) -> Self {
        if mod_auth_cas {
            Self::Ticket
        } else {
            Self::SamlArt
        }
    }

    /// The literal query parameter name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ticket => "ticket",
            Self::SamlArt => "SAMLart",
        }
    }
}

impl fmt::Display for TicketParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketParam {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ticket" => Ok(Self::Ticket),
            s if s.eq_ignore_ascii_case("samlart") => Ok(Self::SamlArt),
            other => Err(format!("expected 'ticket' or 'SAMLart', got '{other}'")),
        }
    }
}

/// Endpoint and transport settings for one CAS-protected service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// CAS REST ticket endpoint (e.g. https://sso.example.com/cas/v1/tickets)
    pub ticket_service_url: String,
    /// Base URL of the protected service
    pub service_url: String,
    /// Login page URL; a request that ends up here has lost its session
    #[serde(default = "default_login_redirect_url")]
    pub login_redirect_url: String,
    /// Query parameter the service ticket is attached under
    #[serde(default)]
    pub ticket_param: TicketParam,
    /// Whether to skip TLS verification (for self-signed certificates)
    #[serde(default)]
    pub skip_verify: bool,
    /// Request timeout (serialized as seconds)
    #[serde(with = "duration_seconds", default = "default_timeout")]
    pub timeout: Duration,
    /// Maximum number of redirects followed per request
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

pub(crate) fn default_login_redirect_url() -> String {
    DEFAULT_LOGIN_REDIRECT_URL.to_string()
}

pub(crate) fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

pub(crate) fn default_max_redirects() -> usize {
    DEFAULT_MAX_REDIRECTS
}

impl ConnectionConfig {
    /// Create connection settings with defaults for everything but the two endpoints.
    pub fn new(ticket_service_url: impl Into<String>, service_url: impl Into<String>) -> Self {
        Self {
            ticket_service_url: ticket_service_url.into(),
            service_url: service_url.into(),
            login_redirect_url: default_login_redirect_url(),
            ticket_param: TicketParam::default(),
            skip_verify: false,
            timeout: default_timeout(),
            max_redirects: default_max_redirects(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Connection settings
    pub connection: ConnectionConfig,
    /// Credentials
    pub auth: AuthConfig,
}

impl Config {
    /// Create a config for the given endpoints and credentials, with default transport settings.
    pub fn new(
        ticket_service_url: impl Into<String>,
        service_url: impl Into<String>,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            connection: ConnectionConfig::new(ticket_service_url, service_url),
            auth: AuthConfig::new(username, password),
        }
    }
}
