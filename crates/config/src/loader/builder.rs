//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` for hierarchical configuration merging.
//! - Support loading from environment variables, JSON files, and direct builder methods.
//! - Validate and normalize the final `Config`.
//!
//! Does NOT handle:
//! - Direct environment variable parsing logic (delegated to env.rs).
//! - Config file reading (delegated to file.rs).
//!
//! Invariants / Assumptions:
//! - Builder and env values are overwritten in call order; file values only
//!   fill fields nothing else has set. Precedence is builder > env > file when
//!   `with_*` calls come after `from_env()`.
//! - Every URL in a built `Config` is an absolute http(s) URL without a trailing slash.

use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;

use super::env::apply_env;
use super::error::ConfigError;
use super::file::apply_file;
use crate::constants::{
    DEFAULT_LOGIN_REDIRECT_URL, DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT_SECS, MAX_MAX_REDIRECTS,
    MAX_TIMEOUT_SECS,
};
use crate::types::{AuthConfig, Config, ConnectionConfig, TicketParam};

/// Configuration loader that builds config from environment variables and files.
#[derive(Default)]
pub struct ConfigLoader {
    ticket_service_url: Option<String>,
    service_url: Option<String>,
    login_redirect_url: Option<String>,
    ticket_param: Option<TicketParam>,
    username: Option<String>,
    password: Option<SecretString>,
    skip_verify: Option<bool>,
    timeout: Option<Duration>,
    max_redirects: Option<usize>,
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` is set to "true" or "1", the .env file is not loaded.
    /// Missing `.env` files are silently ignored.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DotenvParse` or `ConfigError::DotenvIo` when the
    /// file exists but cannot be used. Error messages never include raw .env
    /// line contents.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Set the JSON config file path.
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Fill still-unset fields from the JSON file set via `with_config_path`,
    /// falling back to `CAS_CONFIG_PATH`.
    pub fn from_file(mut self) -> Result<Self, ConfigError> {
        apply_file(&mut self)?;
        Ok(self)
    }

    /// Read configuration from `CAS_*` environment variables.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    /// Set the CAS REST ticket endpoint.
    pub fn with_ticket_service_url(mut self, url: String) -> Self {
        self.ticket_service_url = Some(url);
        self
    }

    /// Set the protected service base URL.
    pub fn with_service_url(mut self, url: String) -> Self {
        self.service_url = Some(url);
        self
    }

    /// Set the login page URL used to detect lost sessions.
    ///
    /// An empty string disables detection.
    pub fn with_login_redirect_url(mut self, url: String) -> Self {
        self.login_redirect_url = Some(url);
        self
    }

    /// Set the ticket query parameter convention.
    pub fn with_ticket_param(mut self, param: TicketParam) -> Self {
        self.ticket_param = Some(param);
        self
    }

    /// Set the username.
    pub fn with_username(mut self, username: String) -> Self {
        self.username = Some(username);
        self
    }

    /// Set the password.
    pub fn with_password(mut self, password: String) -> Self {
        self.password = Some(SecretString::new(password.into()));
        self
    }

    /// Set whether to skip TLS verification.
    pub fn with_skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = Some(skip);
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the redirect limit.
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = Some(max_redirects);
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> Result<Config, ConfigError> {
        let ticket_service_url = self
            .ticket_service_url
            .as_deref()
            .map(|raw| validate_and_normalize_url("ticket_service_url", raw))
            .transpose()?
            .ok_or(ConfigError::MissingField("ticket_service_url"))?;

        let service_url = self
            .service_url
            .as_deref()
            .map(|raw| validate_and_normalize_url("service_url", raw))
            .transpose()?
            .ok_or(ConfigError::MissingField("service_url"))?;

        // An explicitly blank login URL turns redirect detection off.
        let login_redirect_url = match self.login_redirect_url.as_deref() {
            Some(raw) if raw.trim().is_empty() => String::new(),
            Some(raw) => validate_and_normalize_url("login_redirect_url", raw)?,
            None => DEFAULT_LOGIN_REDIRECT_URL.to_string(),
        };

        let auth = match (self.username, self.password) {
            (Some(username), Some(password)) => AuthConfig { username, password },
            _ => return Err(ConfigError::MissingAuth),
        };

        let connection = ConnectionConfig {
            ticket_service_url,
            service_url,
            login_redirect_url,
            ticket_param: self.ticket_param.unwrap_or_default(),
            skip_verify: self.skip_verify.unwrap_or(false),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_redirects: self.max_redirects.unwrap_or(DEFAULT_MAX_REDIRECTS),
        };

        Self::validate_transport_config(&connection)?;

        Ok(Config { connection, auth })
    }

    /// Validates timeout and redirect settings.
    ///
    /// A zero redirect limit is rejected: lost sessions are only detectable
    /// after following the gateway's redirect to its login page.
    fn validate_transport_config(connection: &ConnectionConfig) -> Result<(), ConfigError> {
        let timeout_secs = connection.timeout.as_secs();

        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                message: "timeout must be greater than 0 seconds".to_string(),
            });
        }

        if timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidTimeout {
                message: format!(
                    "timeout exceeds maximum allowed value of {} seconds",
                    MAX_TIMEOUT_SECS
                ),
            });
        }

        if connection.max_redirects == 0 || connection.max_redirects > MAX_MAX_REDIRECTS {
            return Err(ConfigError::InvalidMaxRedirects {
                message: format!(
                    "must be between 1 and {} (got {})",
                    MAX_MAX_REDIRECTS, connection.max_redirects
                ),
            });
        }

        Ok(())
    }

    pub(crate) fn config_path(&self) -> Option<&PathBuf> {
        self.config_path.as_ref()
    }

    pub(crate) fn set_config_path(&mut self, path: Option<PathBuf>) {
        self.config_path = path;
    }

    pub(crate) fn set_ticket_service_url(&mut self, url: Option<String>) {
        self.ticket_service_url = url;
    }

    pub(crate) fn set_service_url(&mut self, url: Option<String>) {
        self.service_url = url;
    }

    pub(crate) fn set_login_redirect_url(&mut self, url: Option<String>) {
        self.login_redirect_url = url;
    }

    pub(crate) fn set_ticket_param(&mut self, param: Option<TicketParam>) {
        self.ticket_param = param;
    }

    pub(crate) fn set_username(&mut self, username: Option<String>) {
        self.username = username;
    }

    pub(crate) fn set_password(&mut self, password: Option<SecretString>) {
        self.password = password;
    }

    pub(crate) fn set_skip_verify(&mut self, skip: Option<bool>) {
        self.skip_verify = skip;
    }

    pub(crate) fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub(crate) fn set_max_redirects(&mut self, max_redirects: Option<usize>) {
        self.max_redirects = max_redirects;
    }
}

/// Lowest-precedence setters used by the file layer.
impl ConfigLoader {
    pub(crate) fn fill_ticket_service_url(&mut self, url: Option<String>) {
        self.ticket_service_url = self.ticket_service_url.take().or(url);
    }

    pub(crate) fn fill_service_url(&mut self, url: Option<String>) {
        self.service_url = self.service_url.take().or(url);
    }

    pub(crate) fn fill_login_redirect_url(&mut self, url: Option<String>) {
        self.login_redirect_url = self.login_redirect_url.take().or(url);
    }

    pub(crate) fn fill_ticket_param(&mut self, param: Option<TicketParam>) {
        self.ticket_param = self.ticket_param.or(param);
    }

    pub(crate) fn fill_username(&mut self, username: Option<String>) {
        self.username = self.username.take().or(username);
    }

    pub(crate) fn fill_password(&mut self, password: Option<SecretString>) {
        self.password = self.password.take().or(password);
    }

    pub(crate) fn fill_skip_verify(&mut self, skip: Option<bool>) {
        self.skip_verify = self.skip_verify.or(skip);
    }

    pub(crate) fn fill_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = self.timeout.or(timeout);
    }

    pub(crate) fn fill_max_redirects(&mut self, max_redirects: Option<usize>) {
        self.max_redirects = self.max_redirects.or(max_redirects);
    }
}

/// Validates and normalizes a URL setting.
///
/// Validation rules:
/// - Trim surrounding whitespace; blank counts as missing
/// - Parse as an absolute URL with an http or https scheme and a host
/// - Normalize by stripping every trailing slash
pub(crate) fn validate_and_normalize_url(
    var: &'static str,
    raw: &str,
) -> Result<String, ConfigError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ConfigError::MissingField(var));
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| ConfigError::InvalidValue {
        var: var.into(),
        message: format!("must be an absolute http(s) URL with a host: {e}"),
    })?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ConfigError::InvalidValue {
            var: var.into(),
            message: format!("scheme must be http or https, got: {scheme}"),
        });
    }

    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidValue {
            var: var.into(),
            message: "host is required".into(),
        });
    }

    // Keep the caller's spelling (the url crate would append a root slash);
    // only trailing slashes are stripped.
    Ok(trimmed.trim_end_matches('/').to_string())
}
