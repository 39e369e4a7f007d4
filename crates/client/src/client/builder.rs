//! Client builder for constructing [`CasClient`] instances.
//!
//! This module is responsible for:
//! - Providing a fluent builder API for client configuration
//! - Validating required configuration (both endpoints and credentials)
//! - Normalizing the endpoint URLs (removing trailing slashes)
//! - Configuring the underlying HTTP client (cookie jar, timeouts, redirects, TLS verification)
//!
//! # What this module does NOT handle:
//! - Sending requests (handled by the executor and verbs)
//! - Loading configuration from files or the environment (see `cas-config`)
//!
//! # Invariants
//! - Every built client owns exactly one cookie-storing `reqwest::Client`
//! - `skip_verify` only affects HTTPS connections; HTTP-only setups log a warning

use std::sync::Arc;
use std::time::Duration;

use cas_config::{
    Config, TicketParam,
    constants::{DEFAULT_LOGIN_REDIRECT_URL, DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT_SECS},
};
use secrecy::SecretString;
use url::Url;

use crate::auth::{AuthObserver, LoginOutcome, ReauthGate, SessionConfig};
use crate::client::{CasClient, ClientInner};
use crate::error::{CasError, Result};
use crate::metrics::MetricsCollector;
use crate::protocol::normalize_url;

/// Builder for creating a new [`CasClient`].
///
/// Both endpoint URLs and the credentials are required; everything else has
/// a default.
pub struct CasClientBuilder {
    ticket_service_url: Option<String>,
    service_url: Option<String>,
    username: Option<String>,
    password: Option<SecretString>,
    ticket_param: TicketParam,
    login_redirect_url: String,
    skip_verify: bool,
    timeout: Duration,
    max_redirects: usize,
    observer: Option<Arc<dyn AuthObserver>>,
    metrics: Option<MetricsCollector>,
}

impl Default for CasClientBuilder {
    fn default() -> Self {
        Self {
            ticket_service_url: None,
            service_url: None,
            username: None,
            password: None,
            ticket_param: TicketParam::default(),
            login_redirect_url: DEFAULT_LOGIN_REDIRECT_URL.to_string(),
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            observer: None,
            metrics: None,
        }
    }
}

impl CasClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the CAS REST ticket endpoint, e.g. `https://sso.example.com/cas/v1/tickets`.
    pub fn ticket_service_url(mut self, url: String) -> Self {
        self.ticket_service_url = Some(url);
        self
    }

    /// Set the base URL of the protected service.
    ///
    /// Service tickets are requested for this URL, and logout is sent to
    /// `{service_url}/logout`.
    pub fn service_url(mut self, url: String) -> Self {
        self.service_url = Some(url);
        self
    }

    /// Set the CAS username and password.
    pub fn credentials(mut self, username: String, password: SecretString) -> Self {
        self.username = Some(username);
        self.password = Some(password);
        self
    }

    /// Set the query parameter name carrying the service ticket.
    pub fn ticket_param(mut self, param: TicketParam) -> Self {
        self.ticket_param = param;
        self
    }

    /// Services protected by mod_auth_cas expect `ticket`; others expect `SAMLart`.
    pub fn mod_auth_cas(self, mod_auth_cas: bool) -> Self {
        self.ticket_param(TicketParam::from_mod_auth_cas(mod_auth_cas))
    }

    /// Set the login page URL used to detect lost sessions.
    ///
    /// Any final response URL containing this text counts as a redirect to
    /// login. An empty string disables detection. Through `cas-config`, set it
    /// with `with_login_redirect_url(String::new())` or `"login_redirect_url": ""`;
    /// a blank `CAS_LOGIN_REDIRECT_URL` counts as unset.
    pub fn login_redirect_url(mut self, url: String) -> Self {
        self.login_redirect_url = url;
        self
    }

    /// Set whether to skip TLS certificate verification.
    ///
    /// # Security Warning
    /// Only use this in development or testing environments.
    pub fn skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = skip;
        self
    }

    /// Set the per-round-trip timeout. Default is 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how many redirects one round-trip may follow. Default is 10.
    pub fn max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Register an observer for authentication events.
    pub fn observer(mut self, observer: Arc<dyn AuthObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Set the metrics collector.
    pub fn metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Pre-configure the builder from a loaded [`Config`].
    pub fn from_config(mut self, config: &Config) -> Self {
        let connection = &config.connection;

        self.ticket_service_url = Some(connection.ticket_service_url.clone());
        self.service_url = Some(connection.service_url.clone());
        self.login_redirect_url = connection.login_redirect_url.clone();
        self.ticket_param = connection.ticket_param;
        self.skip_verify = connection.skip_verify;
        self.timeout = connection.timeout;
        self.max_redirects = connection.max_redirects;
        self.username = Some(config.auth.username.clone());
        self.password = Some(config.auth.password.clone());
        self
    }

    fn required_url(value: Option<String>, name: &str) -> Result<String> {
        let raw = value.ok_or_else(|| CasError::Config(format!("{name} is required")))?;
        let normalized = normalize_url(raw.trim());

        Url::parse(&normalized).map_err(|e| CasError::InvalidUrl(format!("{name}: {e}")))?;
        Ok(normalized)
    }

    /// Build the [`CasClient`] with the configured options.
    ///
    /// # Errors
    ///
    /// Returns [`CasError::Config`] if an endpoint or the credentials are missing.
    /// Returns [`CasError::InvalidUrl`] if an endpoint cannot be parsed.
    /// Returns [`CasError::Http`] if the HTTP client fails to build.
    pub fn build(self) -> Result<CasClient> {
        let ticket_service_url = Self::required_url(self.ticket_service_url, "ticket_service_url")?;
        let service_url = Self::required_url(self.service_url, "service_url")?;

        let (username, password) = match (self.username, self.password) {
            (Some(username), Some(password)) => (username, password),
            _ => return Err(CasError::Config("credentials are required".to_string())),
        };

        let mut http_builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(self.max_redirects))
            .cookie_store(true);

        if self.skip_verify {
            let is_https =
                ticket_service_url.starts_with("https://") || service_url.starts_with("https://");
            if is_https {
                http_builder = http_builder.danger_accept_invalid_certs(true);
            } else {
                tracing::warn!(
                    "skip_verify=true has no effect on HTTP URLs. TLS verification only applies to HTTPS connections."
                );
            }
        }

        let http = http_builder.build()?;

        tracing::debug!(
            service_url = %service_url,
            ticket_param = %self.ticket_param,
            "Built CAS client"
        );

        Ok(CasClient {
            inner: Arc::new(ClientInner {
                http,
                session: SessionConfig {
                    ticket_service_url,
                    service_url,
                    login_redirect_url: self.login_redirect_url,
                    ticket_param: self.ticket_param,
                    username,
                    password,
                },
                observer: self.observer,
                metrics: self.metrics,
                reauth: ReauthGate::new(),
            }),
        })
    }

    /// Build the client and log in immediately.
    ///
    /// A failed login is reported in the returned [`LoginOutcome`]; the client
    /// is usable either way and will retry authentication on demand.
    pub async fn build_logged_in(self) -> Result<(CasClient, LoginOutcome)> {
        let client = self.build()?;
        let outcome = client.login().await?;
        Ok((client, outcome))
    }
}
