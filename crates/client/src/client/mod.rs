//! CAS-authenticating HTTP client.
//!
//! This module provides the primary [`CasClient`] for calling services that sit
//! behind a CAS gateway. Requests go out with whatever session cookies the
//! client already holds; when the gateway bounces one to its login page, the
//! client obtains a fresh service ticket and retries once.
//!
//! # Submodules
//! - [`builder`]: Client construction and configuration
//! - `executor`: The per-call authenticate-and-retry state machine
//! - `verbs`: GET/PUT/POST/DELETE and raw send on top of the executor
//! - `session`: Manual login and logout
//!
//! # What this module does NOT handle:
//! - The raw ticket-service round-trips (delegated to [`crate::endpoints`])
//! - Fragment text and login-page detection (see [`crate::protocol`])
//!
//! # Invariants
//! - At most one re-authentication per call, and at most one concurrent
//!   re-authentication per client
//! - Cloning a client shares its cookie jar and re-authentication state

pub mod builder;
mod executor;
mod session;
pub mod verbs;

use std::fmt;
use std::sync::Arc;

use cas_config::TicketParam;

use crate::auth::{AuthObserver, ReauthGate, SessionConfig};
use crate::metrics::MetricsCollector;

pub use executor::{UNABLE_TO_GET_TICKET_PREFIX, UNAUTHORIZED_BODY};

/// Client for a single CAS-protected service.
///
/// # Creating a Client
///
/// ```rust,ignore
/// use cas_client::CasClient;
/// use secrecy::SecretString;
///
/// let client = CasClient::builder()
///     .ticket_service_url("https://sso.example.com/cas/v1/tickets".to_string())
///     .service_url("https://svc.example.com/api".to_string())
///     .credentials("alice".to_string(), SecretString::new("pw".to_string().into()))
///     .build()?;
///
/// let body = client.get_string("https://svc.example.com/api/items").await?;
/// ```
#[derive(Clone)]
pub struct CasClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) session: SessionConfig,
    pub(crate) observer: Option<Arc<dyn AuthObserver>>,
    pub(crate) metrics: Option<MetricsCollector>,
    pub(crate) reauth: ReauthGate,
}

impl CasClient {
    /// Create a new client builder.
    pub fn builder() -> builder::CasClientBuilder {
        builder::CasClientBuilder::new()
    }

    /// Base URL of the protected service, without trailing slash.
    pub fn service_url(&self) -> &str {
        &self.inner.session.service_url
    }

    /// CAS REST ticket endpoint, without trailing slash.
    pub fn ticket_service_url(&self) -> &str {
        &self.inner.session.ticket_service_url
    }

    /// Login page URL whose presence in a final URL signals a lost session.
    pub fn login_redirect_url(&self) -> &str {
        &self.inner.session.login_redirect_url
    }

    pub fn ticket_param(&self) -> TicketParam {
        self.inner.session.ticket_param
    }

    pub fn username(&self) -> &str {
        &self.inner.session.username
    }

    /// The underlying transport, sharing this client's cookie jar.
    pub fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    pub(crate) fn notify_succeeded(&self) {
        if let Some(observer) = &self.inner.observer {
            observer.on_auth_succeeded();
        }
    }

    pub(crate) fn notify_failed(&self, diagnostic: &str) {
        if let Some(observer) = &self.inner.observer {
            observer.on_auth_failed(diagnostic);
        }
    }
}

impl fmt::Debug for CasClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = &self.inner.session;
        f.debug_struct("CasClient")
            .field("ticket_service_url", &session.ticket_service_url)
            .field("service_url", &session.service_url)
            .field("login_redirect_url", &session.login_redirect_url)
            .field("ticket_param", &session.ticket_param)
            .field("username", &session.username)
            .field("observer", &self.inner.observer.is_some())
            .field("metrics", &self.inner.metrics)
            .finish_non_exhaustive()
    }
}
