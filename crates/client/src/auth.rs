//! Credentials, ticket outcomes, and re-authentication coordination.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};

use cas_config::TicketParam;

/// Short-lived ticket scoped to one target service.
///
/// Used once to build a ticket fragment, then dropped.
pub struct ServiceTicket(SecretString);

impl ServiceTicket {
    pub(crate) fn new(ticket: String) -> Self {
        Self(SecretString::new(ticket.into()))
    }

    /// The raw ticket text.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for ServiceTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ServiceTicket([REDACTED])")
    }
}

/// Why the ticket exchange produced no service ticket.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicketFailure {
    #[error("key 'location' not found in response headers")]
    MissingLocationHeader,

    #[error("key 'location' has no values")]
    EmptyLocationHeader,

    #[error("key 'location' does not contain a granting ticket")]
    InvalidLocation,

    #[error("service ticket request rejected with status {0}")]
    ServiceTicketRejected(u16),

    #[error("service ticket response was empty")]
    EmptyTicket,
}

/// Result of one ticket exchange.
#[derive(Debug)]
pub enum AuthOutcome {
    Authenticated(ServiceTicket),
    Failed(TicketFailure),
}

impl AuthOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Result of a manual [`login`](crate::CasClient::login).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn,
    /// Carries the diagnostic text also passed to [`AuthObserver::on_auth_failed`].
    Failed(String),
}

impl LoginOutcome {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, Self::LoggedIn)
    }
}

/// Receives one event per ticket exchange that reaches a verdict.
///
/// Callbacks run synchronously on the task that performed the exchange.
pub trait AuthObserver: Send + Sync {
    fn on_auth_succeeded(&self) {}

    fn on_auth_failed(&self, _diagnostic: &str) {}
}

/// Credentials and endpoints owned by one client.
///
/// URLs are stored without trailing slashes.
#[derive(Debug)]
pub(crate) struct SessionConfig {
    pub ticket_service_url: String,
    pub service_url: String,
    pub login_redirect_url: String,
    pub ticket_param: TicketParam,
    pub username: String,
    pub password: SecretString,
}

/// Outcome of the most recent re-authentication, shared with callers that
/// waited for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReauthVerdict {
    /// The ticketed retry was accepted; the cookie jar holds a live session.
    Succeeded,
    /// A ticket was obtained but the ticketed retry returned 401.
    Rejected,
    /// No ticket could be obtained.
    Failed(String),
}

/// Serializes re-authentication across concurrent callers of one client.
///
/// The generation increases every time a verdict is recorded, so a caller
/// can tell whether someone re-authenticated after its own request started.
#[derive(Debug, Default)]
pub(crate) struct ReauthGate {
    generation: AtomicU64,
    last: Mutex<Option<ReauthVerdict>>,
}

impl ReauthGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub async fn lock(&self) -> ReauthGuard<'_> {
        ReauthGuard {
            gate: self,
            last: self.last.lock().await,
        }
    }
}

/// Exclusive access to the re-authentication slot.
pub(crate) struct ReauthGuard<'a> {
    gate: &'a ReauthGate,
    last: MutexGuard<'a, Option<ReauthVerdict>>,
}

impl ReauthGuard<'_> {
    /// The verdict recorded after `observed`, if any.
    pub fn verdict_since(&self, observed: u64) -> Option<ReauthVerdict> {
        if self.gate.generation() == observed {
            return None;
        }
        self.last.clone()
    }

    pub fn record(&mut self, verdict: ReauthVerdict) {
        *self.last = Some(verdict);
        self.gate.generation.fetch_add(1, Ordering::AcqRel);
    }
}
