//! CAS wire conventions shared by the executor and the ticket endpoints.
//!
//! Responsibilities:
//! - Normalize configured base URLs.
//! - Build the ticket query fragment and attach it to request URLs.
//! - Decide whether a completed exchange ended on the gateway's login page.
//!
//! Does NOT handle:
//! - Any network I/O (see `endpoints` and `client::executor`).
//!
//! Invariants:
//! - Normalized URLs never end with `/`; normalization is idempotent.
//! - The fragment text is `TARGET={service_url}/&{param}={ticket}`, unencoded.

use cas_config::TicketParam;
use cas_config::constants::TARGET_PARAM;
use std::fmt;
use url::Url;

use crate::auth::ServiceTicket;

/// Strip every trailing slash from a base URL.
///
/// - `"https://svc.example.com/"` -> `"https://svc.example.com"`
/// - `"https://svc.example.com//"` -> `"https://svc.example.com"`
pub fn normalize_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// True if `final_url` contains the configured login page URL.
///
/// An empty pattern never matches.
pub fn is_login_redirect(final_url: &Url, login_redirect_url: &str) -> bool {
    !login_redirect_url.is_empty() && final_url.as_str().contains(login_redirect_url)
}

/// Literal query text carrying a service ticket.
#[derive(Clone, PartialEq, Eq)]
pub struct TicketFragment {
    text: String,
}

impl TicketFragment {
    /// Build the fragment for `service_url`, which must already be normalized.
    pub fn new(service_url: &str, param: TicketParam, ticket: &ServiceTicket) -> Self {
        Self {
            text: format!(
                "{TARGET_PARAM}={service_url}/&{}={}",
                param.as_str(),
                ticket.expose()
            ),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Return `url` with the fragment appended to its query string.
    pub fn apply(&self, url: &Url) -> Url {
        let mut url = url.clone();
        let query = match url.query() {
            Some(existing) => format!("{existing}&{}", self.text),
            None => self.text.clone(),
        };
        url.set_query(Some(&query));
        url
    }
}

impl fmt::Debug for TicketFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TicketFragment([REDACTED])")
    }
}
