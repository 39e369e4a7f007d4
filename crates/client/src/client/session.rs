//! Manual login and logout.
//!
//! Neither is needed for normal use: the executor authenticates on demand.
//! `login` is useful to fail fast on bad credentials before the first real call.
//!
//! # Invariants
//! - `login` takes the same re-authentication lock as the executor and records
//!   its verdict, so concurrent calls reuse it
//! - `logout` is a plain GET and never re-authenticates

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use tracing::{info, warn};
use url::Url;

use crate::auth::{AuthOutcome, LoginOutcome, ReauthVerdict};
use crate::client::CasClient;
use crate::client::executor::UNAUTHORIZED_BODY;
use crate::endpoints;
use crate::error::{CasError, Result};
use crate::metrics::Attempt;
use crate::protocol::TicketFragment;

impl CasClient {
    /// Obtain a service ticket and present it to `service_url`.
    ///
    /// Emits exactly one observer event. Only transport faults are errors.
    pub async fn login(&self) -> Result<LoginOutcome> {
        let session = &self.inner.session;
        let mut guard = self.inner.reauth.lock().await;

        let outcome = endpoints::request_service_ticket(
            &self.inner.http,
            &session.ticket_service_url,
            &session.service_url,
            &session.username,
            session.password.expose_secret(),
        )
        .await?;

        let ticket = match outcome {
            AuthOutcome::Authenticated(ticket) => ticket,
            AuthOutcome::Failed(failure) => {
                let diagnostic = failure.to_string();
                warn!(diagnostic = %diagnostic, "CAS login failed");

                if let Some(metrics) = &self.inner.metrics {
                    metrics.record_ticket_failure(&failure);
                }
                guard.record(ReauthVerdict::Failed(diagnostic.clone()));
                drop(guard);

                self.notify_failed(&diagnostic);
                return Ok(LoginOutcome::Failed(diagnostic));
            }
        };

        let service = Url::parse(&session.service_url)
            .map_err(|e| CasError::InvalidUrl(format!("service_url: {e}")))?;
        let fragment = TicketFragment::new(&session.service_url, session.ticket_param, &ticket);
        let request = self.inner.http.get(fragment.apply(&service)).build()?;
        let response = self.dispatch(request, Attempt::Ticketed, None).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            guard.record(ReauthVerdict::Rejected);
            drop(guard);

            self.notify_failed(UNAUTHORIZED_BODY);
            return Ok(LoginOutcome::Failed(UNAUTHORIZED_BODY.to_string()));
        }

        guard.record(ReauthVerdict::Succeeded);
        drop(guard);

        info!(username = %session.username, "CAS login succeeded");
        self.notify_succeeded();
        Ok(LoginOutcome::LoggedIn)
    }

    /// End the service session. Returns `true` iff the service answered 200.
    pub async fn logout(&self) -> Result<bool> {
        endpoints::logout(&self.inner.http, &self.inner.session.service_url).await
    }
}
