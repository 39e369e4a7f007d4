//! Per-call authenticate-and-retry state machine.
//!
//! Responsibilities:
//! - Send a request relying on session cookies alone.
//! - Detect a redirect to the CAS login page and run the ticket exchange.
//! - Resend once with the ticket fragment and map the outcome to a response.
//!
//! Does NOT handle:
//! - Building requests (the caller's closure does; see `verbs`).
//! - The ticket-service round-trips themselves (see `endpoints::tickets`).
//!
//! Invariants:
//! - At most two target round-trips and one ticket exchange per call.
//! - Exchange failures and rejected retries become synthetic `401` responses,
//!   never errors.
//! - Only one caller per client runs an exchange at a time; callers that
//!   waited for it reuse its verdict instead of exchanging again.
//! - Once the cancellation token fires, no further round-trip starts.

use std::future::Future;
use std::time::Instant;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Request, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::auth::{AuthOutcome, ReauthVerdict};
use crate::client::CasClient;
use crate::endpoints;
use crate::error::{CasError, Result};
use crate::metrics::Attempt;
use crate::protocol::{TicketFragment, is_login_redirect};

/// Body prefix of the synthetic `401` returned when no ticket could be obtained.
pub const UNABLE_TO_GET_TICKET_PREFIX: &str = "CAS: Unable to get ticket, ";

/// Body of the synthetic `401` returned when the ticketed retry is rejected.
pub const UNAUTHORIZED_BODY: &str = "CAS: Unauthorized";

impl CasClient {
    /// Run one request through the authenticate-and-retry state machine.
    ///
    /// `build` is called with `None` for the plain attempt and with the ticket
    /// fragment for the retry; it must describe the same request both times.
    /// Returning `None` fails the call with [`CasError::UnsupportedOperation`].
    pub async fn execute<F>(&self, build: F, cancel: Option<&CancellationToken>) -> Result<Response>
    where
        F: Fn(Option<&TicketFragment>) -> Option<RequestBuilder> + Send + Sync,
    {
        let observed = self.inner.reauth.generation();

        let request = match build(None) {
            Some(builder) => builder.build().map_err(CasError::from),
            None => Err(CasError::UnsupportedOperation),
        };
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                self.record_error("unknown", &e);
                return Err(e);
            }
        };

        let method = request.method().clone();
        let result = self.run(&build, request, observed, cancel).await;
        if let Err(e) = &result {
            self.record_error(method.as_str(), e);
        }
        result
    }

    async fn run<F>(
        &self,
        build: &F,
        request: Request,
        observed: u64,
        cancel: Option<&CancellationToken>,
    ) -> Result<Response>
    where
        F: Fn(Option<&TicketFragment>) -> Option<RequestBuilder> + Send + Sync,
    {
        let session = &self.inner.session;

        let response = self.dispatch(request, Attempt::Initial, cancel).await?;
        if !is_login_redirect(response.url(), &session.login_redirect_url) {
            return Ok(response);
        }
        drop(response);

        info!(service_url = %session.service_url, "Redirected to CAS login, re-authenticating");

        let mut guard = with_cancel(cancel, async { Ok(self.inner.reauth.lock().await) }).await?;

        if let Some(verdict) = guard.verdict_since(observed) {
            drop(guard);
            return self.reuse_verdict(build, verdict, cancel).await;
        }

        let outcome = with_cancel(
            cancel,
            endpoints::request_service_ticket(
                &self.inner.http,
                &session.ticket_service_url,
                &session.service_url,
                &session.username,
                session.password.expose_secret(),
            ),
        )
        .await?;

        let ticket = match outcome {
            AuthOutcome::Authenticated(ticket) => ticket,
            AuthOutcome::Failed(failure) => {
                let diagnostic = failure.to_string();
                warn!(diagnostic = %diagnostic, "CAS ticket exchange failed");

                if let Some(metrics) = &self.inner.metrics {
                    metrics.record_ticket_failure(&failure);
                    metrics.record_reauthentication(false);
                }
                guard.record(ReauthVerdict::Failed(diagnostic.clone()));
                drop(guard);

                self.notify_failed(&diagnostic);
                return Ok(unauthorized(format!(
                    "{UNABLE_TO_GET_TICKET_PREFIX}{diagnostic}"
                )));
            }
        };

        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(CasError::Cancelled);
        }

        let fragment = TicketFragment::new(&session.service_url, session.ticket_param, &ticket);
        let request = build(Some(&fragment))
            .ok_or(CasError::UnsupportedOperation)?
            .build()?;
        let response = self.dispatch(request, Attempt::Ticketed, cancel).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("Ticketed request rejected by the service");
            if let Some(metrics) = &self.inner.metrics {
                metrics.record_reauthentication(false);
            }
            guard.record(ReauthVerdict::Rejected);
            return Ok(unauthorized(UNAUTHORIZED_BODY));
        }

        if let Some(metrics) = &self.inner.metrics {
            metrics.record_reauthentication(true);
        }
        guard.record(ReauthVerdict::Succeeded);
        drop(guard);

        info!("CAS re-authentication succeeded");
        self.notify_succeeded();
        Ok(response)
    }

    /// Finish a call whose re-authentication was performed by another caller.
    async fn reuse_verdict<F>(
        &self,
        build: &F,
        verdict: ReauthVerdict,
        cancel: Option<&CancellationToken>,
    ) -> Result<Response>
    where
        F: Fn(Option<&TicketFragment>) -> Option<RequestBuilder> + Send + Sync,
    {
        match verdict {
            ReauthVerdict::Failed(diagnostic) => Ok(unauthorized(format!(
                "{UNABLE_TO_GET_TICKET_PREFIX}{diagnostic}"
            ))),
            ReauthVerdict::Rejected => Ok(unauthorized(UNAUTHORIZED_BODY)),
            ReauthVerdict::Succeeded => {
                debug!("Reusing session from a concurrent re-authentication");

                let request = build(None)
                    .ok_or(CasError::UnsupportedOperation)?
                    .build()?;
                let response = self.dispatch(request, Attempt::Resend, cancel).await?;

                if is_login_redirect(response.url(), &self.inner.session.login_redirect_url) {
                    return Ok(unauthorized(UNAUTHORIZED_BODY));
                }
                Ok(response)
            }
        }
    }

    /// One target round-trip, raced against cancellation and timed.
    pub(crate) async fn dispatch(
        &self,
        request: Request,
        attempt: Attempt,
        cancel: Option<&CancellationToken>,
    ) -> Result<Response> {
        let method = request.method().clone();
        debug!(
            method = %method,
            path = request.url().path(),
            attempt = attempt.as_str(),
            "Sending request"
        );

        let start = Instant::now();
        let result = with_cancel(cancel, async {
            self.inner.http.execute(request).await.map_err(CasError::from)
        })
        .await;

        if let Some(metrics) = &self.inner.metrics {
            let status = result.as_ref().ok().map(|r| r.status().as_u16());
            metrics.record_request(method.as_str(), attempt, start.elapsed(), status);
        }

        result
    }

    fn record_error(&self, method: &str, error: &CasError) {
        if let Some(metrics) = &self.inner.metrics {
            metrics.record_error(method, error);
        }
    }
}

/// Await `fut` unless `cancel` fires first.
async fn with_cancel<T, Fut>(cancel: Option<&CancellationToken>, fut: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    match cancel {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(CasError::Cancelled),
            result = fut => result,
        },
        None => fut.await,
    }
}

/// Locally built `401 Unauthorized` response with a plain-text body.
pub(crate) fn unauthorized(body: impl Into<String>) -> Response {
    let mut response = http::Response::new(body.into());
    *response.status_mut() = StatusCode::UNAUTHORIZED;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    Response::from(response)
}
