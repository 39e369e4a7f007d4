//! Metrics collection for CAS-protected requests.
//!
//! This module provides metrics collection for the request executor, including:
//! - Request latency histograms per target round-trip
//! - Counters for target requests, re-authentications and ticket-exchange failures
//! - Error categorization
//!
//! # What this module does NOT handle:
//! - Metrics exposition/export (install a `metrics` recorder in the application)
//! - Persistent storage of metrics
//!
//! # Invariants
//! - Label names are consistent: `method`, `attempt`, `status`, `outcome`, `reason`, `error_category`
//! - Metric recording is infallible and never disturbs a request
//! - A disabled collector records nothing

use crate::auth::TicketFailure;
use crate::error::CasError;
use std::time::Duration;

/// Metric name for request duration histogram.
pub const METRIC_REQUEST_DURATION: &str = "cas_request_duration_seconds";

/// Metric name for total target request counter.
pub const METRIC_REQUESTS_TOTAL: &str = "cas_requests_total";

/// Metric name for re-authentication counter.
pub const METRIC_REAUTHENTICATIONS_TOTAL: &str = "cas_reauthentications_total";

/// Metric name for ticket-exchange failure counter.
pub const METRIC_TICKET_FAILURES_TOTAL: &str = "cas_ticket_exchange_failures_total";

/// Metric name for error counter.
pub const METRIC_ERRORS_TOTAL: &str = "cas_errors_total";

/// Which send of the executor's state machine a target request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// First send, relying on session cookies only.
    Initial,
    /// Resend carrying a fresh service ticket.
    Ticketed,
    /// Resend after another caller re-authenticated.
    Resend,
}

impl Attempt {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Attempt::Initial => "initial",
            Attempt::Ticketed => "ticketed",
            Attempt::Resend => "resend",
        }
    }
}

/// Error categories for metrics labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connection-level errors (refused, DNS, reset)
    Transport,
    /// Request timeout
    Timeout,
    /// Caller cancellation
    Cancelled,
    /// Unsupported request shape or unparseable URL
    Usage,
    /// Client construction errors
    Config,
    /// Unknown/unclassified errors
    Unknown,
}

impl ErrorCategory {
    /// Returns the string label for this error category.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Transport => "transport",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Cancelled => "cancelled",
            ErrorCategory::Usage => "usage",
            ErrorCategory::Config => "config",
            ErrorCategory::Unknown => "unknown",
        }
    }
}

impl From<&CasError> for ErrorCategory {
    fn from(error: &CasError) -> Self {
        match error {
            CasError::Http(e) if e.is_timeout() => ErrorCategory::Timeout,
            CasError::Http(e) if e.is_connect() || e.is_request() => ErrorCategory::Transport,
            CasError::Http(_) => ErrorCategory::Unknown,
            CasError::Cancelled => ErrorCategory::Cancelled,
            CasError::UnsupportedOperation | CasError::InvalidUrl(_) => ErrorCategory::Usage,
            CasError::Config(_) => ErrorCategory::Config,
        }
    }
}

const fn failure_reason(failure: &TicketFailure) -> &'static str {
    match failure {
        TicketFailure::MissingLocationHeader => "missing_location",
        TicketFailure::EmptyLocationHeader => "empty_location",
        TicketFailure::InvalidLocation => "invalid_location",
        TicketFailure::ServiceTicketRejected(_) => "service_ticket_rejected",
        TicketFailure::EmptyTicket => "empty_ticket",
    }
}

/// Metrics collector for CAS requests.
///
/// A lightweight wrapper around the `metrics` crate macros with consistent labels.
///
/// # Example
///
/// ```rust,ignore
/// use cas_client::{CasClient, MetricsCollector};
///
/// let client = CasClient::builder()
///     .from_config(&config)
///     .metrics(MetricsCollector::new())
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    enabled: bool,
}

impl MetricsCollector {
    /// Create a new, enabled metrics collector.
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Create a collector that records nothing.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Check if metrics collection is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record one target round-trip.
    ///
    /// `status` is `None` when the round-trip failed before a response arrived.
    pub fn record_request(
        &self,
        method: &str,
        attempt: Attempt,
        duration: Duration,
        status: Option<u16>,
    ) {
        if !self.enabled {
            return;
        }

        let status_label = status.map_or("error".to_string(), |s| s.to_string());

        metrics::counter!(METRIC_REQUESTS_TOTAL,
            "method" => method.to_string(),
            "attempt" => attempt.as_str(),
        )
        .increment(1);

        metrics::histogram!(METRIC_REQUEST_DURATION,
            "method" => method.to_string(),
            "attempt" => attempt.as_str(),
            "status" => status_label,
        )
        .record(duration.as_secs_f64());
    }

    /// Record the verdict of a re-authentication performed by this caller.
    pub fn record_reauthentication(&self, succeeded: bool) {
        if !self.enabled {
            return;
        }

        let outcome = if succeeded { "succeeded" } else { "failed" };
        metrics::counter!(METRIC_REAUTHENTICATIONS_TOTAL, "outcome" => outcome).increment(1);
    }

    /// Record a ticket exchange that produced no service ticket.
    pub fn record_ticket_failure(&self, failure: &TicketFailure) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_TICKET_FAILURES_TOTAL, "reason" => failure_reason(failure))
            .increment(1);
    }

    /// Record an error returned to the caller.
    pub fn record_error(&self, method: &str, error: &CasError) {
        if !self.enabled {
            return;
        }

        let category = ErrorCategory::from(error);
        metrics::counter!(METRIC_ERRORS_TOTAL,
            "method" => method.to_string(),
            "error_category" => category.as_str(),
        )
        .increment(1);
    }
}
