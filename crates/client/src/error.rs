//! Error types for the CAS client.
//!
//! Ticket-exchange failures and rejected retries are not errors: the executor
//! reports them as synthetic `401` responses. `CasError` covers only what
//! prevents a response from being produced at all.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, CasError>;

/// Errors that can occur during CAS client operations.
#[derive(Error, Debug)]
pub enum CasError {
    /// The method and body combination cannot be turned into a request.
    #[error("Request not supported: this method and body combination cannot be sent")]
    UnsupportedOperation,

    /// A caller or configuration URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Transport fault (connection, TLS, timeout, redirect loop, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The caller's cancellation token fired.
    #[error("Request cancelled")]
    Cancelled,

    /// The client could not be constructed.
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl CasError {
    /// Check if this error was caused by caller cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Check if this error indicates a caller bug rather than a runtime condition.
    pub fn is_programmer_error(&self) -> bool {
        matches!(self, Self::UnsupportedOperation | Self::InvalidUrl(_))
    }

    /// Check if this error is a transport timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(CasError::Cancelled.is_cancelled());
        assert!(!CasError::UnsupportedOperation.is_cancelled());

        assert!(CasError::UnsupportedOperation.is_programmer_error());
        assert!(CasError::InvalidUrl("nope".to_string()).is_programmer_error());
        assert!(!CasError::Cancelled.is_programmer_error());
        assert!(!CasError::Config("x".to_string()).is_timeout());
    }

    #[test]
    fn test_error_display() {
        let err = CasError::InvalidUrl("relative URL without a base".to_string());
        assert_eq!(err.to_string(), "Invalid URL: relative URL without a base");

        let err = CasError::Config("service_url is required".to_string());
        assert!(err.to_string().contains("service_url is required"));
    }
}
