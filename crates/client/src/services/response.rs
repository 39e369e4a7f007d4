//! Result envelope for JSON service calls.
//!
//! The executor returns raw responses; consumers turn them into a
//! `ServiceResponse<T>` so callers see either a parsed payload or the
//! service's error text, together with the HTTP status.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::Result;

/// HTTP status plus either a parsed payload or an error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse<T> {
    pub status: StatusCode,
    pub result: Option<T>,
    pub error: Option<String>,
}

impl<T> ServiceResponse<T> {
    pub fn successful(result: T, status: StatusCode) -> Self {
        Self {
            status,
            result: Some(result),
            error: None,
        }
    }

    pub fn unsuccessful(error: impl Into<String>, status: StatusCode) -> Self {
        Self {
            status,
            result: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_some()
    }
}

impl<T: DeserializeOwned> ServiceResponse<T> {
    /// Read `response` as JSON when the status is 200, otherwise keep the body
    /// text as the error.
    ///
    /// A 200 body that is not valid JSON for `T` yields an unsuccessful
    /// envelope describing the parse failure.
    pub async fn from_json(response: Response) -> Result<Self> {
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Ok(Self::unsuccessful(body, status));
        }

        match serde_json::from_str(&body) {
            Ok(result) => Ok(Self::successful(result, status)),
            Err(e) => {
                tracing::debug!(line = e.line(), column = e.column(), "Invalid JSON payload");
                Ok(Self::unsuccessful(format!("invalid JSON payload: {e}"), status))
            }
        }
    }
}
