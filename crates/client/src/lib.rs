//! HTTP client for services behind a CAS single-sign-on gateway.
//!
//! [`CasClient`] sends requests with the session cookies it already holds.
//! When the gateway bounces a request to its login page, the client trades
//! the configured credentials for a service ticket, retries once with the
//! ticket in the query string, and hands back the final response. Failed
//! authentication surfaces as a `401` response rather than an error.

mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod metrics;
pub mod protocol;
pub mod services;

pub use auth::{AuthObserver, AuthOutcome, LoginOutcome, ServiceTicket, TicketFailure};
pub use cas_config::TicketParam;
pub use client::builder::CasClientBuilder;
pub use client::verbs::{BodyFactory, RequestOptions};
pub use client::{CasClient, UNABLE_TO_GET_TICKET_PREFIX, UNAUTHORIZED_BODY};
pub use error::{CasError, Result};
pub use metrics::{ErrorCategory, MetricsCollector};
pub use protocol::TicketFragment;
pub use services::{ServiceResponse, UserInfo, WhoAmI};
pub use tokio_util::sync::CancellationToken;
