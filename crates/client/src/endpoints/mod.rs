//! Raw CAS ticket-service and target-service calls.
//!
//! These functions perform single round-trips and never re-authenticate;
//! the executor in [`crate::client`] composes them.

mod session;
mod tickets;

pub use session::logout;
pub use tickets::request_service_ticket;
