//! Configuration types for CAS clients.
//!
//! Responsibilities:
//! - Re-export connection, auth and file configuration types.
//!
//! Does NOT handle:
//! - Loading configuration (see `loader` module).

pub mod auth;
pub mod connection;
pub mod file;

pub use auth::AuthConfig;
pub use connection::{Config, ConnectionConfig, TicketParam};
pub use file::FileConfig;
