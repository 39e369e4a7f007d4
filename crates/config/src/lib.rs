//! Configuration management for CAS-protected service clients.
//!
//! This crate provides types and loaders for the credentials and endpoint
//! settings a CAS client needs, sourced from builder calls, environment
//! variables, `.env` files, and JSON configuration files.

pub mod constants;
mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, env_var_or_none};
pub use types::{AuthConfig, Config, ConnectionConfig, FileConfig, TicketParam};
