//! Centralized constants for the CAS client workspace.
//!
//! Default values shared by the config and client crates live here so
//! neither crate carries magic numbers of its own.

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum allowed request timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Default maximum number of HTTP redirects to follow.
///
/// A CAS login bounce is usually two hops (service -> gateway -> login page),
/// so this leaves headroom for gateways that chain a few more.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Maximum allowed redirect limit.
pub const MAX_MAX_REDIRECTS: usize = 50;

// =============================================================================
// CAS Protocol Defaults
// =============================================================================

/// Login page the gateway redirects unauthenticated requests to.
///
/// Gateways move their login page over time; override it per deployment.
pub const DEFAULT_LOGIN_REDIRECT_URL: &str = "https://services.geodan.nl/cas/login";

/// Query parameter carrying the service target in a ticket fragment.
pub const TARGET_PARAM: &str = "TARGET";

/// Path appended to the service URL to end a session.
pub const LOGOUT_PATH: &str = "logout";
