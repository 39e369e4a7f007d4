//! Credential types for CAS configuration.
//!
//! Responsibilities:
//! - Hold the username/password pair exchanged for a ticket-granting ticket.
//! - Handle serialization of the secret password.
//!
//! Does NOT handle:
//! - The ticket exchange itself (see client crate).
//!
//! Invariants:
//! - The password is always a `secrecy::SecretString`, so `Debug` never leaks it.
//! - Serialization includes the password for config file round-trips; secrecy is for runtime safety.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Module for serializing SecretString as strings.
pub(crate) mod secret_string {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize as DeserializeTrait, Serialize as SerializeTrait};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        secret.expose_secret().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SecretString::new(s.into()))
    }
}

/// CAS credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// CAS username.
    pub username: String,
    /// CAS password.
    #[serde(with = "secret_string")]
    pub password: SecretString,
}

impl AuthConfig {
    /// Create credentials from a username and password.
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}
