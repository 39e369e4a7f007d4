//! File configuration types.
//!
//! Responsibilities:
//! - Define `FileConfig`, the partial configuration read from a JSON file.
//!
//! Does NOT handle:
//! - Reading the file or merging it (see `loader` module).
//!
//! Invariants:
//! - All fields are optional so a file may supply any subset of settings.

use serde::{Deserialize, Serialize};

use crate::types::auth::secret_string;
use crate::types::connection::TicketParam;
use secrecy::SecretString;

/// Partial configuration as stored in a JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// CAS REST ticket endpoint
    pub ticket_service_url: Option<String>,
    /// Base URL of the protected service
    pub service_url: Option<String>,
    /// Login page URL used to detect lost sessions
    pub login_redirect_url: Option<String>,
    /// Ticket query parameter convention
    pub ticket_param: Option<TicketParam>,
    /// CAS username
    pub username: Option<String>,
    /// CAS password
    #[serde(with = "optional_secret", skip_serializing_if = "Option::is_none")]
    pub password: Option<SecretString>,
    /// Whether to skip TLS verification
    pub skip_verify: Option<bool>,
    /// Request timeout in seconds
    pub timeout_seconds: Option<u64>,
    /// Maximum redirects followed per request
    pub max_redirects: Option<usize>,
}

mod optional_secret {
    use super::secret_string;
    use secrecy::SecretString;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(secret: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match secret {
            Some(secret) => secret_string::serialize(secret, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.map(|s| SecretString::new(s.into())))
    }
}
