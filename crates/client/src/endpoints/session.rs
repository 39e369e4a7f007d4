//! Target-service session endpoints.

use cas_config::constants::LOGOUT_PATH;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::error::Result;

/// End the service session with a plain GET to `{service_url}/logout`.
///
/// Returns `true` only for HTTP 200.
pub async fn logout(client: &Client, service_url: &str) -> Result<bool> {
    let url = format!("{}/{}", service_url, LOGOUT_PATH);
    debug!("Logging out via {}", url);

    let response = client.get(&url).send().await?;
    Ok(response.status() == StatusCode::OK)
}
