//! Two-step CAS REST ticket exchange.
//!
//! Responsibilities:
//! - Trade credentials for a granting ticket (TGT) at the ticket service.
//! - Trade the TGT for a service ticket (ST) scoped to one service URL.
//!
//! Does NOT handle:
//! - Retries (none are performed here).
//! - Deciding when an exchange is needed (see `client::executor`).
//!
//! Invariants:
//! - At most two round-trips per call.
//! - Protocol failures are returned as `AuthOutcome::Failed`; only transport
//!   faults become `Err`.
//! - Neither ticket is logged.

use reqwest::Client;
use reqwest::header::{HeaderMap, LOCATION};
use tracing::debug;
use url::Url;

use crate::auth::{AuthOutcome, ServiceTicket, TicketFailure};
use crate::error::Result;

/// Run the full exchange for `service_url`.
///
/// `ticket_service_url` and `service_url` must already be normalized.
pub async fn request_service_ticket(
    client: &Client,
    ticket_service_url: &str,
    service_url: &str,
    username: &str,
    password: &str,
) -> Result<AuthOutcome> {
    debug!("Requesting granting ticket for {}", username);

    let response = client
        .post(ticket_service_url)
        .form(&[("username", username), ("password", password)])
        .send()
        .await?;

    let tgt = match granting_ticket(ticket_service_url, response.headers()) {
        Ok(tgt) => tgt,
        Err(failure) => {
            debug!(status = response.status().as_u16(), "No granting ticket issued");
            return Ok(AuthOutcome::Failed(failure));
        }
    };

    debug!("Requesting service ticket for {}", service_url);

    let response = client
        .post(format!("{}/{}", ticket_service_url, tgt))
        .form(&[("service", service_url)])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Ok(AuthOutcome::Failed(TicketFailure::ServiceTicketRejected(
            status.as_u16(),
        )));
    }

    let ticket = response.text().await?;
    if ticket.is_empty() {
        return Ok(AuthOutcome::Failed(TicketFailure::EmptyTicket));
    }

    Ok(AuthOutcome::Authenticated(ServiceTicket::new(ticket)))
}

/// Extract the TGT id from the `Location` header of the first exchange call.
///
/// Relative locations are resolved against the ticket service URL.
fn granting_ticket(
    ticket_service_url: &str,
    headers: &HeaderMap,
) -> std::result::Result<String, TicketFailure> {
    let value = headers
        .get(LOCATION)
        .ok_or(TicketFailure::MissingLocationHeader)?;

    if value.is_empty() {
        return Err(TicketFailure::EmptyLocationHeader);
    }

    let raw = value
        .to_str()
        .map_err(|_| TicketFailure::InvalidLocation)?
        .trim();

    let location = match Url::parse(raw) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(ticket_service_url)
            .and_then(|base| base.join(raw))
            .map_err(|_| TicketFailure::InvalidLocation)?,
        Err(_) => return Err(TicketFailure::InvalidLocation),
    };

    location
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .map(str::to_string)
        .ok_or(TicketFailure::InvalidLocation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    const TICKETS: &str = "https://sso.example.com/cas/v1/tickets";

    fn headers_with_location(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(LOCATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_granting_ticket_from_absolute_location() {
        let headers = headers_with_location("https://sso.example.com/cas/v1/tickets/TGT-42-abc");
        assert_eq!(granting_ticket(TICKETS, &headers).unwrap(), "TGT-42-abc");
    }

    #[test]
    fn test_granting_ticket_from_relative_location() {
        let headers = headers_with_location("/cas/v1/tickets/TGT-7");
        assert_eq!(granting_ticket(TICKETS, &headers).unwrap(), "TGT-7");
    }

    #[test]
    fn test_granting_ticket_ignores_trailing_slash() {
        let headers = headers_with_location("https://sso.example.com/cas/v1/tickets/TGT-8/");
        assert_eq!(granting_ticket(TICKETS, &headers).unwrap(), "TGT-8");
    }

    #[test]
    fn test_granting_ticket_missing_header() {
        assert_eq!(
            granting_ticket(TICKETS, &HeaderMap::new()),
            Err(TicketFailure::MissingLocationHeader)
        );
    }

    #[test]
    fn test_granting_ticket_empty_header() {
        let headers = headers_with_location("");
        assert_eq!(
            granting_ticket(TICKETS, &headers),
            Err(TicketFailure::EmptyLocationHeader)
        );
    }

    #[test]
    fn test_granting_ticket_without_segment() {
        let headers = headers_with_location("https://sso.example.com/");
        assert_eq!(
            granting_ticket(TICKETS, &headers),
            Err(TicketFailure::InvalidLocation)
        );
    }
}
