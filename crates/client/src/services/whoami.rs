//! Account information service.

use serde::{Deserialize, Serialize};

use crate::client::CasClient;
use crate::error::Result;
use crate::services::ServiceResponse;

/// User and organisation details returned by the WhoAmI service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(rename = "ID")]
    pub id: Option<String>,
    #[serde(rename = "FirstName")]
    pub first_name: Option<String>,
    #[serde(rename = "LastName")]
    pub last_name: Option<String>,
    #[serde(rename = "Organisation")]
    pub organisation: Option<String>,
    #[serde(rename = "OrganisationCode")]
    pub organisation_code: Option<String>,
    #[serde(rename = "OrganisationID")]
    pub organisation_id: Option<String>,
}

/// Client for a WhoAmI endpoint living at the client's `service_url`.
///
/// The WhoAmI service is usually not behind mod_auth_cas, so build the
/// client with `.mod_auth_cas(false)`.
#[derive(Debug, Clone)]
pub struct WhoAmI {
    client: CasClient,
}

impl WhoAmI {
    pub fn new(client: CasClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &CasClient {
        &self.client
    }

    /// Fetch the authenticated user's details.
    pub async fn tell_me(&self) -> Result<ServiceResponse<UserInfo>> {
        let response = self.client.get(self.client.service_url()).await?;
        ServiceResponse::from_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_info_field_names() {
        let json = r#"{
            "ID": "42",
            "FirstName": "Tim",
            "LastName": "Jansen",
            "Organisation": "Geo BV",
            "OrganisationCode": "GEO",
            "OrganisationID": "7"
        }"#;

        let info: UserInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.id.as_deref(), Some("42"));
        assert_eq!(info.first_name.as_deref(), Some("Tim"));
        assert_eq!(info.organisation_code.as_deref(), Some("GEO"));
        assert_eq!(info.organisation_id.as_deref(), Some("7"));
    }

    #[test]
    fn test_user_info_tolerates_missing_fields() {
        let info: UserInfo = serde_json::from_str(r#"{"FirstName": "Tim"}"#).unwrap();
        assert_eq!(info.first_name.as_deref(), Some("Tim"));
        assert!(info.last_name.is_none());
    }
}
