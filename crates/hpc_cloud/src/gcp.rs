//! Google Cloud implementation of the precondition queries.
//!
//! Projects are looked up through Cloud Resource Manager, regions and zones
//! through the Compute Engine API. Requests are blocking and authenticated
//! with an OAuth2 bearer token.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::{CloudError, CloudResult};
use crate::queries::CloudQueries;

/// Environment variable consulted by [`GcpClientConfig::from_env`].
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

const COMPUTE_ENDPOINT: &str = "https://compute.googleapis.com/compute/v1";
const RESOURCE_MANAGER_ENDPOINT: &str = "https://cloudresourcemanager.googleapis.com/v3";

/// Connection settings for [`GcpClient`].
#[derive(Debug, Clone)]
pub struct GcpClientConfig {
    pub access_token: String,
    pub compute_endpoint: String,
    pub resource_manager_endpoint: String,
}

impl GcpClientConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            compute_endpoint: COMPUTE_ENDPOINT.to_string(),
            resource_manager_endpoint: RESOURCE_MANAGER_ENDPOINT.to_string(),
        }
    }

    /// Read the access token from `GOOGLE_OAUTH_ACCESS_TOKEN`.
    pub fn from_env() -> CloudResult<Self> {
        let token = std::env::var(ACCESS_TOKEN_ENV).map_err(|_| {
            CloudError::MissingCredentials(format!("{} is not set", ACCESS_TOKEN_ENV))
        })?;
        Ok(Self::new(token))
    }

    pub fn with_compute_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.compute_endpoint = endpoint.into();
        self
    }

    pub fn with_resource_manager_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.resource_manager_endpoint = endpoint.into();
        self
    }

    fn project_url(&self, project_id: &str) -> String {
        format!(
            "{}/projects/{}",
            self.resource_manager_endpoint.trim_end_matches('/'),
            project_id
        )
    }

    fn region_url(&self, project_id: &str, region: &str) -> String {
        format!(
            "{}/projects/{}/regions/{}",
            self.compute_endpoint.trim_end_matches('/'),
            project_id,
            region
        )
    }

    fn zone_url(&self, project_id: &str, zone: &str) -> String {
        format!(
            "{}/projects/{}/zones/{}",
            self.compute_endpoint.trim_end_matches('/'),
            project_id,
            zone
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegionResource {
    self_link: String,
}

#[derive(Debug, Deserialize)]
struct ZoneResource {
    region: String,
}

/// Blocking client for the Google Cloud APIs.
pub struct GcpClient {
    client: Client,
    config: GcpClientConfig,
}

impl GcpClient {
    pub fn new(config: GcpClientConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// GET a resource. `Ok(None)` means the API reported it missing or hidden.
    fn get_json<T: DeserializeOwned>(&self, url: &str) -> CloudResult<Option<T>> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.config.access_token)
            .send()?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::FORBIDDEN {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(CloudError::UnexpectedResponse {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(Some(response.json()?))
    }

    fn get_region(&self, project_id: &str, region: &str) -> CloudResult<RegionResource> {
        self.get_json(&self.config.region_url(project_id, region))?
            .ok_or_else(|| CloudError::RegionNotFound {
                project: project_id.to_string(),
                region: region.to_string(),
            })
    }

    fn get_zone(&self, project_id: &str, zone: &str) -> CloudResult<ZoneResource> {
        self.get_json(&self.config.zone_url(project_id, zone))?
            .ok_or_else(|| CloudError::ZoneNotFound {
                project: project_id.to_string(),
                zone: zone.to_string(),
            })
    }
}

impl CloudQueries for GcpClient {
    fn project_exists(&self, project_id: &str) -> CloudResult<()> {
        self.get_json::<serde_json::Value>(&self.config.project_url(project_id))?
            .map(|_| ())
            .ok_or_else(|| CloudError::ProjectNotFound(project_id.to_string()))
    }

    fn region_exists(&self, project_id: &str, region: &str) -> CloudResult<()> {
        self.get_region(project_id, region).map(|_| ())
    }

    fn zone_exists(&self, project_id: &str, zone: &str) -> CloudResult<()> {
        self.get_zone(project_id, zone).map(|_| ())
    }

    fn zone_in_region(&self, project_id: &str, zone: &str, region: &str) -> CloudResult<()> {
        let region_resource = self.get_region(project_id, region)?;
        let zone_resource = self.get_zone(project_id, zone)?;

        if zone_resource.region != region_resource.self_link {
            return Err(CloudError::ZoneNotInRegion {
                project: project_id.to_string(),
                zone: zone.to_string(),
                region: region.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        let config = GcpClientConfig::new("token");
        assert_eq!(
            config.project_url("my-proj"),
            "https://cloudresourcemanager.googleapis.com/v3/projects/my-proj"
        );
        assert_eq!(
            config.region_url("my-proj", "us-central1"),
            "https://compute.googleapis.com/compute/v1/projects/my-proj/regions/us-central1"
        );
        assert_eq!(
            config.zone_url("my-proj", "us-central1-a"),
            "https://compute.googleapis.com/compute/v1/projects/my-proj/zones/us-central1-a"
        );
    }

    #[test]
    fn test_custom_endpoint_trailing_slash() {
        let config = GcpClientConfig::new("token").with_compute_endpoint("http://localhost:8080/");
        assert_eq!(
            config.region_url("p", "r"),
            "http://localhost:8080/projects/p/regions/r"
        );
    }

    #[test]
    fn test_decode_region_and_zone() {
        let region: RegionResource = serde_json::from_str(
            r#"{"name":"us-central1","selfLink":"https://compute.googleapis.com/compute/v1/projects/p/regions/us-central1"}"#,
        )
        .unwrap();
        let zone: ZoneResource = serde_json::from_str(
            r#"{"name":"us-central1-a","region":"https://compute.googleapis.com/compute/v1/projects/p/regions/us-central1"}"#,
        )
        .unwrap();
        assert_eq!(zone.region, region.self_link);
    }
}
