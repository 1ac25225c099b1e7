//! GCP Client
//!
//! Main client for interacting with GCP APIs, combining authentication
//! and HTTP functionality.

use super::auth::GcpCredentials;
use super::http::GcpHttpClient;
use anyhow::{Context, Result};
use serde_json::Value;
use url::Url;

/// Production endpoint of the Cloud Functions API
pub const FUNCTIONS_ENDPOINT: &str = "https://cloudfunctions.googleapis.com";

/// Main GCP client
#[derive(Clone)]
pub struct GcpClient {
    pub credentials: GcpCredentials,
    pub http: GcpHttpClient,
    pub project_id: String,
    functions_endpoint: String,
}

impl GcpClient {
    /// Create a new GCP client bound to a project
    pub fn new(project_id: &str, credentials: GcpCredentials) -> Result<Self> {
        let http = GcpHttpClient::new()?;

        Ok(Self {
            credentials,
            http,
            project_id: project_id.to_string(),
            functions_endpoint: FUNCTIONS_ENDPOINT.to_string(),
        })
    }

    /// Point the Cloud Functions helpers at another endpoint (emulators, tests)
    pub fn with_functions_endpoint(mut self, endpoint: &str) -> Self {
        self.functions_endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    pub async fn get_token(&self) -> Result<String> {
        self.credentials.get_token().await
    }

    /// Make a GET request to a GCP API
    pub async fn get(&self, url: &str) -> Result<Value> {
        let token = self.get_token().await?;
        self.http.get(url, &token).await
    }

    /// Make a GET request with query parameters appended to `url`
    pub async fn get_with_query(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = Url::parse_with_params(url, query)
            .with_context(|| format!("Invalid request URL: {}", url))?;
        self.get(url.as_str()).await
    }

    // =========================================================================
    // Cloud Functions API helpers
    // =========================================================================

    /// Build Cloud Functions v2 API URL
    pub fn functions_url(&self, path: &str) -> String {
        format!(
            "{}/v2/projects/{}/{}",
            self.functions_endpoint, self.project_id, path
        )
    }

    /// Build Cloud Functions location URL (`-` lists every location)
    pub fn functions_location_url(&self, location: &str, resource: &str) -> String {
        self.functions_url(&format!("locations/{}/{}", location, resource))
    }
}

/// Get the region a zone belongs to (`us-central1-a` -> `us-central1`)
pub fn region_of_zone(zone: &str) -> String {
    let parts: Vec<&str> = zone.rsplitn(2, '-').collect();
    if parts.len() == 2 && parts[0].len() == 1 {
        parts[1].to_string()
    } else {
        zone.to_string()
    }
}
