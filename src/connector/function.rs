//! Cloud Functions connector
//!
//! Lists functions through the Cloud Functions v2 REST API, following
//! `nextPageToken` until the listing is exhausted.

use super::{ConnectorLocator, FunctionConnector};
use crate::gcp::auth::GcpCredentials;
use crate::gcp::client::{region_of_zone, GcpClient};
use crate::model::RawFunctionRecord;
use crate::params::CollectParams;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Location wildcard understood by the API
const ALL_LOCATIONS: &str = "-";

const PAGE_SIZE: &str = "100";

/// Result of one page fetch
pub struct PaginatedResult {
    pub items: Vec<RawFunctionRecord>,
    pub next_token: Option<String>,
}

pub struct CloudFunctionsConnector {
    client: GcpClient,
    locations: Vec<String>,
    filter: Option<String>,
}

impl CloudFunctionsConnector {
    pub fn new(client: GcpClient) -> Self {
        Self {
            client,
            locations: vec![ALL_LOCATIONS.to_string()],
            filter: None,
        }
    }

    /// Restrict the listing to the regions the given zones belong to.
    /// No zones means every location.
    pub fn with_zones(mut self, zones: &[String]) -> Self {
        self.locations = locations_for_zones(zones);
        self
    }

    pub fn with_filter(mut self, filter: Option<&str>) -> Self {
        self.filter = filter.map(|f| f.to_string());
        self
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// Fetch one page of functions in `location`
    pub async fn list_functions_paginated(
        &self,
        location: &str,
        page_token: Option<&str>,
    ) -> Result<PaginatedResult> {
        let url = self.client.functions_location_url(location, "functions");

        let mut query = vec![("pageSize", PAGE_SIZE)];
        if let Some(filter) = self.filter.as_deref() {
            query.push(("filter", filter));
        }
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response = self.client.get_with_query(&url, &query).await?;

        if let Some(unreachable) = response.get("unreachable").and_then(|v| v.as_array()) {
            if !unreachable.is_empty() {
                tracing::warn!("Unreachable locations while listing functions: {:?}", unreachable);
            }
        }

        let items = extract_items(&response);

        let next_token = response
            .get("nextPageToken")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        Ok(PaginatedResult { items, next_token })
    }
}

#[async_trait]
impl FunctionConnector for CloudFunctionsConnector {
    async fn list_functions(&self) -> Result<Vec<RawFunctionRecord>> {
        let mut all_items = Vec::new();

        for location in &self.locations {
            let mut page_token: Option<String> = None;

            loop {
                let result = self
                    .list_functions_paginated(location, page_token.as_deref())
                    .await?;
                all_items.extend(result.items);

                let Some(next_token) = result.next_token else {
                    break;
                };
                if page_token.as_deref() == Some(next_token.as_str()) {
                    anyhow::bail!(
                        "Cloud Functions API repeated page token {:?} for location {}",
                        next_token,
                        location
                    );
                }
                page_token = Some(next_token);
            }
        }

        tracing::debug!(
            "Listed {} functions in project {}",
            all_items.len(),
            self.client.project_id
        );

        Ok(all_items)
    }
}

/// Builds [`CloudFunctionsConnector`]s from collection parameters
#[derive(Debug, Clone, Default)]
pub struct GcpConnectorLocator {
    access_token: Option<String>,
    endpoint: Option<String>,
}

impl GcpConnectorLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authenticate with this token instead of the secret data
    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }

    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.endpoint = endpoint;
        self
    }
}

#[async_trait]
impl ConnectorLocator for GcpConnectorLocator {
    async fn function_connector(
        &self,
        params: &CollectParams,
    ) -> Result<Box<dyn FunctionConnector>> {
        let project_id = params.project_id()?;

        let credentials = match self.access_token.as_deref() {
            Some(token) => GcpCredentials::from_token(token),
            None => GcpCredentials::from_secret_data(&params.secret_data).await?,
        };

        let mut client = GcpClient::new(project_id, credentials)?;
        if let Some(endpoint) = self.endpoint.as_deref() {
            client = client.with_functions_endpoint(endpoint);
        }

        let connector = CloudFunctionsConnector::new(client)
            .with_zones(&params.zones)
            .with_filter(params.filter_expression());

        Ok(Box::new(connector))
    }
}

/// Unique regions of `zones`, in first-seen order
fn locations_for_zones(zones: &[String]) -> Vec<String> {
    let mut locations: Vec<String> = Vec::new();
    for zone in zones {
        let region = region_of_zone(zone);
        if !locations.contains(&region) {
            locations.push(region);
        }
    }

    if locations.is_empty() {
        locations.push(ALL_LOCATIONS.to_string());
    }
    locations
}

fn extract_items(response: &Value) -> Vec<RawFunctionRecord> {
    let Some(functions) = response.get("functions").and_then(|v| v.as_array()) else {
        return vec![];
    };

    functions
        .iter()
        .filter_map(|item| match item.as_object() {
            Some(map) => Some(map.clone()),
            None => {
                tracing::warn!("Skipping non-object entry in functions listing");
                None
            }
        })
        .collect()
}
