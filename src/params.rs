//! Collection parameters handed over by the inventory platform

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectParams {
    /// Collector options, passed through untouched
    #[serde(default)]
    pub options: Map<String, Value>,
    #[serde(default)]
    pub schema: Option<String>,
    /// Credentials; must at least carry `project_id`
    #[serde(default, alias = "secretData")]
    pub secret_data: Map<String, Value>,
    /// A string filter is forwarded to the list call, anything else is ignored
    #[serde(default)]
    pub filter: Value,
    #[serde(default)]
    pub zones: Vec<String>,
}

impl CollectParams {
    /// Parameters for a single project with no other settings
    pub fn for_project(project_id: &str) -> Self {
        let mut secret_data = Map::new();
        secret_data.insert(
            "project_id".to_string(),
            Value::String(project_id.to_string()),
        );
        Self {
            secret_data,
            ..Self::default()
        }
    }

    pub fn project_id(&self) -> Result<&str> {
        self.secret_data
            .get("project_id")
            .or_else(|| self.secret_data.get("projectId"))
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .context("secret_data is missing project_id")
    }

    pub fn filter_expression(&self) -> Option<&str> {
        self.filter.as_str().filter(|s| !s.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_platform_params() {
        let params: CollectParams = serde_json::from_value(json!({
            "options": {"cloud_service_types": ["Function"]},
            "secret_data": {"project_id": "p1", "client_email": "a@b"},
            "filter": {},
            "zones": ["us-central1-a"]
        }))
        .unwrap();

        assert_eq!(params.project_id().unwrap(), "p1");
        assert_eq!(params.zones, vec!["us-central1-a"]);
        assert!(params.filter_expression().is_none());
    }

    #[test]
    fn test_camel_case_aliases() {
        let params: CollectParams =
            serde_json::from_value(json!({"secretData": {"projectId": "p2"}})).unwrap();
        assert_eq!(params.project_id().unwrap(), "p2");
    }

    #[test]
    fn test_missing_project_id_fails() {
        let params = CollectParams::default();
        assert!(params.project_id().is_err());
    }

    #[test]
    fn test_filter_expression() {
        let mut params = CollectParams::for_project("p1");
        params.filter = json!("state = ACTIVE");
        assert_eq!(params.filter_expression(), Some("state = ACTIVE"));

        params.filter = json!("  ");
        assert!(params.filter_expression().is_none());
    }
}
