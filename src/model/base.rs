//! Inventory wire format shared by every cloud-service type
//!
//! These structs are what the inventory platform consumes: the resource
//! envelope, the success and error responses wrapping it, and the
//! cloud-service-type metadata.

use crate::error::CollectError;
use serde::Serialize;
use std::collections::BTreeMap;

pub const PROVIDER: &str = "google_cloud";

const CLOUD_SERVICE_RESOURCE_TYPE: &str = "inventory.CloudService";
const CLOUD_SERVICE_TYPE_RESOURCE_TYPE: &str = "inventory.CloudServiceType";
const ERROR_RESOURCE_TYPE: &str = "inventory.ErrorResource";

/// Back-reference used by the platform to match a collected resource with
/// the one it already knows about
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceModel {
    pub resource_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,
}

/// A data model that can describe its own identity
pub trait Referenceable {
    fn reference(&self) -> ReferenceModel;
}

/// Resource envelope wrapping one provider resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloudServiceResource<T> {
    pub name: String,
    pub account: String,
    pub provider: String,
    pub cloud_service_group: String,
    pub cloud_service_type: String,
    pub tags: BTreeMap<String, String>,
    pub region_code: String,
    pub instance_type: String,
    pub instance_size: f32,
    pub data: T,
    pub reference: ReferenceModel,
}

/// Success response for one collected resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloudServiceResponse<T> {
    pub state: String,
    pub resource_type: String,
    pub match_rules: BTreeMap<String, Vec<String>>,
    pub resource: CloudServiceResource<T>,
}

impl<T> CloudServiceResponse<T> {
    pub fn new(resource: CloudServiceResource<T>) -> Self {
        Self {
            state: "SUCCESS".to_string(),
            resource_type: CLOUD_SERVICE_RESOURCE_TYPE.to_string(),
            match_rules: match_rules(&[
                "reference.resource_id",
                "provider",
                "cloud_service_type",
                "cloud_service_group",
            ]),
            resource,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorAdditionalInfo {
    pub cloud_service_group: String,
    pub cloud_service_type: String,
    pub resource_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResource {
    pub error_code: String,
    pub message: String,
    pub resource_type: String,
    pub additional_info: ErrorAdditionalInfo,
}

/// Error response for one resource that could not be collected.
/// The triggering error is kept for callers but not serialized.
#[derive(Debug, Serialize)]
pub struct ErrorResourceResponse {
    pub state: String,
    pub resource_type: String,
    pub resource: ErrorResource,
    #[serde(skip)]
    pub error: CollectError,
}

impl ErrorResourceResponse {
    /// Build the error response for `resource_id` (empty if the id was never resolved)
    pub fn from_error(
        error: CollectError,
        cloud_service_group: &str,
        cloud_service_type: &str,
        resource_id: &str,
    ) -> Self {
        Self {
            state: "FAILURE".to_string(),
            resource_type: ERROR_RESOURCE_TYPE.to_string(),
            resource: ErrorResource {
                error_code: error.error_code().to_string(),
                message: error.to_string(),
                resource_type: CLOUD_SERVICE_RESOURCE_TYPE.to_string(),
                additional_info: ErrorAdditionalInfo {
                    cloud_service_group: cloud_service_group.to_string(),
                    cloud_service_type: cloud_service_type.to_string(),
                    resource_id: resource_id.to_string(),
                },
            },
            error,
        }
    }

    pub fn resource_id(&self) -> &str {
        &self.resource.additional_info.resource_id
    }
}

/// Metadata describing a cloud-service type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloudServiceType {
    pub name: String,
    pub group: String,
    pub provider: String,
    pub service_code: String,
    pub is_primary: bool,
    pub is_major: bool,
    pub resource_type: String,
    pub labels: Vec<String>,
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloudServiceTypeResponse {
    pub resource_type: String,
    pub match_rules: BTreeMap<String, Vec<String>>,
    pub resource: CloudServiceType,
}

impl CloudServiceTypeResponse {
    pub fn new(resource: CloudServiceType) -> Self {
        Self {
            resource_type: CLOUD_SERVICE_TYPE_RESOURCE_TYPE.to_string(),
            match_rules: match_rules(&["name", "group", "provider"]),
            resource,
        }
    }
}

fn match_rules(keys: &[&str]) -> BTreeMap<String, Vec<String>> {
    BTreeMap::from([(
        "1".to_string(),
        keys.iter().map(|k| k.to_string()).collect(),
    )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResourceResponse::from_error(
            CollectError::UnrecognizedEnvironment("GEN_3".to_string()),
            "CloudFunctions",
            "Function",
            "f1",
        );

        assert_eq!(response.resource_id(), "f1");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "state": "FAILURE",
                "resource_type": "inventory.ErrorResource",
                "resource": {
                    "error_code": "ERROR_UNRECOGNIZED_ENVIRONMENT",
                    "message": "unrecognized environment \"GEN_3\"",
                    "resource_type": "inventory.CloudService",
                    "additional_info": {
                        "cloud_service_group": "CloudFunctions",
                        "cloud_service_type": "Function",
                        "resource_id": "f1"
                    }
                }
            })
        );
    }

    #[test]
    fn test_success_response_match_rules() {
        let resource = CloudServiceResource {
            name: "n".to_string(),
            account: "p".to_string(),
            provider: PROVIDER.to_string(),
            cloud_service_group: "g".to_string(),
            cloud_service_type: "t".to_string(),
            tags: BTreeMap::new(),
            region_code: "r".to_string(),
            instance_type: String::new(),
            instance_size: 0.0,
            data: json!({}),
            reference: ReferenceModel {
                resource_id: "n".to_string(),
                external_link: None,
            },
        };
        let response = CloudServiceResponse::new(resource);

        assert_eq!(response.state, "SUCCESS");
        assert_eq!(response.match_rules["1"][0], "reference.resource_id");
        let value = serde_json::to_value(&response).unwrap();
        assert!(value["resource"]["reference"].get("external_link").is_none());
    }
}
