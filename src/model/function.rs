//! Cloud Functions data model

use super::base::{
    CloudServiceResource, CloudServiceResponse, CloudServiceType, CloudServiceTypeResponse,
    ReferenceModel, Referenceable, PROVIDER,
};
use crate::error::CollectError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const CLOUD_SERVICE_GROUP: &str = "CloudFunctions";
pub const CLOUD_SERVICE_TYPE: &str = "Function";

const ICON_URL: &str = concat!(
    "https://spaceone-custom-assets.s3.ap-northeast-2.amazonaws.com",
    "/console-assets/icons/cloud-services/google_cloud/Cloud-Functions.svg"
);

/// A function exactly as listed by the Cloud Functions API
pub type RawFunctionRecord = Map<String, Value>;

pub type FunctionResource = CloudServiceResource<Function>;
pub type FunctionResponse = CloudServiceResponse<Function>;

/// Generation of the function-hosting runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Gen1,
    Gen2,
    Unspecified,
}

impl Environment {
    /// Human-readable label shown in the console
    pub fn label(self) -> &'static str {
        match self {
            Environment::Gen1 => "1st gen",
            Environment::Gen2 => "2nd gen",
            Environment::Unspecified => "unspecified",
        }
    }

    /// Value of the console's `env` query parameter
    fn console_param(self) -> Option<&'static str> {
        match self {
            Environment::Gen1 => Some("gen1"),
            Environment::Gen2 => Some("gen2"),
            Environment::Unspecified => None,
        }
    }
}

impl FromStr for Environment {
    type Err = CollectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GEN_1" => Ok(Environment::Gen1),
            "GEN_2" => Ok(Environment::Gen2),
            "ENVIRONMENT_UNSPECIFIED" => Ok(Environment::Unspecified),
            other => Err(CollectError::UnrecognizedEnvironment(other.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Presentation fields recomputed on every pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDisplay {
    pub environment: String,
    pub function_id: String,
    pub last_deployed: String,
    pub region: String,
}

/// A listed function augmented with its project and display fields.
///
/// Only the fields the collector reads are typed; every other provider field
/// lands in `extra` and is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    pub name: String,
    #[serde(default)]
    pub labels: Option<BTreeMap<String, String>>,
    pub environment: String,
    pub update_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_config: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_config: Option<Value>,
    pub project: String,
    pub display: FunctionDisplay,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Function {
    /// Merge `project` and `display` into a copy of the raw record.
    /// Unknown fields are kept, never rejected.
    pub fn from_raw(
        raw: &RawFunctionRecord,
        project_id: &str,
        display: FunctionDisplay,
    ) -> Result<Self, CollectError> {
        let mut merged = raw.clone();
        merged.insert("project".to_string(), Value::String(project_id.to_string()));
        merged.insert("display".to_string(), serde_json::to_value(display)?);
        Ok(serde_json::from_value(Value::Object(merged))?)
    }
}

impl Referenceable for Function {
    fn reference(&self) -> ReferenceModel {
        let mut link = format!(
            "https://console.cloud.google.com/functions/details/{}/{}?",
            self.display.region, self.display.function_id
        );
        if let Some(env) = self
            .environment
            .parse::<Environment>()
            .ok()
            .and_then(Environment::console_param)
        {
            link.push_str(&format!("env={}&", env));
        }
        link.push_str(&format!("project={}", urlencoding::encode(&self.project)));

        ReferenceModel {
            resource_id: self.name.clone(),
            external_link: Some(link),
        }
    }
}

/// Metadata of the Cloud Functions cloud-service type
pub fn cloud_service_type() -> CloudServiceType {
    CloudServiceType {
        name: CLOUD_SERVICE_TYPE.to_string(),
        group: CLOUD_SERVICE_GROUP.to_string(),
        provider: PROVIDER.to_string(),
        service_code: "Cloud Functions".to_string(),
        is_primary: true,
        is_major: true,
        resource_type: "inventory.CloudService".to_string(),
        labels: vec!["Compute".to_string()],
        tags: BTreeMap::from([("spaceone:icon".to_string(), ICON_URL.to_string())]),
    }
}

pub fn cloud_service_types() -> Vec<CloudServiceTypeResponse> {
    vec![CloudServiceTypeResponse::new(cloud_service_type())]
}
