//! Cloud Functions manager
//!
//! Lists every function of a project and normalizes each one into a
//! cloud-service resource. A function that cannot be normalized becomes an
//! error response; it never aborts the rest of the pass.

use super::RegionTracker;
use crate::connector::ConnectorLocator;
use crate::error::CollectError;
use crate::model::base::PROVIDER;
use crate::model::function::{CLOUD_SERVICE_GROUP, CLOUD_SERVICE_TYPE};
use crate::model::{
    Environment, ErrorResourceResponse, Function, FunctionDisplay, FunctionResource,
    FunctionResponse, RawFunctionRecord, Referenceable,
};
use crate::params::CollectParams;
use anyhow::Result;
use chrono::{Duration, NaiveDateTime};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Largest accepted display offset, in hours
const MAX_OFFSET_HOURS: i32 = 24;

/// Fixed offset applied to UTC deployment times before display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOffset {
    hours: i32,
}

impl DisplayOffset {
    pub const KST: DisplayOffset = DisplayOffset { hours: 9 };

    pub fn from_hours(hours: i32) -> Result<Self> {
        if hours.abs() > MAX_OFFSET_HOURS {
            anyhow::bail!(
                "display offset must be within +/-{} hours, got {}",
                MAX_OFFSET_HOURS,
                hours
            );
        }
        Ok(Self { hours })
    }

    pub fn hours(self) -> i32 {
        self.hours
    }

    fn as_duration(self) -> Duration {
        Duration::hours(i64::from(self.hours))
    }
}

impl Default for DisplayOffset {
    fn default() -> Self {
        Self::KST
    }
}

pub struct FunctionManager {
    locator: Arc<dyn ConnectorLocator>,
    display_offset: DisplayOffset,
}

impl FunctionManager {
    pub fn new(locator: Arc<dyn ConnectorLocator>) -> Self {
        Self {
            locator,
            display_offset: DisplayOffset::default(),
        }
    }

    pub fn with_display_offset(mut self, offset: DisplayOffset) -> Self {
        self.display_offset = offset;
        self
    }

    pub fn cloud_service_group(&self) -> &'static str {
        CLOUD_SERVICE_GROUP
    }

    pub fn cloud_service_type(&self) -> &'static str {
        CLOUD_SERVICE_TYPE
    }

    /// Run one collection pass.
    ///
    /// Failing to resolve the project, build the connector, or list functions
    /// fails the whole pass. Anything that goes wrong for a single function
    /// ends up in the returned error responses instead.
    pub async fn collect_cloud_service(
        &self,
        params: &CollectParams,
        regions: &mut dyn RegionTracker,
    ) -> Result<(Vec<FunctionResponse>, Vec<ErrorResourceResponse>)> {
        let span = tracing::info_span!(
            "collect_cloud_service",
            run_id = %Uuid::new_v4(),
            group = CLOUD_SERVICE_GROUP,
            cloud_service_type = CLOUD_SERVICE_TYPE,
        );

        async move {
            tracing::debug!("** [{}] {} START **", CLOUD_SERVICE_GROUP, CLOUD_SERVICE_TYPE);
            let start_time = Instant::now();

            let project_id = params.project_id()?;
            let connector = self.locator.function_connector(params).await?;
            let functions = connector.list_functions().await?;

            let (cloud_services, error_responses) =
                self.collect_records(&functions, project_id, regions);

            tracing::info!(
                "Collected {} functions ({} errors) from project {}",
                cloud_services.len(),
                error_responses.len(),
                project_id
            );
            tracing::debug!(
                "** Function Finished {:.3} Seconds **",
                start_time.elapsed().as_secs_f64()
            );

            Ok::<_, anyhow::Error>((cloud_services, error_responses))
        }
        .instrument(span)
        .await
    }

    /// Normalize already listed records, one response per record
    pub fn collect_records(
        &self,
        records: &[RawFunctionRecord],
        project_id: &str,
        regions: &mut dyn RegionTracker,
    ) -> (Vec<FunctionResponse>, Vec<ErrorResourceResponse>) {
        let mut cloud_services = Vec::new();
        let mut error_responses = Vec::new();

        for record in records {
            match self.collect_one(record, project_id, regions) {
                Ok(response) => cloud_services.push(response),
                Err(error_response) => error_responses.push(error_response),
            }
        }

        (cloud_services, error_responses)
    }

    fn collect_one(
        &self,
        raw: &RawFunctionRecord,
        project_id: &str,
        regions: &mut dyn RegionTracker,
    ) -> Result<FunctionResponse, ErrorResourceResponse> {
        let mut function_id = String::new();
        let result = self.build_response(raw, project_id, regions, &mut function_id);

        result.map_err(|error| {
            tracing::error!("[collect_cloud_service] => {}", error);
            ErrorResourceResponse::from_error(
                error,
                CLOUD_SERVICE_GROUP,
                CLOUD_SERVICE_TYPE,
                &function_id,
            )
        })
    }

    /// Normalize one listed function into a success response
    pub fn normalize(
        &self,
        raw: &RawFunctionRecord,
        project_id: &str,
        regions: &mut dyn RegionTracker,
    ) -> Result<FunctionResponse, CollectError> {
        self.build_response(raw, project_id, regions, &mut String::new())
    }

    /// `function_id` is filled in as soon as the name has been parsed, so the
    /// caller can still report it when a later step fails
    fn build_response(
        &self,
        raw: &RawFunctionRecord,
        project_id: &str,
        regions: &mut dyn RegionTracker,
        function_id: &mut String,
    ) -> Result<FunctionResponse, CollectError> {
        let name = required_str(raw, "name")?;
        let (location, id) = make_location_and_id(name, project_id)?;
        *function_id = id.clone();

        let display = FunctionDisplay {
            environment: make_readable_environment(required_str(raw, "environment")?)?
                .to_string(),
            function_id: id,
            last_deployed: make_last_deployed(
                required_str(raw, "updateTime")?,
                self.display_offset,
            )?,
            region: location.clone(),
        };

        let function = Function::from_raw(raw, project_id, display)?;

        let resource = FunctionResource {
            name: name.to_string(),
            account: project_id.to_string(),
            provider: PROVIDER.to_string(),
            cloud_service_group: CLOUD_SERVICE_GROUP.to_string(),
            cloud_service_type: CLOUD_SERVICE_TYPE.to_string(),
            // Null labels stay null in `data`; the envelope always carries a tag map
            tags: function.labels.clone().unwrap_or_default(),
            region_code: location.clone(),
            instance_type: String::new(),
            instance_size: 0.0,
            reference: function.reference(),
            data: function,
        };

        regions.set_region_code(&location);

        Ok(FunctionResponse::new(resource))
    }
}

fn required_str<'a>(
    raw: &'a RawFunctionRecord,
    field: &'static str,
) -> Result<&'a str, CollectError> {
    raw.get(field)
        .and_then(|v| v.as_str())
        .ok_or(CollectError::MissingField(field))
}

/// Split `projects/{project}/locations/{location}/functions/{id}` into
/// `(location, id)`
pub fn make_location_and_id(
    name: &str,
    project_id: &str,
) -> Result<(String, String), CollectError> {
    let malformed = || CollectError::MalformedIdentifier {
        name: name.to_string(),
        project_id: project_id.to_string(),
    };

    let marker = format!("projects/{}/locations/", project_id);
    let mut halves = name.split(marker.as_str());
    let (Some(_), Some(suffix), None) = (halves.next(), halves.next(), halves.next()) else {
        return Err(malformed());
    };

    let mut segments = suffix.split('/');
    let (Some(location), Some("functions"), Some(function_id), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(malformed());
    };

    if location.is_empty() || function_id.is_empty() {
        return Err(malformed());
    }

    Ok((location.to_string(), function_id.to_string()))
}

/// `GEN_1` -> `1st gen`, `GEN_2` -> `2nd gen`, `ENVIRONMENT_UNSPECIFIED` -> `unspecified`
pub fn make_readable_environment(environment: &str) -> Result<&'static str, CollectError> {
    environment.parse::<Environment>().map(Environment::label)
}

/// Format a UTC `YYYY-MM-DDTHH:MM:SS.ffffff` timestamp for display, shifted by
/// `offset`. Fractional seconds are required but dropped.
pub fn make_last_deployed(
    update_time: &str,
    offset: DisplayOffset,
) -> Result<String, CollectError> {
    let malformed = || CollectError::MalformedTimestamp(update_time.to_string());

    let mut parts = update_time.split('.');
    let (Some(seconds), Some(_fraction), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed());
    };

    let updated_time =
        NaiveDateTime::parse_from_str(seconds, "%Y-%m-%dT%H:%M:%S").map_err(|_| malformed())?;
    let local_time = updated_time
        .checked_add_signed(offset.as_duration())
        .ok_or_else(malformed)?;

    Ok(local_time.format("%m/%d, %Y,%I:%M:%S %p").to_string())
}
