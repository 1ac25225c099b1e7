//! End-to-end collection tests
//!
//! A full pass through the real locator, connector and manager against a
//! mocked Cloud Functions API.

use gcf_inventory::connector::GcpConnectorLocator;
use gcf_inventory::{CollectError, CollectParams, CollectedRegions, FunctionManager};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{bearer_token, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn manager(server: &MockServer) -> FunctionManager {
    let locator = GcpConnectorLocator::new()
        .with_access_token(Some("test-token".to_string()))
        .with_endpoint(Some(server.uri()));
    FunctionManager::new(Arc::new(locator))
}

fn params(value: serde_json::Value) -> CollectParams {
    serde_json::from_value(value).expect("params should deserialize")
}

#[tokio::test]
async fn test_partial_success_pass() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/projects/p1/locations/-/functions"))
        .and(bearer_token("test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "functions": [
                {
                    "name": "projects/p1/locations/us-central1/functions/f1",
                    "labels": {"env": "prod"},
                    "environment": "GEN_2",
                    "updateTime": "2023-01-01T00:00:00.000000Z",
                    "state": "ACTIVE",
                    "serviceConfig": {
                        "uri": "https://f1-abc-uc.a.run.app",
                        "availableMemory": "256M"
                    }
                },
                {
                    "name": "projects/p1/locations/europe-west1/functions/f2",
                    "environment": "GEN_7",
                    "updateTime": "2023-01-01T00:00:00.000000Z"
                },
                {
                    "name": "projects/other/locations/us-east1/functions/f3",
                    "environment": "GEN_1",
                    "updateTime": "2023-01-01T00:00:00.000000Z"
                },
                {
                    "name": "projects/p1/locations/asia-northeast3/functions/f4",
                    "labels": null,
                    "environment": "GEN_1",
                    "updateTime": "2023-06-30T16:45:10.5Z"
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut regions = CollectedRegions::new();
    let (successes, errors) = manager(&server)
        .collect_cloud_service(
            &params(json!({
                "options": {},
                "secret_data": {"project_id": "p1"},
                "filter": {},
                "zones": []
            })),
            &mut regions,
        )
        .await
        .expect("pass should complete");

    assert_eq!(successes.len(), 2);
    assert_eq!(errors.len(), 2);

    let first = &successes[0].resource;
    assert_eq!(first.region_code, "us-central1");
    assert_eq!(first.tags["env"], "prod");
    assert_eq!(first.data.display.environment, "2nd gen");
    assert_eq!(first.data.display.last_deployed, "01/01, 2023,09:00:00 AM");
    assert_eq!(
        first.data.service_config.as_ref().unwrap()["availableMemory"],
        "256M"
    );

    let second = &successes[1].resource;
    assert_eq!(second.data.display.function_id, "f4");
    assert_eq!(second.data.display.environment, "1st gen");
    assert_eq!(second.data.display.last_deployed, "07/01, 2023,01:45:10 AM");
    assert!(second.tags.is_empty());

    assert_eq!(errors[0].resource_id(), "f2");
    assert!(matches!(errors[0].error, CollectError::UnrecognizedEnvironment(_)));
    assert_eq!(errors[1].resource_id(), "");
    assert!(matches!(errors[1].error, CollectError::MalformedIdentifier { .. }));

    assert_eq!(regions.codes(), vec!["asia-northeast3", "us-central1"]);

    let wire = serde_json::to_value(&successes[0]).unwrap();
    assert_eq!(wire["state"], "SUCCESS");
    assert_eq!(wire["resource"]["data"]["state"], "ACTIVE");
    assert_eq!(wire["resource"]["data"]["display"]["region"], "us-central1");
    assert_eq!(
        wire["resource"]["reference"]["external_link"],
        "https://console.cloud.google.com/functions/details/us-central1/f1?env=gen2&project=p1"
    );
}

#[tokio::test]
async fn test_listing_failure_fails_the_pass() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/projects/p1/locations/-/functions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut regions = CollectedRegions::new();
    let result = manager(&server)
        .collect_cloud_service(&CollectParams::for_project("p1"), &mut regions)
        .await;

    assert!(result.is_err());
    assert!(regions.is_empty());
}
