#![allow(clippy::unwrap_used)]
// Integration tests for `AlarmClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use alarmsense_api::{AlarmClient, Error, RootCauseQuery};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, AlarmClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api/alarmsense/", server.uri())).unwrap();
    let client = AlarmClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn query() -> RootCauseQuery {
    RootCauseQuery {
        site_id: "S1".into(),
        turbine_id: "T1-1".into(),
        start_date_time: "2024-05-01T00:00:00Z".into(),
        end_date_time: "2024-05-31T23:59:00Z".into(),
    }
}

// ── Sites ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_sites_camel_case() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/alarmsense/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "S1", "name": "North Sea Wind Park" },
            { "id": "S2", "name": "Texas Ridge Energy" }
        ])))
        .mount(&server)
        .await;

    let sites = client.list_sites().await.unwrap();
    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].id.as_deref(), Some("S1"));
    assert_eq!(sites[1].name.as_deref(), Some("Texas Ridge Energy"));
}

#[tokio::test]
async fn test_list_sites_wrapped_pascal_case() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/alarmsense/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Data": [{ "Id": "S9", "Name": "Offshore" }]
        })))
        .mount(&server)
        .await;

    let sites = client.list_sites().await.unwrap();
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].id.as_deref(), Some("S9"));
    assert_eq!(sites[0].name.as_deref(), Some("Offshore"));
}

// ── Turbines ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_turbines_sends_site_id() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/alarmsense/turbines"))
        .and(query_param("siteId", "S1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "Id": "T1-1", "SiteId": "S1", "Name": "NS-WTG-001" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let turbines = client.list_turbines("S1").await.unwrap();
    assert_eq!(turbines.len(), 1);
    assert_eq!(turbines[0].site_id.as_deref(), Some("S1"));
}

// ── Root cause ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_find_root_cause_posts_filter() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/alarmsense/rootcause"))
        .and(body_json(json!({
            "siteId": "S1",
            "turbineId": "T1-1",
            "startDateTime": "2024-05-01T00:00:00Z",
            "endDateTime": "2024-05-31T23:59:00Z"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "ALM-1",
            "startTime": "2024-05-01 08:30",
            "endTime": "2024-05-01 09:15",
            "rootCauseName": "Gearbox Overheat",
            "alarmCode": "ERR-0042",
            "class": "Mechanical",
            "priority": "P1"
        }])))
        .mount(&server)
        .await;

    let results = client.find_root_cause(&query()).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].alarm_code.as_deref(), Some("ERR-0042"));
    assert_eq!(results[0].class_name.as_deref(), Some("Mechanical"));
}

// ── Errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_maps_to_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/alarmsense/rootcause"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client.find_root_cause(&query()).await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    match err {
        Error::Api { message, .. } => assert_eq!(message, "maintenance"),
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_garbage_body_maps_to_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/alarmsense/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.list_sites().await;
    assert!(
        matches!(result, Err(Error::Deserialization { ref body, .. }) if body.contains("oops")),
        "expected Deserialization error, got: {result:?}"
    );
}
