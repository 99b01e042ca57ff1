//! Integration tests for the poll synchronizers and the live session.
//!
//! Every test runs against a local `wiremock` server; no network access needed.

use std::time::Duration;

use serde_json::json;
use tokio::time::timeout;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use beacon_sdk::config::SyncConfig;
use beacon_sdk::domain::incident::IncidentStatus;
use beacon_sdk::domain::settings::Theme;
use beacon_sdk::error::{AuthError, HttpError, SdkError};
use beacon_sdk::prelude::*;

const TEST_TIMEOUT: Duration = Duration::from_secs(5);

fn client(server: &MockServer) -> BeaconClient {
    BeaconClient::builder()
        .base_url(&server.uri())
        .sync_config(SyncConfig {
            // Only the first fetch and explicit refreshes happen during a test.
            poll_interval: Duration::from_secs(3600),
            ..SyncConfig::default()
        })
        .build()
        .expect("client should build")
}

async fn eventually(what: &str, check: impl Fn() -> bool) {
    timeout(TEST_TIMEOUT, async {
        while !check() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {what}"));
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map_or(0, |r| r.len())
}

async fn wait_for_requests(server: &MockServer, n: usize) {
    timeout(TEST_TIMEOUT, async {
        while request_count(server).await < n {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {n} requests"));
}

fn products_body() -> serde_json::Value {
    json!({ "products": [
        { "sku": "A", "name": "Alpha", "stock": 3 },
        { "sku": "B" }
    ]})
}

fn incident(id: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "rule_id": "r1",
        "sku": "A",
        "status": status,
        "first_seen": "2026-01-01T00:00:00Z",
        "last_seen": "2026-01-01T00:05:00Z",
        "severity": "warn",
        "title": format!("incident {id}")
    })
}

// ── Catalog ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_catalog_fetches_when_token_present() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/catalog/products"))
        .and(query_param("token", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let catalog = client.catalog().synchronizer(&Signals::new());
    let products = catalog.products();

    catalog.set_token(Some("tok".into())).await;
    eventually("products", || products.read(|p| p.len() == 2)).await;

    let first = products.read(|p| p[0].clone());
    assert_eq!(first.display_name(), "Alpha");
    assert_eq!(first.extra.get("stock"), Some(&json!(3)));
    catalog.stop().await;
}

#[tokio::test]
async fn test_catalog_without_token_issues_no_request() {
    let server = MockServer::start().await;
    let client = client(&server);
    let catalog = client.catalog().synchronizer(&Signals::new());

    catalog.set_token(None).await;
    catalog.refresh().await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(request_count(&server).await, 0);
    assert!(catalog.products().get().is_empty());
}

#[tokio::test]
async fn test_catalog_failure_keeps_previous_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/catalog/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_body()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/catalog/products"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client(&server);
    let catalog = client.catalog().synchronizer(&Signals::new());
    let products = catalog.products();
    catalog.set_token(Some("tok".into())).await;
    eventually("first snapshot", || products.read(|p| p.len() == 2)).await;

    catalog.refresh().await;

    assert_eq!(request_count(&server).await, 2);
    assert_eq!(products.read(|p| p.len()), 2);
}

#[tokio::test]
async fn test_catalog_updated_signal_refetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/catalog/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_body()))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server);
    let signals = Signals::new();
    let catalog = client.catalog().synchronizer(&signals);

    catalog.set_token(Some("tok".into())).await;
    wait_for_requests(&server, 1).await;

    signals.emit(Signal::Custom("unrelated".into()));
    signals.emit(Signal::CatalogUpdated);
    wait_for_requests(&server, 2).await;

    catalog.stop().await;
    signals.emit(Signal::CatalogUpdated);
    tokio::time::sleep(Duration::from_millis(100)).await;
}

#[tokio::test]
async fn test_unavailable_poll_is_fetched_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/catalog/products"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let catalog = client.catalog().synchronizer(&Signals::new());
    catalog.set_token(Some("tok".into())).await;
    wait_for_requests(&server, 1).await;
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(request_count(&server).await, 1);
    assert!(catalog.products().get().is_empty());
    catalog.stop().await;
}

#[tokio::test]
async fn test_rate_limited_poll_is_fetched_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/alerts/incidents"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .mount(&server)
        .await;

    let client = client(&server);
    let incidents = client.incidents().synchronizer();
    incidents.set_token(Some("tok".into())).await;
    wait_for_requests(&server, 1).await;
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(request_count(&server).await, 1);
    incidents.stop().await;

    // The status is reported, not acted on.
    let err = client.incidents().list("tok").await.unwrap_err();
    assert!(matches!(
        err,
        SdkError::Http(HttpError::RateLimited { retry_after_ms: Some(0) })
    ));
    assert_eq!(request_count(&server).await, 2);
}

// ── Incidents ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_incident_snapshot_is_working_set() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/alerts/incidents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            incident("i1", "OPEN"),
            incident("i2", "ACKED"),
            incident("i3", "RESOLVED"),
        ])))
        .mount(&server)
        .await;

    let client = client(&server);
    let incidents = client.incidents().synchronizer();
    let snapshot = incidents.incidents();
    incidents.set_token(Some("tok".into())).await;
    eventually("incidents", || snapshot.read(|i| !i.is_empty())).await;

    let statuses: Vec<_> = snapshot.read(|i| i.iter().map(|x| x.status).collect());
    assert_eq!(statuses, [IncidentStatus::Open, IncidentStatus::Acked]);

    // The plain sub-client returns everything.
    assert_eq!(client.incidents().list("tok").await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_acknowledge_posts_once_then_refetches_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/alerts/incidents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([incident("i1", "OPEN")])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/alerts/incidents/i1/ack"))
        .and(query_param("token", "tok"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let incidents = client.incidents().synchronizer();
    incidents.set_token(Some("tok".into())).await;
    wait_for_requests(&server, 1).await;

    incidents.acknowledge("i1").await.expect("ack should succeed");

    let requests = server.received_requests().await.unwrap();
    let order: Vec<_> = requests
        .iter()
        .map(|r| format!("{} {}", r.method, r.url.path()))
        .collect();
    assert_eq!(
        order,
        [
            "GET /api/alerts/incidents",
            "POST /api/alerts/incidents/i1/ack",
            "GET /api/alerts/incidents",
        ]
    );
}

#[tokio::test]
async fn test_acknowledge_with_unavailable_refetch_fetches_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/alerts/incidents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([incident("i1", "OPEN")])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/alerts/incidents"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/alerts/incidents/i1/ack"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let incidents = client.incidents().synchronizer();
    let snapshot = incidents.incidents();
    incidents.set_token(Some("tok".into())).await;
    eventually("first snapshot", || snapshot.read(|i| i.len() == 1)).await;

    incidents.acknowledge("i1").await.expect("ack should succeed");
    tokio::time::sleep(Duration::from_millis(300)).await;

    let requests = server.received_requests().await.unwrap();
    let order: Vec<_> = requests
        .iter()
        .map(|r| format!("{} {}", r.method, r.url.path()))
        .collect();
    assert_eq!(
        order,
        [
            "GET /api/alerts/incidents",
            "POST /api/alerts/incidents/i1/ack",
            "GET /api/alerts/incidents",
        ]
    );
    // The failed re-fetch keeps the last good snapshot.
    assert_eq!(snapshot.read(|i| i[0].status), IncidentStatus::Open);
}

#[tokio::test]
async fn test_failed_resolve_does_not_refetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/alerts/incidents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([incident("i1", "OPEN")])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/alerts/incidents/i1/resolve"))
        .respond_with(ResponseTemplate::new(500).set_body_string("nope"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let incidents = client.incidents().synchronizer();
    incidents.set_token(Some("tok".into())).await;
    wait_for_requests(&server, 1).await;

    let err = incidents.resolve("i1").await.unwrap_err();
    assert!(matches!(err, SdkError::Http(_)));
    assert_eq!(incidents.incidents().read(|i| i.len()), 1);
}

#[tokio::test]
async fn test_actions_without_token_are_rejected() {
    let server = MockServer::start().await;
    let client = client(&server);
    let incidents = client.incidents().synchronizer();

    let err = incidents.acknowledge("i1").await.unwrap_err();
    assert!(matches!(err, SdkError::Auth(AuthError::NotAuthenticated)));
    let err = incidents.resolve("i1").await.unwrap_err();
    assert!(matches!(err, SdkError::Auth(AuthError::NotAuthenticated)));
    assert_eq!(request_count(&server).await, 0);
}

// ── Live session ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_session_follows_auth_store() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/catalog/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/alerts/incidents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([incident("i1", "OPEN")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "settings": { "theme": "dark", "show_thinking": true }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let auth = AuthStore::new();
    let settings = SettingsStore::new();
    let session = LiveSession::start(&client, auth.clone(), Signals::new(), settings.clone());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(request_count(&server).await, 0);

    auth.set_token("tok");
    let products = session.products();
    let incidents = session.incidents();
    eventually("products", || products.read(|p| p.len() == 2)).await;
    eventually("incidents", || incidents.read(|i| i.len() == 1)).await;
    eventually("settings", || settings.settings().theme == Theme::Dark).await;
    assert!(settings.settings().show_thinking);
    assert!(settings.settings().show_timestamps);

    auth.clear();
    timeout(TEST_TIMEOUT, async {
        while session.catalog_sync().token().await.is_some() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("catalog should stop after logout");
    assert!(session.incident_sync().token().await.is_none());

    session.shutdown().await;
}

#[tokio::test]
async fn test_slow_settings_do_not_delay_logout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/catalog/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/settings"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "settings": { "theme": "dark" } }))
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let client = client(&server);
    let auth = AuthStore::new();
    let settings = SettingsStore::new();
    let session = LiveSession::start(&client, auth.clone(), Signals::new(), settings.clone());

    auth.set_token("tok");
    let products = session.products();
    eventually("products", || products.read(|p| p.len() == 2)).await;

    auth.clear();
    timeout(Duration::from_millis(500), async {
        while session.catalog_sync().token().await.is_some() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("logout should not wait for the settings request");

    // The seed for the old token is abandoned.
    tokio::time::sleep(Duration::from_millis(1600)).await;
    assert_eq!(settings.settings().theme, Theme::System);
    session.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stream_toggle_racing_logout_stays_closed() {
    let server = MockServer::start().await;
    let client = client(&server);
    let auth = AuthStore::new();
    let session = LiveSession::start(&client, auth.clone(), Signals::new(), SettingsStore::new());

    for round in 0..20 {
        auth.set_token("tok");
        timeout(TEST_TIMEOUT, async {
            while session.catalog_sync().token().await.is_none() {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("login should propagate");

        tokio::join!(session.set_price_stream(true, None), async { auth.clear() });

        let settled = timeout(Duration::from_secs(1), async {
            while session.price_sync().params().await.is_some() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(settled.is_ok(), "price stream left open after logout in round {round}");
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(session.price_sync().params().await.is_none());

        session.set_price_stream(false, None).await;
    }
    session.shutdown().await;
}
