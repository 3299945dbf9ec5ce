//! RtdbClient against a mocked database REST API.

mod common;

use std::time::Duration;

use serde_json::{Map, Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{TOKEN, rtdb_client, sse_body};
use xirtam_admin::AppError;
use xirtam_admin::realtime::{RtdbClient, StreamEvent, SubscriptionUpdate, subscribe};

#[tokio::test]
async fn test_get_sends_auth_and_returns_value() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users.json"))
        .and(query_param("auth", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"A1": {"name": "Asha"}})))
        .expect(1)
        .mount(&server)
        .await;

    let value = rtdb_client(&server).get("users").await.unwrap();
    assert_eq!(value["A1"]["name"], "Asha");
}

#[tokio::test]
async fn test_get_missing_reads_null() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/door_lock/Lab9.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let value = rtdb_client(&server).get("door_lock/Lab9").await.unwrap();
    assert_eq!(value, Value::Null);
}

#[tokio::test]
async fn test_set_puts_json() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/door_lock/Lab1.json"))
        .and(query_param("auth", TOKEN))
        .and(body_json(json!("Unlocked")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("Unlocked")))
        .expect(1)
        .mount(&server)
        .await;

    rtdb_client(&server).set("door_lock/Lab1", "Unlocked").await.unwrap();
}

#[tokio::test]
async fn test_update_patches_multiple_paths() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/schedules.json"))
        .and(body_json(json!({"Lab1/B1": {"status": "active"}, "Lab1/B0": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let mut changes = Map::new();
    changes.insert("Lab1/B1".to_string(), json!({"status": "active"}));
    changes.insert("Lab1/B0".to_string(), Value::Null);

    rtdb_client(&server).update("schedules", &changes).await.unwrap();
}

#[tokio::test]
async fn test_remove_deletes() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/users/A1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .expect(1)
        .mount(&server)
        .await;

    rtdb_client(&server).remove("users/A1").await.unwrap();
}

#[tokio::test]
async fn test_permission_denied_is_mapped() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Permission denied"})))
        .mount(&server)
        .await;

    let err = rtdb_client(&server).set("access_control", "manual").await.unwrap_err();
    match err {
        AppError::PermissionDenied(message) => assert_eq!(message, "Permission denied"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_other_errors_keep_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "Invalid data; couldn't parse JSON object"})))
        .mount(&server)
        .await;

    let err = rtdb_client(&server).get("users").await.unwrap_err();
    assert!(matches!(err, AppError::Database { status: 400, .. }));
}

#[tokio::test]
async fn test_unauthenticated_client_sends_no_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .expect(1)
        .mount(&server)
        .await;

    let client = RtdbClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
    client.get("").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].url.query().is_none());
}

#[tokio::test]
async fn test_listen_delivers_events_until_cancel() {
    let server = MockServer::start().await;
    let body = sse_body(&[
        ("put", r#"{"path":"/","data":{"Lab1":"Locked"}}"#),
        ("keep-alive", "null"),
        ("patch", r#"{"path":"/","data":{"Lab2":"Unlocked"}}"#),
        ("cancel", "Permission denied"),
        ("put", r#"{"path":"/Lab3","data":"Locked"}"#),
    ]);
    Mock::given(method("GET"))
        .and(path("/door_lock.json"))
        .and(header("accept", "text/event-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let mut events = Vec::new();
    rtdb_client(&server)
        .listen("door_lock", |event| {
            events.push(event);
            true
        })
        .await
        .unwrap();

    assert_eq!(events.len(), 4);
    assert!(matches!(&events[0], StreamEvent::Put { path, .. } if path == "/"));
    assert!(matches!(events[1], StreamEvent::KeepAlive));
    assert!(matches!(&events[2], StreamEvent::Patch { .. }));
    assert!(matches!(&events[3], StreamEvent::Cancel(reason) if reason == "Permission denied"));
}

#[tokio::test]
async fn test_listen_stops_when_callback_declines() {
    let server = MockServer::start().await;
    let body = sse_body(&[
        ("put", r#"{"path":"/","data":1}"#),
        ("put", r#"{"path":"/","data":2}"#),
    ]);
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let mut seen = 0;
    rtdb_client(&server)
        .listen("counter", |_| {
            seen += 1;
            false
        })
        .await
        .unwrap();

    assert_eq!(seen, 1);
}

#[tokio::test]
async fn test_subscribe_mirrors_location() {
    let server = MockServer::start().await;
    let body = sse_body(&[
        ("put", r#"{"path":"/","data":{"Lab1":"Locked","Lab2":"Locked"}}"#),
        ("put", r#"{"path":"/Lab2","data":"Unlocked"}"#),
        ("put", r#"{"path":"/Lab1","data":null}"#),
    ]);
    Mock::given(method("GET"))
        .and(path("/door_lock.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let _subscription = subscribe(
        &tokio::runtime::Handle::current(),
        rtdb_client(&server),
        "door_lock",
        move |update| {
            let _ = tx.send(update);
        },
    );

    let mut updates = Vec::new();
    while let Some(update) = rx.recv().await {
        let closed = matches!(update, SubscriptionUpdate::Closed(_));
        updates.push(update);
        if closed {
            break;
        }
    }

    assert_eq!(updates.len(), 4);
    assert_eq!(
        updates[1],
        SubscriptionUpdate::Snapshot(json!({"Lab1": "Locked", "Lab2": "Unlocked"}))
    );
    assert_eq!(updates[2], SubscriptionUpdate::Snapshot(json!({"Lab2": "Unlocked"})));
    assert!(matches!(updates[3], SubscriptionUpdate::Closed(_)));
}

#[tokio::test]
async fn test_subscribe_reports_revocation() {
    let server = MockServer::start().await;
    let body = sse_body(&[
        ("put", r#"{"path":"/","data":"manual"}"#),
        ("auth_revoked", "credential is no longer valid"),
    ]);
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let _subscription = subscribe(
        &tokio::runtime::Handle::current(),
        rtdb_client(&server),
        "access_control",
        move |update| {
            let _ = tx.send(update);
        },
    );

    assert_eq!(rx.recv().await, Some(SubscriptionUpdate::Snapshot(json!("manual"))));
    assert_eq!(rx.recv().await, Some(SubscriptionUpdate::Revoked));
}
