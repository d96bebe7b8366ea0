//! Request-building tests against a mock Todo Manager.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use todomanager_client::lifecycle::{is_ready, shutdown, wait_until_ready};
use todomanager_client::resource::{entity_id, entity_view, string_field};
use todomanager_client::{ClientError, Method, ResourceKind, TodoManagerClient};
use wiremock::matchers::{body_json, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> TodoManagerClient {
    TodoManagerClient::new(server.uri()).expect("client builds")
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/projects"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"title": "Office Work", "active": true})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "2",
            "title": "Office Work",
            "completed": "false",
            "active": "true",
            "description": ""
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let body = json!({"title": "Office Work", "active": true});
    let response = client.post("/projects", Some(&body)).await.expect("request");

    assert_eq!(response.status, 201);
    let created = response.json().expect("json");
    let entity = entity_view(&created, ResourceKind::Project).expect("entity");
    assert_eq!(entity_id(entity), Some("2".to_string()));
    assert_eq!(string_field(entity, "active"), Some("true"));
}

#[tokio::test]
async fn test_post_without_body_sends_empty_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/todos/1/tasksof"))
        .and(header("content-type", "application/json"))
        .and(body_string(""))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "3"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client.post("/todos/1/tasksof", None).await.expect("request");
    assert_eq!(response.status, 201);
}

#[tokio::test]
async fn test_put_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/projects/999999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errorMessages": ["Invalid GUID for 999999 entity project"]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let body = json!({"title": "nothing"});
    let response = client
        .send_named("put", "/projects/999999", Some(&body))
        .await
        .expect("request");

    assert_eq!(response.status, 404);
    assert_eq!(
        response.error_messages(),
        vec!["Invalid GUID for 999999 entity project".to_string()]
    );
}

#[tokio::test]
async fn test_unsupported_method_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .send_named("PATCH", "/todos/1", None)
        .await
        .expect_err("PATCH is rejected");
    assert!(matches!(err, ClientError::UnsupportedMethod(_)));
}

#[tokio::test]
async fn test_get_and_delete() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todos/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "todos": [{"id": "1", "title": "scan paperwork", "doneStatus": "false"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/todos/1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let fetched = client.send(Method::Get, "/todos/1", None).await.expect("get");
    let body = fetched.json().expect("json");
    let todo = entity_view(&body, ResourceKind::Todo).expect("todo");
    assert_eq!(string_field(todo, "title"), Some("scan paperwork"));

    let deleted = client.delete("/todos/1").await.expect("delete");
    assert_eq!(deleted.status, 200);
    assert!(deleted.body.is_empty());
}

#[tokio::test]
async fn test_readiness_polling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"todos": []})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(is_ready(&client).await);
    let attempt = wait_until_ready(&client, 3, Duration::from_millis(5))
        .await
        .expect("ready");
    assert_eq!(attempt, 1);
}

#[tokio::test]
async fn test_readiness_requires_ok_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(!is_ready(&client).await);
    let err = wait_until_ready(&client, 2, Duration::from_millis(5))
        .await
        .expect_err("never ready");
    assert!(matches!(err, ClientError::NotReady { attempts: 2, .. }));
}

#[tokio::test]
async fn test_shutdown_hits_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/shutdown"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    shutdown(&client).await.expect("shutdown");
}
