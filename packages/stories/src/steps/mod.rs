//! Step definitions for the Todo Manager stories
//!
//! Given/When/Then implementations grouped by story area. Shared request and
//! creation helpers live here.

#![allow(clippy::expect_used, clippy::panic, clippy::unwrap_used)]

pub mod api;
pub mod category;
pub mod lifecycle;
pub mod project;
pub mod relationship;
pub mod todo;

use serde_json::Value;
use todomanager_client::resource::entity_view;
use todomanager_client::{ApiResponse, Method, ResourceKind};

use crate::fields::PendingFields;
use crate::world::TodoWorld;

/// Id used by steps that target a resource that does not exist.
pub const NONEXISTENT_ID: &str = "999999";

/// Send a request through the context, failing the step on transport errors.
pub async fn send(
    world: &mut TodoWorld,
    method: Method,
    endpoint: &str,
    body: Option<&Value>,
) -> ApiResponse {
    world
        .ctx
        .send_request(method, endpoint, body)
        .await
        .unwrap_or_else(|e| panic!("{method} {endpoint} failed: {e}"))
        .clone()
}

/// POST the pending fields as a new `kind`.
///
/// A coerced create stores the entity on 201 and leaves the handles alone
/// otherwise. A raw create sends every value as a string and clears the
/// handles when the service rejects it.
pub async fn create_from_pending(world: &mut TodoWorld, kind: ResourceKind, raw: bool) {
    let fields = world.ctx.current_fields();
    let body = if raw {
        fields.to_raw_json()
    } else {
        fields.to_json(kind.boolean_fields())
    };

    let response = send(world, Method::Post, &kind.collection_path(), Some(&body)).await;
    if response.status == 201 {
        let entity = world.response_entity(kind);
        world.ctx.set_last_created_resource(Some(entity.clone()));
        world.ctx.remember_created(kind, entity);
    } else if raw {
        tracing::debug!(%kind, status = response.status, "Create rejected");
        world.ctx.set_last_created_resource(None);
        world.ctx.set_last_created(kind, None);
    }
}

/// Create a `kind` that later steps rely on; anything but 201 fails the step.
pub async fn seed(world: &mut TodoWorld, kind: ResourceKind, fields: &PendingFields) -> Value {
    let body = fields.to_json(kind.boolean_fields());
    let response = send(world, Method::Post, &kind.collection_path(), Some(&body)).await;
    assert_eq!(
        response.status, 201,
        "Failed to create {kind}: {}",
        response.body
    );
    let entity = world.response_entity(kind);
    world.ctx.remember_created(kind, entity.clone());
    entity
}

/// Create a `kind` in the background of a scenario.
///
/// Tracked for teardown, but the last-created handles stay as they were.
pub async fn seed_background(world: &mut TodoWorld, kind: ResourceKind, fields: &PendingFields) {
    let body = fields.to_json(kind.boolean_fields());
    let response = send(world, Method::Post, &kind.collection_path(), Some(&body)).await;
    assert_eq!(
        response.status, 201,
        "{kind} should be created successfully: {}",
        response.body
    );
    let entity = world.response_entity(kind);
    world.ctx.track_created(kind, &entity);
}

/// Fetch the last created `kind` by id and return the entity.
pub async fn refetch_last(world: &mut TodoWorld, kind: ResourceKind) -> Value {
    let id = world.last_id(kind);
    send(world, Method::Get, &kind.instance_path(&id), None).await;
    world.assert_status(200);
    world.response_entity(kind)
}

/// Delete every listed `kind`, then check the listing is empty.
pub async fn delete_all(world: &mut TodoWorld, kind: ResourceKind) {
    send(world, Method::Get, &kind.collection_path(), None).await;
    world.assert_status(200);
    let ids: Vec<String> = world
        .response_items(kind)
        .iter()
        .filter_map(todomanager_client::resource::entity_id)
        .collect();

    for id in &ids {
        let response = send(world, Method::Delete, &kind.instance_path(id), None).await;
        assert!(
            response.is_success(),
            "Failed to delete {kind} {id}: {}",
            response.body
        );
    }
    tracing::debug!(%kind, deleted = ids.len(), "Cleared collection");

    send(world, Method::Get, &kind.collection_path(), None).await;
    let remaining = world.response_items(kind);
    assert!(
        remaining.is_empty(),
        "Expected no {} after cleanup, found {}",
        kind.collection(),
        remaining.len()
    );
}

/// Text of `field` on the single entity in the latest response.
pub fn response_field(world: &TodoWorld, kind: ResourceKind, field: &str) -> String {
    let body = world.response_json();
    let entity =
        entity_view(&body, kind).unwrap_or_else(|| panic!("Response holds no {kind}: {body}"));
    entity
        .get(field)
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| panic!("{kind} has no {field} field: {entity}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use todomanager_client::ClientConfig;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TODO: ResourceKind = ResourceKind::Todo;
    const PROJECT: ResourceKind = ResourceKind::Project;

    fn world_for(server: &MockServer) -> TodoWorld {
        TodoWorld::with_config(ClientConfig::new(server.uri()))
    }

    async fn reject_todo_create(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/todos"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "errorMessages": ["title : field is mandatory"]
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    fn with_existing_todo(world: &mut TodoWorld) {
        world.ctx.remember_created(TODO, json!({"id": "1", "title": "Earlier"}));
        world
            .ctx
            .set_last_created_resource(Some(json!({"id": "1", "title": "Earlier"})));
    }

    #[tokio::test]
    async fn test_create_stores_entity_on_201() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/todos"))
            .and(body_json(json!({"title": "Write report", "doneStatus": true})))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"id": "5", "title": "Write report"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut world = world_for(&server);
        let mut fields = PendingFields::with_title("Write report");
        fields.insert("doneStatus", "true");
        world.ctx.set_current_fields(fields);

        create_from_pending(&mut world, TODO, false).await;

        let expected = json!({"id": "5", "title": "Write report"});
        assert_eq!(world.ctx.last_created(TODO), Some(&expected));
        assert_eq!(world.ctx.last_created_resource(), Some(&expected));
        assert_eq!(world.ctx.created(), &[(TODO, "5".to_string())]);
    }

    #[tokio::test]
    async fn test_try_create_clears_handles_when_rejected() {
        let server = MockServer::start().await;
        reject_todo_create(&server).await;

        let mut world = world_for(&server);
        with_existing_todo(&mut world);
        world.ctx.set_current_fields(PendingFields::new());

        create_from_pending(&mut world, TODO, true).await;

        assert_eq!(world.response().status, 400);
        assert!(world.ctx.last_created(TODO).is_none());
        assert!(world.ctx.last_created_resource().is_none());
    }

    #[tokio::test]
    async fn test_create_keeps_handles_when_rejected() {
        let server = MockServer::start().await;
        reject_todo_create(&server).await;

        let mut world = world_for(&server);
        with_existing_todo(&mut world);
        world.ctx.set_current_fields(PendingFields::new());

        create_from_pending(&mut world, TODO, false).await;

        assert_eq!(world.last_id(TODO), "1");
        assert!(world.ctx.last_created_resource().is_some());
    }

    #[tokio::test]
    async fn test_seed_background_only_tracks_for_teardown() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/projects"))
            .and(body_json(json!({"title": "First Project"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "8"})))
            .expect(1)
            .mount(&server)
            .await;

        let mut world = world_for(&server);
        seed_background(&mut world, PROJECT, &PendingFields::with_title("First Project")).await;

        assert!(world.ctx.last_created(PROJECT).is_none());
        assert_eq!(world.ctx.created(), &[(PROJECT, "8".to_string())]);
    }

    #[tokio::test]
    async fn test_delete_all_clears_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "projects": [{"id": "1"}, {"id": "2"}]
            })))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"projects": []})))
            .expect(1)
            .mount(&server)
            .await;
        for id in ["1", "2"] {
            Mock::given(method("DELETE"))
                .and(path(format!("/projects/{id}")))
                .respond_with(ResponseTemplate::new(200))
                .expect(1)
                .mount(&server)
                .await;
        }

        let mut world = world_for(&server);
        delete_all(&mut world, PROJECT).await;

        assert!(world.response_items(PROJECT).is_empty());
    }

    #[tokio::test]
    #[should_panic(expected = "Expected no projects after cleanup")]
    async fn test_delete_all_fails_when_projects_remain() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "projects": [{"id": "1"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/projects/1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let mut world = world_for(&server);
        delete_all(&mut world, PROJECT).await;
    }

    #[tokio::test]
    #[should_panic(expected = "Unexpected status code")]
    async fn test_delete_all_requires_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut world = world_for(&server);
        delete_all(&mut world, PROJECT).await;
    }
}
