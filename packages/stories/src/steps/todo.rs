//! Todo steps

use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use serde_json::json;
use todomanager_client::{Method, ResourceKind};

use super::{create_from_pending, refetch_last, response_field, seed, send};
use crate::fields::PendingFields;
use crate::world::TodoWorld;

const TODO: ResourceKind = ResourceKind::Todo;

// =============================================================================
// Given
// =============================================================================

#[given(expr = "I have a todo with title {string} and description {string}")]
fn todo_with_title_and_description(world: &mut TodoWorld, title: String, description: String) {
    world
        .ctx
        .set_current_fields(PendingFields::from_title_description(title, description));
}

#[given(expr = "I have a todo with title {string} and the following optional fields")]
fn todo_with_optional_fields(world: &mut TodoWorld, step: &Step, title: String) {
    let mut fields = PendingFields::with_title(title);
    let table = step.table.as_ref().expect("Step needs a | field | value | table");
    fields.extend_from_table(table);
    world.ctx.set_current_fields(fields);
}

#[given(expr = "I have a todo with missing field {string}")]
fn todo_with_missing_field(world: &mut TodoWorld, field: String) {
    tracing::debug!(field = %field, "Todo fields left empty");
    world.ctx.set_current_fields(PendingFields::new());
}

#[given("a todo already exists in the system")]
async fn todo_already_exists(world: &mut TodoWorld) {
    let fields =
        PendingFields::from_title_description("Existing Todo", "An existing todo for testing");
    seed(world, TODO, &fields).await;
}

// =============================================================================
// When
// =============================================================================

#[when(expr = "I send a GET todo request to {string}")]
async fn send_get_todo(world: &mut TodoWorld, endpoint: String) {
    send(world, Method::Get, &endpoint, None).await;
}

/// Posts the pending fields as they are to any endpoint.
#[when(expr = "I send a POST request to {string}")]
async fn send_post(world: &mut TodoWorld, endpoint: String) {
    let body = world.ctx.current_fields().to_raw_json();
    let response = send(world, Method::Post, &endpoint, Some(&body)).await;

    let created_kind = ResourceKind::ALL
        .into_iter()
        .find(|kind| kind.collection_path() == endpoint);
    if let (Some(kind), 201) = (created_kind, response.status) {
        let entity = world.response_entity(kind);
        world.ctx.set_last_created_resource(Some(entity.clone()));
        world.ctx.remember_created(kind, entity);
    }
}

#[when("I create the todo")]
async fn create_todo(world: &mut TodoWorld) {
    create_from_pending(world, TODO, false).await;
}

#[when("I try to create the todo")]
async fn try_create_todo(world: &mut TodoWorld) {
    create_from_pending(world, TODO, true).await;
}

#[when("I request all todos")]
async fn request_all_todos(world: &mut TodoWorld) {
    send(world, Method::Get, &TODO.collection_path(), None).await;
}

#[when(expr = "I request the todo with id {int}")]
async fn request_todo(world: &mut TodoWorld, id: u64) {
    send(world, Method::Get, &TODO.instance_path(&id.to_string()), None).await;
}

#[when("I mark the todo as done")]
async fn mark_todo_done(world: &mut TodoWorld) {
    let id = world.last_id(TODO);
    let body = json!({ "doneStatus": true });
    send(world, Method::Post, &TODO.instance_path(&id), Some(&body)).await;
}

#[when("I delete the todo")]
async fn delete_todo(world: &mut TodoWorld) {
    let id = world.last_id(TODO);
    send(world, Method::Delete, &TODO.instance_path(&id), None).await;
}

// =============================================================================
// Then
// =============================================================================

#[then(expr = "the todo response status should be {int}")]
fn check_todo_status(world: &mut TodoWorld, status: u16) {
    world.assert_status(status);
}

#[then(expr = "The todo should no longer exist with status {int}")]
async fn todo_gone(world: &mut TodoWorld, status: u16) {
    let id = world.last_id(TODO);
    send(world, Method::Get, &TODO.instance_path(&id), None).await;
    world.assert_status(status);
}

#[then(expr = "the created todo should include the title {string}")]
fn created_todo_title(world: &mut TodoWorld, title: String) {
    assert_eq!(
        response_field(world, TODO, "title"),
        title,
        "Todo title should match the expected value"
    );
}

#[then("the todo should be marked as done")]
async fn todo_done(world: &mut TodoWorld) {
    refetch_last(world, TODO).await;
    assert_eq!(response_field(world, TODO, "doneStatus"), "true");
}

#[then("the response should include a list of todos")]
fn todo_list(world: &mut TodoWorld) {
    let todos = world.response_items(TODO);
    assert!(!todos.is_empty(), "Response should contain at least one todo");
}
