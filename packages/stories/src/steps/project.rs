//! Project steps
//!
//! Create, list, update and delete projects, including the rejected paths.

use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use serde_json::json;
use todomanager_client::{Method, ResourceKind};

use super::{
    create_from_pending, delete_all, refetch_last, response_field, seed, seed_background, send,
    NONEXISTENT_ID,
};
use crate::fields::PendingFields;
use crate::world::TodoWorld;

const PROJECT: ResourceKind = ResourceKind::Project;

const ORIGINAL_TITLE: &str = "Original Title";
const UPDATED_TITLE: &str = "Updated Title";
const UPDATED_DESCRIPTION: &str = "Updated description";

// =============================================================================
// Given
// =============================================================================

#[given(expr = "I have a project with title {string} and description {string}")]
fn project_with_title_and_description(world: &mut TodoWorld, title: String, description: String) {
    world
        .ctx
        .set_current_fields(PendingFields::from_title_description(title, description));
}

#[given(expr = "I have a project with missing field {string}")]
fn project_with_missing_field(world: &mut TodoWorld, field: String) {
    tracing::debug!(field = %field, "Project fields left empty");
    world.ctx.set_current_fields(PendingFields::new());
}

#[given(expr = "I have a project with title {string} and the following optional fields")]
fn project_with_optional_fields(world: &mut TodoWorld, step: &Step, title: String) {
    let mut fields = PendingFields::with_title(title);
    let table = step.table.as_ref().expect("Step needs a | field | value | table");
    fields.extend_from_table(table);
    world.ctx.set_current_fields(fields);
}

#[given("a project already exists in the system")]
async fn project_already_exists(world: &mut TodoWorld) {
    let fields =
        PendingFields::from_title_description(ORIGINAL_TITLE, "An existing project for testing");
    seed(world, PROJECT, &fields).await;
}

#[given("there are existing projects in the system")]
async fn existing_projects(world: &mut TodoWorld) {
    for title in ["First Project", "Second Project"] {
        seed_background(world, PROJECT, &PendingFields::with_title(title)).await;
    }
}

#[given("the system has no projects")]
async fn no_projects(world: &mut TodoWorld) {
    delete_all(world, PROJECT).await;
}

// =============================================================================
// When
// =============================================================================

#[when("I create the project")]
async fn create_project(world: &mut TodoWorld) {
    create_from_pending(world, PROJECT, false).await;
}

#[when("I try to create the project")]
async fn try_create_project(world: &mut TodoWorld) {
    create_from_pending(world, PROJECT, true).await;
}

#[when("I request all projects")]
async fn request_all_projects(world: &mut TodoWorld) {
    send(world, Method::Get, &PROJECT.collection_path(), None).await;
}

#[when(expr = "I request the project with id {int}")]
async fn request_project(world: &mut TodoWorld, id: u64) {
    send(world, Method::Get, &PROJECT.instance_path(&id.to_string()), None).await;
}

#[when("I update the project with a new title")]
async fn update_project_title(world: &mut TodoWorld) {
    let id = world.last_id(PROJECT);
    let body = json!({ "title": UPDATED_TITLE });
    send(world, Method::Put, &PROJECT.instance_path(&id), Some(&body)).await;
}

#[when("I update the project by adding a description")]
async fn update_project_description(world: &mut TodoWorld) {
    let id = world.last_id(PROJECT);
    let body = json!({ "description": UPDATED_DESCRIPTION });
    send(world, Method::Post, &PROJECT.instance_path(&id), Some(&body)).await;
}

#[when("I attempt to update a project that does not exist")]
async fn update_missing_project(world: &mut TodoWorld) {
    let body = world.ctx.current_fields().to_raw_json();
    send(world, Method::Put, &PROJECT.instance_path(NONEXISTENT_ID), Some(&body)).await;
}

#[when("I delete the project")]
async fn delete_project(world: &mut TodoWorld) {
    let id = world.last_id(PROJECT);
    send(world, Method::Delete, &PROJECT.instance_path(&id), None).await;
}

#[when("I attempt to delete a project that does not exist")]
async fn delete_missing_project(world: &mut TodoWorld) {
    send(world, Method::Delete, &PROJECT.instance_path(NONEXISTENT_ID), None).await;
}

#[when("I attempt to delete a project without Id")]
async fn delete_project_without_id(world: &mut TodoWorld) {
    send(world, Method::Delete, &PROJECT.collection_path(), None).await;
}

// =============================================================================
// Then
// =============================================================================

#[then(expr = "The project should no longer exist with status {int}")]
async fn project_gone(world: &mut TodoWorld, status: u16) {
    let id = world.last_id(PROJECT);
    send(world, Method::Get, &PROJECT.instance_path(&id), None).await;
    world.assert_status(status);
}

#[then(expr = "the created project should include the title {string}")]
fn created_project_title(world: &mut TodoWorld, title: String) {
    assert_eq!(
        response_field(world, PROJECT, "title"),
        title,
        "Project title should match the expected value"
    );
}

#[then("the created project should include the optional fields")]
fn created_project_optional_fields(world: &mut TodoWorld) {
    let project = world.response_entity(PROJECT);
    for field in PROJECT.boolean_fields() {
        assert!(
            project.get(field).is_some(),
            "Project should have a {field} field: {project}"
        );
    }
}

#[then("the response should include a list of projects")]
fn project_list(world: &mut TodoWorld) {
    let projects = world.response_items(PROJECT);
    assert!(!projects.is_empty(), "Response should contain at least one project");
}

#[then("the response should include an empty project list")]
fn empty_project_list(world: &mut TodoWorld) {
    let projects = world.response_items(PROJECT);
    assert!(
        projects.is_empty(),
        "Response should contain an empty list of projects, got {}",
        projects.len()
    );
}

#[then("the project's title should reflect the updated value")]
async fn title_updated(world: &mut TodoWorld) {
    refetch_last(world, PROJECT).await;
    assert_eq!(response_field(world, PROJECT, "title"), UPDATED_TITLE);
}

#[then("the project's description should reflect the updated value")]
async fn description_updated(world: &mut TodoWorld) {
    refetch_last(world, PROJECT).await;
    assert_eq!(
        response_field(world, PROJECT, "description"),
        UPDATED_DESCRIPTION
    );
}

#[then("the project's title should remain unchanged")]
async fn title_unchanged(world: &mut TodoWorld) {
    refetch_last(world, PROJECT).await;
    assert_eq!(
        response_field(world, PROJECT, "title"),
        ORIGINAL_TITLE,
        "Project title should remain unchanged"
    );
}
