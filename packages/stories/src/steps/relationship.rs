//! Relationship steps
//!
//! Links between the last created todo and the last created project or
//! category, through the `tasksof`, `tasks` and `categories` endpoints.

use cucumber::{then, when};
use serde_json::json;
use todomanager_client::resource::entity_id;
use todomanager_client::{Method, ResourceKind};

use super::send;
use crate::world::TodoWorld;

fn todo_relation_path(world: &TodoWorld, relation: &str) -> String {
    let todo_id = world.last_id(ResourceKind::Todo);
    format!("{}/{relation}", ResourceKind::Todo.instance_path(&todo_id))
}

/// Ids of the `kind` entities listed at `endpoint`.
async fn linked_ids(world: &mut TodoWorld, endpoint: &str, kind: ResourceKind) -> Vec<String> {
    send(world, Method::Get, endpoint, None).await;
    world.assert_status(200);
    world
        .response_items(kind)
        .iter()
        .filter_map(entity_id)
        .collect()
}

async fn project_task_ids(world: &mut TodoWorld) -> Vec<String> {
    let project_id = world.last_id(ResourceKind::Project);
    let endpoint = format!("{}/tasks", ResourceKind::Project.instance_path(&project_id));
    linked_ids(world, &endpoint, ResourceKind::Todo).await
}

// =============================================================================
// When
// =============================================================================

#[when("I link the todo to the project")]
async fn link_todo_to_project(world: &mut TodoWorld) {
    let endpoint = todo_relation_path(world, "tasksof");
    let body = json!({ "id": world.last_id(ResourceKind::Project) });
    send(world, Method::Post, &endpoint, Some(&body)).await;
}

#[when("I remove the todo from the project")]
async fn unlink_todo_from_project(world: &mut TodoWorld) {
    let endpoint = format!(
        "{}/{}",
        todo_relation_path(world, "tasksof"),
        world.last_id(ResourceKind::Project)
    );
    send(world, Method::Delete, &endpoint, None).await;
}

#[when("I link the todo to the category")]
async fn link_todo_to_category(world: &mut TodoWorld) {
    let endpoint = todo_relation_path(world, "categories");
    let body = json!({ "id": world.last_id(ResourceKind::Category) });
    send(world, Method::Post, &endpoint, Some(&body)).await;
}

#[when("I remove the todo from the category")]
async fn unlink_todo_from_category(world: &mut TodoWorld) {
    let endpoint = format!(
        "{}/{}",
        todo_relation_path(world, "categories"),
        world.last_id(ResourceKind::Category)
    );
    send(world, Method::Delete, &endpoint, None).await;
}

// =============================================================================
// Then
// =============================================================================

#[then("the project should have the todo as a task")]
async fn project_has_task(world: &mut TodoWorld) {
    let todo_id = world.last_id(ResourceKind::Todo);
    let tasks = project_task_ids(world).await;
    assert!(
        tasks.contains(&todo_id),
        "Project tasks {tasks:?} should include todo {todo_id}"
    );
}

#[then("the project should not have the todo as a task")]
async fn project_lacks_task(world: &mut TodoWorld) {
    let todo_id = world.last_id(ResourceKind::Todo);
    let tasks = project_task_ids(world).await;
    assert!(
        !tasks.contains(&todo_id),
        "Project tasks {tasks:?} should not include todo {todo_id}"
    );
}

#[then("the todo should belong to the category")]
async fn todo_in_category(world: &mut TodoWorld) {
    let category_id = world.last_id(ResourceKind::Category);
    let endpoint = todo_relation_path(world, "categories");
    let categories = linked_ids(world, &endpoint, ResourceKind::Category).await;
    assert!(
        categories.contains(&category_id),
        "Todo categories {categories:?} should include category {category_id}"
    );
}

#[then("the todo should not belong to the category")]
async fn todo_not_in_category(world: &mut TodoWorld) {
    let category_id = world.last_id(ResourceKind::Category);
    let endpoint = todo_relation_path(world, "categories");
    let categories = linked_ids(world, &endpoint, ResourceKind::Category).await;
    assert!(
        !categories.contains(&category_id),
        "Todo categories {categories:?} should not include category {category_id}"
    );
}
