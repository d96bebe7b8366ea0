//! Category steps

use cucumber::{given, then, when};
use todomanager_client::{Method, ResourceKind};

use super::{create_from_pending, response_field, seed, send};
use crate::fields::PendingFields;
use crate::world::TodoWorld;

const CATEGORY: ResourceKind = ResourceKind::Category;

#[given(expr = "I have a category with title {string} and description {string}")]
fn category_with_title_and_description(world: &mut TodoWorld, title: String, description: String) {
    world
        .ctx
        .set_current_fields(PendingFields::from_title_description(title, description));
}

#[given("a category already exists in the system")]
async fn category_already_exists(world: &mut TodoWorld) {
    let fields = PendingFields::from_title_description(
        "Existing Category",
        "An existing category for testing",
    );
    seed(world, CATEGORY, &fields).await;
}

#[when("I create the category")]
async fn create_category(world: &mut TodoWorld) {
    create_from_pending(world, CATEGORY, false).await;
}

#[when("I try to create the category")]
async fn try_create_category(world: &mut TodoWorld) {
    create_from_pending(world, CATEGORY, true).await;
}

#[when("I request all categories")]
async fn request_all_categories(world: &mut TodoWorld) {
    send(world, Method::Get, &CATEGORY.collection_path(), None).await;
}

#[when("I delete the category")]
async fn delete_category(world: &mut TodoWorld) {
    let id = world.last_id(CATEGORY);
    send(world, Method::Delete, &CATEGORY.instance_path(&id), None).await;
}

#[then(expr = "the created category should include the title {string}")]
fn created_category_title(world: &mut TodoWorld, title: String) {
    assert_eq!(response_field(world, CATEGORY, "title"), title);
}

#[then(expr = "The category should no longer exist with status {int}")]
async fn category_gone(world: &mut TodoWorld, status: u16) {
    let id = world.last_id(CATEGORY);
    send(world, Method::Get, &CATEGORY.instance_path(&id), None).await;
    world.assert_status(status);
}
