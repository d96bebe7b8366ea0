//! Generic API steps
//!
//! Raw requests against arbitrary endpoints and checks on the latest response.

use cucumber::{given, then, when};
use todomanager_client::lifecycle::wait_until_ready;
use todomanager_client::Method;

use super::send;
use crate::world::TodoWorld;

// =============================================================================
// Given
// =============================================================================

#[given(expr = "the API base URL is {string}")]
fn set_base_url(world: &mut TodoWorld, url: String) {
    world.ctx.set_base_url(&url);
}

#[given("the Todo Manager service is running")]
async fn service_is_running(world: &mut TodoWorld) {
    let config = world.ctx.config();
    let (attempts, interval) = (config.ready_attempts, config.ready_interval);
    if let Err(e) = wait_until_ready(world.ctx.client(), attempts, interval).await {
        panic!("{e}");
    }
}

// =============================================================================
// When
// =============================================================================

#[when(expr = "I send a GET request to {string}")]
async fn send_get(world: &mut TodoWorld, endpoint: String) {
    send(world, Method::Get, &endpoint, None).await;
}

// =============================================================================
// Then
// =============================================================================

#[then(expr = "the response status should be {int}")]
fn check_status(world: &mut TodoWorld, status: u16) {
    world.assert_status(status);
}

#[then(expr = "the response should contain {string}")]
fn check_body_contains(world: &mut TodoWorld, text: String) {
    let body = &world.response().body;
    assert!(
        body.contains(&text),
        "Expected response body to contain {text:?}, got: {body}"
    );
}

#[then(expr = "the response should contain the error message {string}")]
fn check_error_message(world: &mut TodoWorld, text: String) {
    let messages = world.response().error_messages();
    assert!(
        messages.iter().any(|m| m.contains(&text)),
        "Expected an error message containing {text:?}, got: {messages:?}"
    );
}
