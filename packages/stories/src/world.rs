//! World struct for the Todo Manager stories
//!
//! Wraps the shared [`TestContext`] together with a server process the
//! lifecycle steps may have started.

// Step helpers panic on broken preconditions; cucumber reports them as failed steps.
#![allow(clippy::expect_used, clippy::panic)]

use std::fmt;

use cucumber::World;
use serde_json::Value;
use todomanager_client::resource::{collection_items, entity_id, entity_view};
use todomanager_client::{ApiResponse, ClientConfig, ResourceKind, ServerProcess};

use crate::context::TestContext;

/// Test world that holds state across steps in a scenario.
#[derive(World)]
#[world(init = Self::new)]
pub struct TodoWorld {
    /// Response, pending fields and created-resource handles
    pub ctx: TestContext,
    /// Server started by a restart step, if any
    pub server: Option<ServerProcess>,
}

impl fmt::Debug for TodoWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoWorld")
            .field("base_url", &self.ctx.client().base_url())
            .field("response", &self.ctx.response())
            .field("current_fields", self.ctx.current_fields())
            .field("created", &self.ctx.created().len())
            .field("server_pid", &self.server.as_ref().and_then(|s| s.pid()))
            .finish()
    }
}

impl Default for TodoWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoWorld {
    pub fn new() -> Self {
        Self::with_config(ClientConfig::from_env())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        let ctx = TestContext::new(config).expect("Failed to build HTTP client");
        Self { ctx, server: None }
    }

    /// The latest response; panics when no request was sent yet.
    pub fn response(&self) -> &ApiResponse {
        self.ctx
            .response()
            .expect("No response recorded; send a request first")
    }

    pub fn response_json(&self) -> Value {
        let response = self.response();
        response.json().unwrap_or_else(|e| {
            panic!(
                "Response body is not JSON ({e}), status {}: {}",
                response.status, response.body
            )
        })
    }

    /// The single entity in the latest response, bare or wrapped in its collection.
    pub fn response_entity(&self, kind: ResourceKind) -> Value {
        let body = self.response_json();
        entity_view(&body, kind)
            .cloned()
            .unwrap_or_else(|| panic!("Response holds no {kind}: {body}"))
    }

    pub fn response_items(&self, kind: ResourceKind) -> Vec<Value> {
        let body = self.response_json();
        collection_items(&body, kind)
            .cloned()
            .unwrap_or_else(|| {
                panic!("Response should contain {} field: {body}", kind.collection())
            })
    }

    /// Id of the most recently created entity of `kind`.
    pub fn last_id(&self, kind: ResourceKind) -> String {
        let entity = self
            .ctx
            .last_created(kind)
            .unwrap_or_else(|| panic!("No {kind} was created in this scenario"));
        entity_id(entity).unwrap_or_else(|| panic!("Created {kind} has no id: {entity}"))
    }

    pub fn assert_status(&self, expected: u16) {
        let response = self.response();
        assert_eq!(
            response.status, expected,
            "Unexpected status code, body: {}",
            response.body
        );
    }
}
