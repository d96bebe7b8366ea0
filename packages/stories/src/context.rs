//! Shared state for one scenario.
//!
//! Holds the latest HTTP response, the pending fields for the next create, and
//! the most recently created resource of each kind. Built fresh for every
//! scenario and cleaned up when it finishes.

use serde_json::Value;
use todomanager_client::resource::entity_id;
use todomanager_client::{ApiResponse, ClientConfig, Method, ResourceKind, TodoManagerClient};

use crate::error::Result;
use crate::fields::PendingFields;

#[derive(Debug)]
pub struct TestContext {
    config: ClientConfig,
    client: TodoManagerClient,
    response: Option<ApiResponse>,
    current_fields: PendingFields,
    last_created_resource: Option<Value>,
    last_created_todo: Option<Value>,
    last_created_project: Option<Value>,
    last_created_category: Option<Value>,
    /// Resources this scenario created, in creation order.
    created: Vec<(ResourceKind, String)>,
}

impl TestContext {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = TodoManagerClient::from_config(&config)?;
        Ok(Self {
            config,
            client,
            response: None,
            current_fields: PendingFields::new(),
            last_created_resource: None,
            last_created_todo: None,
            last_created_project: None,
            last_created_category: None,
            created: Vec::new(),
        })
    }

    /// Fresh HTTP client on the configured base URL, empty fields, no handles.
    pub fn reset(&mut self) -> Result<()> {
        self.client = TodoManagerClient::from_config(&self.config)?;
        self.response = None;
        self.current_fields.clear();
        self.clear_handles();
        self.created.clear();
        Ok(())
    }

    /// Switch to `config` and reset; the next client targets its base URL.
    pub fn reset_with(&mut self, config: ClientConfig) -> Result<()> {
        self.config = config;
        self.reset()
    }

    /// Drop per-scenario state once the scenario is over.
    pub fn cleanup(&mut self) {
        self.current_fields.clear();
        self.clear_handles();
    }

    fn clear_handles(&mut self) {
        self.last_created_resource = None;
        self.last_created_todo = None;
        self.last_created_project = None;
        self.last_created_category = None;
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn client(&self) -> &TodoManagerClient {
        &self.client
    }

    pub fn set_base_url(&mut self, base_url: &str) {
        self.client.set_base_url(base_url);
    }

    /// Send a request and keep its response as the latest one.
    pub async fn send_request(
        &mut self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<&ApiResponse> {
        let response = self.client.send(method, endpoint, body).await?;
        Ok(self.response.insert(response))
    }

    pub fn response(&self) -> Option<&ApiResponse> {
        self.response.as_ref()
    }

    pub fn set_response(&mut self, response: ApiResponse) {
        self.response = Some(response);
    }

    pub fn current_fields(&self) -> &PendingFields {
        &self.current_fields
    }

    pub fn current_fields_mut(&mut self) -> &mut PendingFields {
        &mut self.current_fields
    }

    pub fn set_current_fields(&mut self, fields: PendingFields) {
        self.current_fields = fields;
    }

    pub fn last_created_resource(&self) -> Option<&Value> {
        self.last_created_resource.as_ref()
    }

    pub fn set_last_created_resource(&mut self, resource: Option<Value>) {
        self.last_created_resource = resource;
    }

    pub fn last_created(&self, kind: ResourceKind) -> Option<&Value> {
        match kind {
            ResourceKind::Todo => self.last_created_todo.as_ref(),
            ResourceKind::Project => self.last_created_project.as_ref(),
            ResourceKind::Category => self.last_created_category.as_ref(),
        }
    }

    pub fn set_last_created(&mut self, kind: ResourceKind, entity: Option<Value>) {
        let slot = match kind {
            ResourceKind::Todo => &mut self.last_created_todo,
            ResourceKind::Project => &mut self.last_created_project,
            ResourceKind::Category => &mut self.last_created_category,
        };
        *slot = entity;
    }

    /// Store a freshly created entity as the last of its kind and track it for teardown.
    pub fn remember_created(&mut self, kind: ResourceKind, entity: Value) {
        self.track_created(kind, &entity);
        self.set_last_created(kind, Some(entity));
    }

    /// Track an entity for teardown without touching the handles.
    pub fn track_created(&mut self, kind: ResourceKind, entity: &Value) {
        if let Some(id) = entity_id(entity) {
            self.created.push((kind, id));
        }
    }

    pub fn created(&self) -> &[(ResourceKind, String)] {
        &self.created
    }

    /// Delete everything this scenario created, newest first.
    ///
    /// Already-deleted resources answer 404 and are skipped. Failures are logged,
    /// not returned. Returns the number of successful deletes.
    pub async fn delete_created(&mut self) -> usize {
        let mut deleted = 0;
        while let Some((kind, id)) = self.created.pop() {
            match self.client.delete(&kind.instance_path(&id)).await {
                Ok(response) if response.is_success() => deleted += 1,
                Ok(response) => {
                    tracing::debug!(
                        %kind,
                        id = %id,
                        status = response.status,
                        "Resource already gone"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        %kind,
                        id = %id,
                        error = %e,
                        "Failed to delete created resource"
                    );
                }
            }
        }
        deleted
    }
}
