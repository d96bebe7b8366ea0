//! Resource kinds exposed by the Todo Manager and helpers for reading its JSON shapes.
//!
//! The service answers a GET by id with the instance wrapped in its collection
//! (`{"projects": [{...}]}`) but answers POST/PUT with the bare instance. Every
//! field value, `id` included, is serialized as a string.

use std::fmt;

use serde_json::Value;

use crate::error::{ClientError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Todo,
    Project,
    Category,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Todo,
        ResourceKind::Project,
        ResourceKind::Category,
    ];

    /// Collection segment and JSON wrapper key.
    pub fn collection(self) -> &'static str {
        match self {
            ResourceKind::Todo => "todos",
            ResourceKind::Project => "projects",
            ResourceKind::Category => "categories",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            ResourceKind::Todo => "todo",
            ResourceKind::Project => "project",
            ResourceKind::Category => "category",
        }
    }

    /// Fields the service types as BOOLEAN; pending string values are coerced for these.
    pub fn boolean_fields(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Todo => &["doneStatus"],
            ResourceKind::Project => &["completed", "active"],
            ResourceKind::Category => &[],
        }
    }

    /// `/todos`
    pub fn collection_path(self) -> String {
        format!("/{}", self.collection())
    }

    /// `/todos/{id}`
    pub fn instance_path(self, id: &str) -> String {
        format!("/{}/{}", self.collection(), id)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

/// The single entity in `body`, unwrapping `{"<collection>": [first, ..]}` when present.
pub fn entity_view(body: &Value, kind: ResourceKind) -> Option<&Value> {
    match body.get(kind.collection()) {
        Some(Value::Array(items)) => items.first(),
        Some(_) => None,
        None if body.is_object() => Some(body),
        None => None,
    }
}

/// Items under the collection key, if the body is a collection listing.
pub fn collection_items(body: &Value, kind: ResourceKind) -> Option<&Vec<Value>> {
    body.get(kind.collection()).and_then(Value::as_array)
}

/// `id` of an entity as text; numeric ids are rendered in decimal.
pub fn entity_id(entity: &Value) -> Option<String> {
    match entity.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Like [`entity_id`] but reports which entity lacked the id.
pub fn require_id(entity: &Value, kind: ResourceKind) -> Result<String> {
    entity_id(entity).ok_or_else(|| ClientError::MissingField {
        field: "id".to_string(),
        context: format!("{kind} entity"),
    })
}

/// String-valued field of an entity.
pub fn string_field<'a>(entity: &'a Value, field: &str) -> Option<&'a str> {
    entity.get(field).and_then(Value::as_str)
}

/// Ids of the entities linked to `entity` under `relation` (e.g. `tasksof`, `categories`).
pub fn related_ids(entity: &Value, relation: &str) -> Vec<String> {
    entity
        .get(relation)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(entity_id).collect())
        .unwrap_or_default()
}
