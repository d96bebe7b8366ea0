//! Todo Manager client - the HTTP side of the story test suite.
//!
//! Wraps the Todo Manager REST API (todos, projects, categories and their
//! relationship endpoints) behind a small async request builder.
//!
//! # Example
//!
//! ```
//! use todomanager_client::{Method, ResourceKind};
//!
//! assert_eq!("post".parse::<Method>().ok(), Some(Method::Post));
//! assert_eq!(ResourceKind::Project.instance_path("1"), "/projects/1");
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Defaults and `TODO_MANAGER_*` environment settings
//! - [`error`]: Error types and Result alias
//! - [`http`]: Request builder and response wrapper
//! - [`resource`]: Resource kinds and JSON entity helpers
//! - [`lifecycle`]: Shutdown, restart and readiness polling

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod resource;

pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use http::{ApiResponse, Method, TodoManagerClient};
pub use lifecycle::ServerProcess;
pub use resource::ResourceKind;
