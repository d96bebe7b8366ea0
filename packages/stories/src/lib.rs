//! Todo Manager stories - Gherkin scenarios against the Todo Manager REST API.
//!
//! Step definitions drive the service through a shared per-scenario context,
//! and a random-order runner replays the feature files in shuffled orders to
//! expose scenarios that depend on what ran before them.
//!
//! # Example
//!
//! ```
//! use todomanager_stories::fields::PendingFields;
//!
//! let mut fields = PendingFields::with_title("Office Work");
//! fields.insert("active", "TRUE");
//! assert_eq!(
//!     fields.to_json(&["active"]),
//!     serde_json::json!({"title": "Office Work", "active": true})
//! );
//! ```
//!
//! # Architecture
//!
//! - [`context`]: Per-scenario state (latest response, pending fields, created handles)
//! - [`fields`]: Pending field bookkeeping and boolean coercion
//! - [`world`]: Cucumber world wrapping the context
//! - [`steps`]: Given/When/Then step definitions
//! - [`features`]: Feature file discovery
//! - [`harness`]: Random-order runner and its report
//! - [`suite`]: Cucumber hooks, tag filtering and the feature executor
//! - [`load`]: CRUD timing runner
//! - [`monitor`]: Host CPU and memory sampling during load runs
//! - [`cli`]: Command-line interface
//! - [`error`]: Error types and Result alias

pub mod cli;
pub mod context;
pub mod error;
pub mod features;
pub mod fields;
pub mod harness;
pub mod load;
pub mod monitor;
pub mod steps;
pub mod suite;
pub mod world;

pub use context::TestContext;
pub use error::{Result, StoryError};
pub use fields::PendingFields;
pub use harness::{FeatureExecutor, RandomOrderRunner, RunReport};
pub use world::TodoWorld;
