//! # modelgraph-storage
//!
//! The data-access boundary for ModelGraph schemas.
//!
//! Generated GraphQL resolvers never touch a database directly; they call a
//! [`ModelStore`]. This crate only defines that contract and the types that
//! cross it. Backends live in separate crates (see `modelgraph-db-memory`).
//!
//! ## Example
//!
//! ```ignore
//! use modelgraph_storage::{ListQuery, ModelStore};
//! use serde_json::json;
//!
//! async fn users_aged(store: &dyn ModelStore, age: u32) -> Vec<Record> {
//!     let query = ListQuery::new().with_filter("age", json!(age));
//!     store.fetch_list("User", &query).await.unwrap_or_default()
//! }
//! ```

mod error;
mod traits;
mod types;

pub use error::{ErrorCategory, StorageError};
pub use traits::{DynStore, ModelStore};
pub use types::{ConnectionArgs, ID_KEY, ListQuery, Page, Record, record_id, values_equal};
