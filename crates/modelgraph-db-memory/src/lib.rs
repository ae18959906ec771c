//! In-memory model store for ModelGraph.
//!
//! This crate provides an in-memory implementation of the `ModelStore` trait
//! from `modelgraph-storage`, using papaya lock-free HashMap for concurrent
//! access. It backs the test suites and the `modelgraph query` command.
//!
//! # Example
//!
//! ```ignore
//! use modelgraph_db_memory::InMemoryStore;
//! use modelgraph_storage::ModelStore;
//!
//! let store = InMemoryStore::from_seed(&serde_json::json!({
//!     "User": [{"_id": "U1", "name": "Foo"}]
//! }))?;
//! let user = store.fetch_one("User", "U1").await?;
//! ```

pub mod storage;

pub use modelgraph_storage::{ModelStore, StorageError};
pub use storage::{InMemoryStore, StorageKey};

/// Creates a new shareable in-memory store.
pub fn create_store() -> modelgraph_storage::DynStore {
    std::sync::Arc::new(InMemoryStore::new())
}
