//! # modelgraph-graphql
//!
//! Relay-compliant GraphQL schema generation from document model
//! descriptors.
//!
//! Given a set of models (a name plus typed fields, some of which reference
//! other models) this crate builds a complete GraphQL schema:
//!
//! - One object type per model implementing the Relay `Node` interface
//! - Connection and edge types for cursor pagination
//! - A `Viewer` singleton and a `node(id:)` entry point
//! - Single read, filtered list and connection fields per model
//! - Add, update and delete mutations per model
//!
//! ## Overview
//!
//! The schema is generated at runtime with async-graphql's dynamic schema
//! API. References between models are emitted as named type references and
//! bound when the schema is finished, so models may reference themselves or
//! each other in any order. Data access goes through the
//! [`ModelStore`](modelgraph_storage::ModelStore) trait; stores are supplied
//! per model through [`ModelStores`].
//!
//! ## Configuration
//!
//! Add to `modelgraph.toml`:
//!
//! ```toml
//! [graphql]
//! mutation = true
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Configuration options
//! - [`model`] - Model and field descriptors
//! - [`schema`] - Type mapping, type registry and schema building
//! - [`resolvers`] - Field resolvers calling the stores
//! - [`relay`] - Global ids, cursors and node lookup
//! - [`context`] - Store wiring
//! - [`error`] - Error types

pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod naming;
pub mod relay;
pub mod resolvers;
pub mod schema;

// Re-export main types
pub use config::GraphQLConfig;
pub use context::ModelStores;
pub use error::GraphQLError;
pub use model::{FieldDescriptor, FieldKind, ModelDescriptor, ModelSet};
pub use relay::{from_global_id, to_global_id};
pub use schema::{ModelSchemaBuilder, SchemaBuilderConfig};

/// Result type for GraphQL operations.
pub type Result<T> = std::result::Result<T, GraphQLError>;
