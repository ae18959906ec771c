//! Store wiring for generated resolvers.
//!
//! A [`ModelStores`] value is attached to the schema as data when it is
//! built; every resolver looks up the store for its model through it.
//!
//! # Example
//!
//! ```ignore
//! use modelgraph_graphql::ModelStores;
//!
//! let stores = ModelStores::new()
//!     .with_default(shared_store.clone())
//!     .with_model("AuditLog", audit_store);
//! ```

use std::collections::HashMap;

use modelgraph_storage::DynStore;

use crate::error::GraphQLError;

/// Per-model store lookup with an optional fallback.
#[derive(Clone, Default)]
pub struct ModelStores {
    default: Option<DynStore>,
    per_model: HashMap<String, DynStore>,
}

impl ModelStores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `store` for every model without a dedicated store.
    #[must_use]
    pub fn with_default(mut self, store: DynStore) -> Self {
        self.default = Some(store);
        self
    }

    /// Uses `store` for one model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>, store: DynStore) -> Self {
        self.per_model.insert(model.into(), store);
        self
    }

    /// Returns the store serving `model`, if any.
    pub fn get(&self, model: &str) -> Option<&DynStore> {
        self.per_model.get(model).or(self.default.as_ref())
    }

    /// Returns the store serving `model`.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::MissingStore` when neither a dedicated nor a
    /// default store exists.
    pub fn require(&self, model: &str) -> Result<&DynStore, GraphQLError> {
        self.get(model)
            .ok_or_else(|| GraphQLError::MissingStore(model.to_string()))
    }
}

impl std::fmt::Debug for ModelStores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelStores")
            .field(
                "default",
                &self.default.as_ref().map(|s| s.backend_name()),
            )
            .field("models", &self.per_model.keys().collect::<Vec<_>>())
            .finish()
    }
}
