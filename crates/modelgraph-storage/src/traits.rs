//! The store trait the schema resolvers delegate to.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::types::{ConnectionArgs, ListQuery, Page, Record};

/// Data access for generated schemas.
///
/// Every method is keyed by model name so a single backend can serve many
/// models. Implementations must be thread-safe (`Send + Sync`); the GraphQL
/// engine may call them concurrently while executing one query.
///
/// # Example
///
/// ```ignore
/// use modelgraph_storage::{ModelStore, StorageError, Record};
///
/// async fn get_user(store: &dyn ModelStore, id: &str) -> Result<Record, StorageError> {
///     store
///         .fetch_one("User", id)
///         .await?
///         .ok_or_else(|| StorageError::not_found("User", id))
/// }
/// ```
#[async_trait]
pub trait ModelStore: Send + Sync {
    /// Reads a single record by local id.
    ///
    /// Returns `None` if the record does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues, not for missing records.
    async fn fetch_one(&self, model: &str, id: &str) -> Result<Option<Record>, StorageError>;

    /// Lists records matching the query, honouring its offset and limit.
    async fn fetch_list(&self, model: &str, query: &ListQuery) -> Result<Vec<Record>, StorageError>;

    /// Counts records matching the query's filters and id restriction.
    async fn count(&self, model: &str, query: &ListQuery) -> Result<usize, StorageError>;

    /// Reads one Relay connection page.
    ///
    /// The default implementation counts the matches, slices the window with
    /// [`ConnectionArgs::window`] and reads it with `fetch_list`. Backends
    /// that can page natively should override it.
    async fn fetch_connection(
        &self,
        model: &str,
        query: &ListQuery,
        args: &ConnectionArgs,
    ) -> Result<Page, StorageError> {
        let total = self.count(model, query).await?;
        let (start, end) = args.window(total);

        let records = if end > start {
            let window = query.clone().with_offset(start).with_limit(end - start);
            self.fetch_list(model, &window).await?
        } else {
            Vec::new()
        };

        Ok(Page {
            records,
            start,
            total,
        })
    }

    /// Inserts a new record and returns it as stored (with its `_id`).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` if the input carries a taken id.
    async fn add_one(&self, model: &str, input: Record) -> Result<Record, StorageError>;

    /// Merges `input` into an existing record and returns the result.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the record does not exist.
    async fn update_one(&self, model: &str, id: &str, input: Record) -> Result<Record, StorageError>;

    /// Removes a record. Returns `false` when there was nothing to remove.
    async fn delete_one(&self, model: &str, id: &str) -> Result<bool, StorageError>;

    /// Returns the name of this backend (for logging).
    fn backend_name(&self) -> &'static str {
        "unknown"
    }
}

/// Shared handle to a store.
pub type DynStore = Arc<dyn ModelStore>;
