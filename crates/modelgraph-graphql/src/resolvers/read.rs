//! Single record read resolver.
//!
//! Implements resolvers for queries like `user(id: "...")` that fetch one
//! record by its id. The id may be a global id or a raw local id.

use async_graphql::dynamic::{FieldFuture, ResolverContext};
use tracing::{debug, warn};

use super::{get_store, record_to_graphql_value, storage_error_to_graphql};
use crate::relay::parse_local_id;

/// Resolver for single record read operations.
pub struct ReadResolver;

impl ReadResolver {
    /// Creates a resolver function for reading a single record by id.
    ///
    /// This is used for the singular root and viewer fields.
    pub fn resolve(model: String) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let model = model.clone();
            FieldFuture::new(async move {
                let id = ctx
                    .args
                    .get("id")
                    .and_then(|v| v.string().ok())
                    .ok_or_else(|| async_graphql::Error::new("Missing required argument 'id'"))?;
                let local_id = parse_local_id(&model, id).map_err(|e| e.to_graphql_error())?;

                debug!(model = %model, id = %local_id, "Resolving single record read");

                let store = get_store(&ctx, &model)?;
                let record = store.fetch_one(&model, &local_id).await.map_err(|e| {
                    warn!(error = %e, model = %model, "Storage error reading record");
                    storage_error_to_graphql(e)
                })?;

                match record {
                    Some(record) => Ok(Some(record_to_graphql_value(record))),
                    None => {
                        // Nullable field: a missing record is null, not an error.
                        debug!(model = %model, id = %local_id, "Record not found");
                        Ok(None)
                    }
                }
            })
        }
    }
}
