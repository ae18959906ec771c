//! Relay node resolution and the viewer singleton.

use std::sync::Arc;

use async_graphql::Value;
use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use tracing::{debug, warn};

use super::{get_store, record_to_graphql_value, storage_error_to_graphql};
use crate::relay::{NodeTable, NodeTarget, VIEWER_TYPE};

/// The value backing a `Viewer` object. Viewer fields ignore their parent.
pub(crate) fn viewer_value() -> Value {
    Value::Object(Default::default())
}

/// Resolver for `Query.viewer`.
pub struct ViewerResolver;

impl ViewerResolver {
    pub fn resolve() -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        |_| FieldFuture::new(async { Ok(Some(viewer_value())) })
    }
}

/// Resolver for `Query.node(id:)`.
pub struct NodeResolver;

impl NodeResolver {
    /// Creates a resolver dispatching global ids through `table`.
    ///
    /// Ids that are malformed or name a type outside `table` resolve to
    /// null rather than an error.
    pub fn resolve(
        table: Arc<NodeTable>,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let table = table.clone();
            FieldFuture::new(async move {
                let id = ctx
                    .args
                    .get("id")
                    .and_then(|v| v.string().ok())
                    .ok_or_else(|| async_graphql::Error::new("Missing required argument 'id'"))?;

                let Some(target) = table.resolve(id) else {
                    debug!(id = %id, "Global id does not name a known node type");
                    return Ok(None);
                };

                match target {
                    NodeTarget::Viewer => {
                        Ok(Some(FieldValue::value(viewer_value()).with_type(VIEWER_TYPE)))
                    }
                    NodeTarget::Record { model, id } => {
                        debug!(model = %model, id = %id, "Resolving node");

                        let store = get_store(&ctx, &model)?;
                        let record = store.fetch_one(&model, &id).await.map_err(|e| {
                            warn!(error = %e, model = %model, "Storage error resolving node");
                            storage_error_to_graphql(e)
                        })?;

                        Ok(record.map(|record| {
                            FieldValue::value(record_to_graphql_value(record)).with_type(model)
                        }))
                    }
                }
            })
        }
    }
}
