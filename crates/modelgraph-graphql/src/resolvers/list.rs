//! Filtered list resolver.
//!
//! Implements the plural query fields such as `users(age: 28, ids: [...])`.
//! Every filter is an equality match on one top-level field; `id` and `ids`
//! restrict the result to specific records.

use std::sync::Arc;

use async_graphql::Value;
use async_graphql::dynamic::{FieldFuture, ResolverContext};
use tracing::{debug, warn};

use super::{ArgBinding, filter_query, get_store, record_to_graphql_value, storage_error_to_graphql};
use crate::relay::to_local_id;

/// Resolver for plural list queries.
pub struct ListResolver;

impl ListResolver {
    /// Creates a resolver function for list queries over `model`.
    pub fn resolve(
        model: String,
        filters: Arc<Vec<ArgBinding>>,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let model = model.clone();
            let filters = filters.clone();
            FieldFuture::new(async move {
                let mut query = filter_query(&ctx.args, &filters);

                let mut ids: Option<Vec<String>> = None;
                if let Some(id) = ctx.args.get("id").and_then(|v| v.string().ok()) {
                    ids.get_or_insert_with(Vec::new).push(to_local_id(&model, id));
                }
                if let Some(list) = ctx.args.get("ids").and_then(|v| v.list().ok()) {
                    let ids = ids.get_or_insert_with(Vec::new);
                    for item in list.iter() {
                        if let Ok(id) = item.string() {
                            ids.push(to_local_id(&model, id));
                        }
                    }
                }
                if let Some(ids) = ids {
                    query = query.with_ids(ids);
                }

                debug!(
                    model = %model,
                    filters = query.filters.len(),
                    "Resolving list query"
                );

                let store = get_store(&ctx, &model)?;
                let records = store.fetch_list(&model, &query).await.map_err(|e| {
                    warn!(error = %e, model = %model, "Storage error during list query");
                    storage_error_to_graphql(e)
                })?;

                debug!(model = %model, returned = records.len(), "List query completed");

                Ok(Some(Value::List(
                    records.into_iter().map(record_to_graphql_value).collect(),
                )))
            })
        }
    }
}
