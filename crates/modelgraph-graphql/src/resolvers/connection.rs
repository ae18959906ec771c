//! Connection-based pagination resolvers.
//!
//! [`ConnectionResolver`] serves `usersConnection(...)` at the root and
//! `viewer { users(...) }`. [`ReferenceConnectionResolver`] pages through
//! the ids held by an array-of-reference field such as `User.friends`.

use std::sync::Arc;

use async_graphql::dynamic::{FieldFuture, ResolverContext};
use async_graphql::{Name, Value};
use modelgraph_storage::{ID_KEY, ListQuery};
use tracing::{debug, trace, warn};

use super::{
    ArgBinding, connection_args, filter_query, get_store, page_to_connection_value,
    storage_error_to_graphql,
};
use crate::relay::to_local_id;

/// Resolver for connection queries over all records of a model.
pub struct ConnectionResolver;

impl ConnectionResolver {
    /// Creates a resolver function for connection queries.
    pub fn resolve(
        model: String,
        filters: Arc<Vec<ArgBinding>>,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let model = model.clone();
            let filters = filters.clone();
            FieldFuture::new(async move {
                let query = filter_query(&ctx.args, &filters);
                let args = connection_args(&ctx.args)?;

                debug!(
                    model = %model,
                    first = ?args.first,
                    after = ?args.after,
                    last = ?args.last,
                    before = ?args.before,
                    "Resolving connection query"
                );

                let store = get_store(&ctx, &model)?;
                let page = store
                    .fetch_connection(&model, &query, &args)
                    .await
                    .map_err(|e| {
                        warn!(error = %e, model = %model, "Storage error during connection query");
                        storage_error_to_graphql(e)
                    })?;

                debug!(
                    model = %model,
                    total = page.total,
                    returned = page.records.len(),
                    "Connection query completed"
                );

                Ok(Some(page_to_connection_value(page)))
            })
        }
    }
}

/// Resolver for array-of-reference fields exposed as connections.
pub struct ReferenceConnectionResolver;

impl ReferenceConnectionResolver {
    /// Creates a resolver reading the id list under `field` of the parent.
    pub fn resolve(
        model: String,
        field: String,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let model = model.clone();
            let field = field.clone();
            FieldFuture::new(async move {
                let ids: Vec<String> = match ctx.parent_value.as_value() {
                    Some(Value::Object(obj)) => match obj.get(&Name::new(&field)) {
                        Some(Value::List(items)) => items.iter().filter_map(id_of).collect(),
                        _ => Vec::new(),
                    },
                    _ => return Ok(None),
                };
                let ids: Vec<String> = ids.iter().map(|id| to_local_id(&model, id)).collect();

                let args = connection_args(&ctx.args)?;
                trace!(model = %model, field = %field, ids = ids.len(), "Resolving reference connection");

                let store = get_store(&ctx, &model)?;
                let page = store
                    .fetch_connection(&model, &ListQuery::new().with_ids(ids), &args)
                    .await
                    .map_err(|e| {
                        warn!(error = %e, model = %model, field = %field, "Storage error resolving reference list");
                        storage_error_to_graphql(e)
                    })?;

                Ok(Some(page_to_connection_value(page)))
            })
        }
    }
}

/// Extracts an id from a reference list item: a bare id, or an embedded
/// record carrying its own id.
fn id_of(item: &Value) -> Option<String> {
    match item {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(obj) => obj.get(&Name::new(ID_KEY)).and_then(id_of),
        _ => None,
    }
}
