//! Single reference resolver.
//!
//! A reference field stores the local id of another record. The resolver
//! loads that record from the referenced model's store. A parent that
//! already embeds the referenced record is passed through untouched.

use async_graphql::dynamic::{FieldFuture, ResolverContext};
use async_graphql::{Name, Value};
use tracing::{trace, warn};

use super::{get_store, record_to_graphql_value, storage_error_to_graphql};
use crate::relay::to_local_id;

/// Resolver for fields that point at one record of another model.
pub struct ReferenceResolver;

impl ReferenceResolver {
    /// Creates a resolver reading the id under `field` of the parent and
    /// fetching that record of `model`.
    pub fn resolve(
        model: String,
        field: String,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let model = model.clone();
            let field = field.clone();
            FieldFuture::new(async move {
                let Some(Value::Object(parent)) = ctx.parent_value.as_value() else {
                    return Ok(None);
                };

                let id = match parent.get(&Name::new(&field)) {
                    Some(Value::String(id)) => to_local_id(&model, id),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(embedded @ Value::Object(_)) => return Ok(Some(embedded.clone())),
                    _ => return Ok(None),
                };

                trace!(model = %model, field = %field, id = %id, "Resolving reference");

                let store = get_store(&ctx, &model)?;
                let record = store.fetch_one(&model, &id).await.map_err(|e| {
                    warn!(error = %e, model = %model, id = %id, "Storage error resolving reference");
                    storage_error_to_graphql(e)
                })?;

                // A dangling reference resolves to null.
                Ok(record.map(record_to_graphql_value))
            })
        }
    }
}
