//! Update mutation resolver.
//!
//! Handles `update<Model>` mutations. Only the input fields that are present
//! are written; an explicit null clears a field.

use std::sync::Arc;

use async_graphql::dynamic::{FieldFuture, ResolverContext};
use tracing::{debug, warn};

use super::create::{client_mutation_id, input_id, mutation_input};
use super::{
    ArgBinding, bound_record, get_store, object_value, record_to_graphql_value,
    storage_error_to_graphql,
};
use crate::naming::changed_field_name;
use crate::relay::parse_local_id;

/// Resolver for record update mutations.
pub struct UpdateResolver;

impl UpdateResolver {
    /// Creates a resolver for record updates.
    pub fn resolve(
        model: String,
        fields: Arc<Vec<ArgBinding>>,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let model = model.clone();
            let fields = fields.clone();

            FieldFuture::new(async move {
                let input = mutation_input(&ctx)?;
                let id = parse_local_id(&model, input_id(&input)?).map_err(|e| e.to_graphql_error())?;
                let client_mutation_id = client_mutation_id(&input);
                let changes = bound_record(&input, &fields, true);

                debug!(
                    model = %model,
                    id = %id,
                    fields = changes.len(),
                    "Processing update mutation"
                );

                let store = get_store(&ctx, &model)?;
                let updated = store.update_one(&model, &id, changes).await.map_err(|e| {
                    warn!(error = %e, model = %model, id = %id, "Update failed");
                    storage_error_to_graphql(e)
                })?;

                debug!(model = %model, id = %id, "Record updated successfully");

                Ok(Some(object_value([
                    (changed_field_name(&model), record_to_graphql_value(updated)),
                    ("clientMutationId".to_string(), client_mutation_id),
                ])))
            })
        }
    }
}
