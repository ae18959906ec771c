//! Add mutation resolver.
//!
//! Handles `add<Model>` mutations. The payload carries the viewer, an edge
//! wrapping the created record and the echoed `clientMutationId`.

use std::sync::Arc;

use async_graphql::Value;
use async_graphql::dynamic::{FieldFuture, ObjectAccessor, ResolverContext};
use modelgraph_storage::{ListQuery, record_id};
use tracing::{debug, trace, warn};

use super::node::viewer_value;
use super::{ArgBinding, bound_record, edge_value, get_store, object_value, storage_error_to_graphql};
use crate::naming::changed_edge_field_name;

/// Resolver for record creation mutations.
///
/// Handles mutations like:
/// ```graphql
/// mutation {
///   addUser(input: { name: "Ann", age: 28, clientMutationId: "1" }) {
///     changedUserEdge { cursor node { id name } }
///     clientMutationId
///   }
/// }
/// ```
pub struct CreateResolver;

impl CreateResolver {
    /// Creates a resolver for record creation.
    ///
    /// # Arguments
    /// * `model` - The model name (e.g., "User")
    /// * `fields` - Input fields accepted by the mutation
    pub fn resolve(
        model: String,
        fields: Arc<Vec<ArgBinding>>,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let model = model.clone();
            let fields = fields.clone();

            FieldFuture::new(async move {
                debug!(model = %model, "Processing add mutation");

                let input = mutation_input(&ctx)?;
                let client_mutation_id = client_mutation_id(&input);
                let record = bound_record(&input, &fields, false);

                trace!(model = %model, fields = record.len(), "Adding record via storage");

                let store = get_store(&ctx, &model)?;
                let created = store.add_one(&model, record).await.map_err(|e| {
                    warn!(error = %e, model = %model, "Add failed");
                    storage_error_to_graphql(e)
                })?;

                // New records are appended, so the edge sits at the end of the
                // unfiltered list.
                let total = store.count(&model, &ListQuery::new()).await.map_err(|e| {
                    warn!(error = %e, model = %model, "Count after add failed");
                    storage_error_to_graphql(e)
                })?;

                debug!(
                    model = %model,
                    id = ?record_id(&created),
                    "Record added successfully"
                );

                Ok(Some(object_value([
                    ("viewer".to_string(), viewer_value()),
                    (
                        changed_edge_field_name(&model),
                        edge_value(total.saturating_sub(1), created),
                    ),
                    ("clientMutationId".to_string(), client_mutation_id),
                ])))
            })
        }
    }
}

/// Extracts the required `input` argument of a mutation.
pub(crate) fn mutation_input<'c>(
    ctx: &'c ResolverContext<'_>,
) -> Result<ObjectAccessor<'c>, async_graphql::Error> {
    ctx.args
        .get("input")
        .and_then(|v| v.object().ok())
        .ok_or_else(|| async_graphql::Error::new("Missing required argument 'input'"))
}

/// Reads the optional `clientMutationId` to echo back in the payload.
pub(crate) fn client_mutation_id(input: &ObjectAccessor<'_>) -> Value {
    input
        .get("clientMutationId")
        .and_then(|v| v.string().ok())
        .map_or(Value::Null, |s| Value::String(s.to_string()))
}

/// Extracts the required `id` input field.
pub(crate) fn input_id<'i>(input: &'i ObjectAccessor<'_>) -> Result<&'i str, async_graphql::Error> {
    input
        .get("id")
        .and_then(|v| v.string().ok())
        .ok_or_else(|| async_graphql::Error::new("Missing required input field 'id'"))
}
