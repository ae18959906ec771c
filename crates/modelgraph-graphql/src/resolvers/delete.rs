//! Delete mutation resolver.
//!
//! Handles `delete<Model>` mutations for removing records.

use async_graphql::Value;
use async_graphql::dynamic::{FieldFuture, ResolverContext};
use tracing::{debug, trace, warn};

use super::create::{client_mutation_id, input_id, mutation_input};
use super::node::viewer_value;
use super::{get_store, object_value, storage_error_to_graphql};
use crate::relay::{parse_local_id, to_global_id};

/// Resolver for record delete mutations.
///
/// Handles mutations like:
/// ```graphql
/// mutation {
///   deleteUser(input: { id: "VXNlcjpVMQ==" }) {
///     ok
///     id
///   }
/// }
/// ```
///
/// Deleting a record that does not exist is not an error; `ok` is false.
pub struct DeleteResolver;

impl DeleteResolver {
    /// Creates a resolver for record deletion.
    pub fn resolve(model: String) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let model = model.clone();

            FieldFuture::new(async move {
                debug!(model = %model, "Processing delete mutation");

                let input = mutation_input(&ctx)?;
                let id = parse_local_id(&model, input_id(&input)?).map_err(|e| e.to_graphql_error())?;
                let client_mutation_id = client_mutation_id(&input);

                trace!(model = %model, id = %id, "Deleting record via storage");

                let store = get_store(&ctx, &model)?;
                let ok = store.delete_one(&model, &id).await.map_err(|e| {
                    warn!(error = %e, model = %model, id = %id, "Delete failed");
                    storage_error_to_graphql(e)
                })?;

                debug!(model = %model, id = %id, ok = ok, "Delete mutation completed");

                Ok(Some(object_value([
                    ("viewer", viewer_value()),
                    ("ok", Value::Boolean(ok)),
                    ("id", Value::String(to_global_id(&model, &id))),
                    ("clientMutationId", client_mutation_id),
                ])))
            })
        }
    }
}
