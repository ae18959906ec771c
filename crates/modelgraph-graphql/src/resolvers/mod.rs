//! GraphQL resolvers for model records.
//!
//! This module provides the resolver implementations for generated fields:
//! - `read`: Single record queries (e.g., `user(id: "...")`)
//! - `list`: Filtered list queries (e.g., `users(age: 28)`)
//! - `connection`: Relay connections at the root, on the viewer and over
//!   reference lists
//! - `reference`: Single reference fields (e.g., `User.mother`)
//! - `node`: The `node(id:)` entry point and the viewer
//! - `create`, `update`, `delete`: Mutations
//!
//! Every resolver looks up its store through the [`ModelStores`] attached to
//! the schema.

mod args;
mod connection;
mod create;
mod delete;
mod list;
mod node;
mod read;
mod reference;
mod update;

pub use args::{
    ArgBinding, CONNECTION_ARGUMENTS, add_connection_arguments, bound_record, connection_args,
    filter_query,
};
pub use connection::{ConnectionResolver, ReferenceConnectionResolver};
pub use create::CreateResolver;
pub use delete::DeleteResolver;
pub use list::ListResolver;
pub use node::{NodeResolver, ViewerResolver};
pub use read::ReadResolver;
pub use reference::ReferenceResolver;
pub use update::UpdateResolver;

use async_graphql::dynamic::{Field, FieldFuture, ResolverContext, TypeRef, ValueAccessor};
use async_graphql::{ErrorExtensions, Name, Value};
use modelgraph_storage::{DynStore, ID_KEY, Page, Record, StorageError};

use crate::context::ModelStores;
use crate::naming::sanitize_field_name;
use crate::relay::{offset_to_cursor, to_global_id};
use crate::schema::{FieldResolution, MappedField};

/// Helper to extract the store serving `model` from resolver context.
pub(crate) fn get_store<'a>(
    ctx: &ResolverContext<'a>,
    model: &str,
) -> Result<&'a DynStore, async_graphql::Error> {
    let stores = ctx
        .data::<ModelStores>()
        .map_err(|_| async_graphql::Error::new("Model stores not available"))?;
    stores.require(model).map_err(|e| e.to_graphql_error())
}

/// Convert a serde_json::Value to async_graphql::Value.
pub(crate) fn json_to_graphql_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else if let Some(f) = n.as_f64() {
                Value::Number(
                    async_graphql::Number::from_f64(f)
                        .unwrap_or_else(|| async_graphql::Number::from(0)),
                )
            } else {
                Value::Null
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => {
            Value::List(arr.into_iter().map(json_to_graphql_value).collect())
        }
        serde_json::Value::Object(obj) => record_to_graphql_value(obj),
    }
}

/// Converts a stored record to a GraphQL object value.
pub(crate) fn record_to_graphql_value(record: Record) -> Value {
    let map: async_graphql::indexmap::IndexMap<Name, Value> = record
        .into_iter()
        .map(|(k, v)| (Name::new(k), json_to_graphql_value(v)))
        .collect();
    Value::Object(map)
}

/// Convert a GraphQL input value to serde_json::Value.
pub(crate) fn value_accessor_to_json(value: &ValueAccessor<'_>) -> serde_json::Value {
    if value.is_null() {
        return serde_json::Value::Null;
    }

    if let Ok(b) = value.boolean() {
        return serde_json::Value::Bool(b);
    }

    if let Ok(i) = value.i64() {
        return serde_json::Value::Number(i.into());
    }

    if let Ok(f) = value.f64() {
        return serde_json::json!(f);
    }

    if let Ok(s) = value.string() {
        return serde_json::Value::String(s.to_string());
    }

    if let Ok(list) = value.list() {
        return serde_json::Value::Array(list.iter().map(|v| value_accessor_to_json(&v)).collect());
    }

    if let Ok(obj) = value.object() {
        let mut map = serde_json::Map::new();
        for (k, v) in obj.iter() {
            map.insert(k.to_string(), value_accessor_to_json(&v));
        }
        return serde_json::Value::Object(map);
    }

    // Enum values and anything else the accessor cannot classify.
    value
        .as_value()
        .clone()
        .into_json()
        .unwrap_or(serde_json::Value::Null)
}

/// Converts a storage error to a GraphQL error with a `code` extension.
pub(crate) fn storage_error_to_graphql(error: StorageError) -> async_graphql::Error {
    crate::error::GraphQLError::from(error).to_graphql_error()
}

/// Builds an "invalid input" GraphQL error.
pub(crate) fn validation_error(message: impl Into<String>) -> async_graphql::Error {
    async_graphql::Error::new(message.into())
        .extend_with(|_, e| e.set("code", "VALIDATION_ERROR"))
}

/// Helper to create a GraphQL object value from name/value pairs.
pub(crate) fn object_value<K: AsRef<str>>(entries: impl IntoIterator<Item = (K, Value)>) -> Value {
    Value::Object(
        entries
            .into_iter()
            .map(|(k, v)| (Name::new(k), v))
            .collect(),
    )
}

/// Builds the value of a Relay connection from one page of records.
pub(crate) fn page_to_connection_value(page: Page) -> Value {
    let start = page.start;
    let has_previous = page.has_previous();
    let has_next = page.has_next();
    let total = page.total;
    let len = page.records.len();

    let edges: Vec<Value> = page
        .records
        .into_iter()
        .enumerate()
        .map(|(i, record)| edge_value(start + i, record))
        .collect();

    let (start_cursor, end_cursor) = if len == 0 {
        (Value::Null, Value::Null)
    } else {
        (
            Value::String(offset_to_cursor(start)),
            Value::String(offset_to_cursor(start + len - 1)),
        )
    };

    object_value([
        ("count", Value::Number((total as u64).into())),
        (
            "pageInfo",
            object_value([
                ("hasNextPage", Value::Boolean(has_next)),
                ("hasPreviousPage", Value::Boolean(has_previous)),
                ("startCursor", start_cursor),
                ("endCursor", end_cursor),
            ]),
        ),
        ("edges", Value::List(edges)),
    ])
}

/// Builds one connection edge for the record at `offset`.
pub(crate) fn edge_value(offset: usize, record: Record) -> Value {
    object_value([
        ("cursor", Value::String(offset_to_cursor(offset))),
        ("node", record_to_graphql_value(record)),
    ])
}

/// Creates a field resolver that extracts a value from the parent object.
///
/// Sanitizes field names for GraphQL compatibility by replacing hyphens with
/// underscores; the original name is used for the lookup.
pub fn value_field(field_name: &str, type_ref: TypeRef) -> Field {
    let graphql_field_name = sanitize_field_name(field_name);
    let json_field_name = field_name.to_string();

    Field::new(graphql_field_name, type_ref, move |ctx| {
        let field_name = json_field_name.clone();
        FieldFuture::new(async move {
            if let Some(parent) = ctx.parent_value.as_value()
                && let Value::Object(obj) = parent
                && let Some(value) = obj.get(&Name::new(&field_name))
            {
                return Ok(Some(value.clone()));
            }
            Ok(None)
        })
    })
}

/// Creates the `id: ID!` field of a model type from the record's local id.
pub fn global_id_field(model: &str) -> Field {
    let model = model.to_string();
    Field::new("id", TypeRef::named_nn(TypeRef::ID), move |ctx| {
        let model = model.clone();
        FieldFuture::new(async move {
            let local_id = match ctx.parent_value.as_value() {
                Some(Value::Object(obj)) => match obj.get(&Name::new(ID_KEY)) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    _ => return Err(async_graphql::Error::new(format!("{model} record has no id"))),
                },
                _ => return Ok(None),
            };
            Ok(Some(Value::String(to_global_id(&model, &local_id))))
        })
    })
    .description("The globally unique ID of this object")
}

/// Creates the GraphQL field for a mapped model field.
pub fn model_field(field_name: &str, mapped: &MappedField) -> Field {
    match &mapped.resolution {
        FieldResolution::Value => value_field(field_name, mapped.type_ref.clone()),
        FieldResolution::Reference { model } => Field::new(
            sanitize_field_name(field_name),
            mapped.type_ref.clone(),
            ReferenceResolver::resolve(model.clone(), field_name.to_string()),
        ),
        FieldResolution::Connection { model } => add_connection_arguments(Field::new(
            sanitize_field_name(field_name),
            mapped.type_ref.clone(),
            ReferenceConnectionResolver::resolve(model.clone(), field_name.to_string()),
        )),
    }
}
