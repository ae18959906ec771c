//! Argument handling shared by the query and mutation resolvers.

use async_graphql::dynamic::{Field, InputValue, ObjectAccessor, TypeRef};
use modelgraph_storage::{ConnectionArgs, ListQuery, Record};
use tracing::debug;

use super::{validation_error, value_accessor_to_json};
use crate::relay::{cursor_to_offset, to_local_id};

/// Binds a GraphQL argument (or input field) to a record field.
#[derive(Debug, Clone)]
pub struct ArgBinding {
    /// Argument name as exposed in the schema.
    pub argument: String,
    /// Key in the stored record.
    pub field: String,
    pub type_ref: TypeRef,
    /// Model referenced by this field; ids given for it are reduced to
    /// local ids before they reach the store.
    pub reference: Option<String>,
}

impl ArgBinding {
    /// Schema argument declaration for this binding.
    pub fn input_value(&self) -> InputValue {
        InputValue::new(&self.argument, self.type_ref.clone())
    }

    fn to_stored(&self, value: serde_json::Value) -> serde_json::Value {
        match &self.reference {
            Some(model) => local_ids(model, value),
            None => value,
        }
    }
}

/// Converts id strings (or lists of them) to local ids of `model`.
fn local_ids(model: &str, value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::String(id) => serde_json::Value::String(to_local_id(model, &id)),
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(|v| local_ids(model, v)).collect())
        }
        other => other,
    }
}

/// Collects the bound arguments present in `args` into a record.
///
/// Explicit nulls are kept when `keep_null` is set (an update clears the
/// field) and dropped otherwise (an unset filter).
pub fn bound_record(args: &ObjectAccessor<'_>, bindings: &[ArgBinding], keep_null: bool) -> Record {
    let mut record = Record::new();
    for binding in bindings {
        let Some(value) = args.get(&binding.argument) else {
            continue;
        };
        if value.is_null() && !keep_null {
            continue;
        }
        let json = binding.to_stored(value_accessor_to_json(&value));
        record.insert(binding.field.clone(), json);
    }
    record
}

/// Builds a list query from filter arguments.
pub fn filter_query(args: &ObjectAccessor<'_>, bindings: &[ArgBinding]) -> ListQuery {
    bound_record(args, bindings, false)
        .into_iter()
        .fold(ListQuery::new(), |query, (field, value)| query.with_filter(field, value))
}

/// Pagination arguments every connection field takes.
pub const CONNECTION_ARGUMENTS: [&str; 4] = ["first", "after", "last", "before"];

/// Adds the Relay `first`/`after`/`last`/`before` arguments to a field.
pub fn add_connection_arguments(field: Field) -> Field {
    field
        .argument(InputValue::new("first", TypeRef::named(TypeRef::INT)))
        .argument(InputValue::new("after", TypeRef::named(TypeRef::STRING)))
        .argument(InputValue::new("last", TypeRef::named(TypeRef::INT)))
        .argument(InputValue::new("before", TypeRef::named(TypeRef::STRING)))
}

/// Reads the Relay pagination arguments.
///
/// Cursors that do not decode are ignored, as if the argument were absent.
///
/// # Errors
///
/// Returns an error for a negative `first` or `last`.
pub fn connection_args(args: &ObjectAccessor<'_>) -> Result<ConnectionArgs, async_graphql::Error> {
    Ok(ConnectionArgs {
        first: count_arg(args, "first")?,
        last: count_arg(args, "last")?,
        after: cursor_arg(args, "after"),
        before: cursor_arg(args, "before"),
    })
}

fn count_arg(args: &ObjectAccessor<'_>, name: &str) -> Result<Option<usize>, async_graphql::Error> {
    let Some(value) = args.get(name).filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    let n = value.i64()?;
    usize::try_from(n)
        .map(Some)
        .map_err(|_| validation_error(format!("Argument '{name}' must be a non-negative integer")))
}

fn cursor_arg(args: &ObjectAccessor<'_>, name: &str) -> Option<usize> {
    let cursor = args.get(name)?.string().ok()?.to_string();
    let offset = cursor_to_offset(&cursor);
    if offset.is_none() {
        debug!(argument = %name, cursor = %cursor, "Ignoring undecodable cursor");
    }
    offset
}
