//! Error types for schema generation and resolution.
//!
//! Configuration problems (bad model names, dangling references, missing
//! stores) surface from [`ModelSchemaBuilder::build`](crate::ModelSchemaBuilder::build)
//! before any schema exists. Failures inside resolvers are converted to
//! per-field GraphQL errors with a `code` extension.

use async_graphql::ErrorExtensions;
use modelgraph_storage::{ErrorCategory, StorageError};

/// Errors that can occur while building or serving a generated schema.
#[derive(Debug, thiserror::Error)]
pub enum GraphQLError {
    /// Two model descriptors share a name.
    #[error("Duplicate model name: {0}")]
    DuplicateModel(String),

    /// A model or generated type name is not a valid GraphQL name.
    #[error("Invalid GraphQL name: '{0}'")]
    InvalidName(String),

    /// A field references a model that is not part of the model set.
    #[error("Field {model}.{field} references unknown model '{target}'")]
    UnknownReference {
        /// The model declaring the field.
        model: String,
        /// The referencing field (dotted path for nested fields).
        field: String,
        /// The missing model name.
        target: String,
    },

    /// Two generated types ended up with the same name.
    #[error("Generated type name '{0}' is already taken")]
    TypeNameCollision(String),

    /// Two generated fields of one type ended up with the same name.
    #[error("Generated field name '{field}' is used twice on type {type_name}")]
    FieldNameCollision {
        /// The object or input type declaring the fields.
        type_name: String,
        /// The clashing field name.
        field: String,
    },

    /// No store was supplied for a model.
    #[error("No store configured for model '{0}'")]
    MissingStore(String),

    /// The GraphQL engine rejected the assembled schema.
    #[error("Failed to build GraphQL schema: {0}")]
    SchemaBuildFailed(String),

    /// An id argument could not be interpreted.
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// Invalid input to a query or mutation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl GraphQLError {
    /// Returns the error code for GraphQL error extensions.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateModel(_) => "DUPLICATE_MODEL",
            Self::InvalidName(_) => "INVALID_NAME",
            Self::UnknownReference { .. } => "UNKNOWN_REFERENCE",
            Self::TypeNameCollision(_) => "TYPE_NAME_COLLISION",
            Self::FieldNameCollision { .. } => "FIELD_NAME_COLLISION",
            Self::MissingStore(_) => "MISSING_STORE",
            Self::SchemaBuildFailed(_) => "SCHEMA_BUILD_FAILED",
            Self::InvalidId(_) => "INVALID_ID",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Storage(err) => match err.category() {
                ErrorCategory::NotFound => "NOT_FOUND",
                ErrorCategory::Conflict => "CONFLICT",
                ErrorCategory::Validation => "VALIDATION_ERROR",
                ErrorCategory::Internal => "STORAGE_ERROR",
            },
        }
    }

    /// Returns `true` for errors caused by the model descriptors or builder
    /// setup rather than by a request.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateModel(_)
                | Self::InvalidName(_)
                | Self::UnknownReference { .. }
                | Self::TypeNameCollision(_)
                | Self::FieldNameCollision { .. }
                | Self::MissingStore(_)
                | Self::SchemaBuildFailed(_)
        )
    }

    /// Converts the error into a GraphQL field error carrying its code.
    #[must_use]
    pub fn to_graphql_error(&self) -> async_graphql::Error {
        let code = self.error_code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", code))
    }
}
