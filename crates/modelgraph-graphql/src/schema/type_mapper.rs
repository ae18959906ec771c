//! Field descriptor to GraphQL type mapping.
//!
//! | descriptor            | GraphQL type                         |
//! |-----------------------|--------------------------------------|
//! | `String`              | `String`                             |
//! | `Number`              | `Float`                              |
//! | `Boolean`             | `Boolean`                            |
//! | `Date`                | `Date` (custom scalar)               |
//! | `ObjectID`            | `ID`                                 |
//! | `ObjectID` + `ref`    | the referenced model type            |
//! | `Array(ObjectID+ref)` | `<Ref>Connection`                    |
//! | `Array(X)`            | `[map(X)]`                           |
//! | `Object(fields)`      | nested `<Parent>_<Field>` object     |
//! | anything else         | `Generic` (untyped scalar)           |
//!
//! Reference fields never dereference another model's type. They emit a
//! named type reference that the engine binds when the schema is finished,
//! so a model may point at itself or at a model that is built later.

use async_graphql::dynamic::{Object, TypeRef};
use tracing::{debug, trace};

use super::type_registry::{FieldNames, ModelRegistry, TypeRegistry};
use crate::error::GraphQLError;
use crate::model::{FieldDescriptor, FieldKind, FieldMap};
use crate::naming::{connection_type_name, nested_type_name, sanitize_field_name};
use crate::resolvers::model_field;

/// Name of the custom date scalar.
pub const DATE_SCALAR: &str = "Date";

/// Name of the untyped fallback scalar.
pub const GENERIC_SCALAR: &str = "Generic";

/// The scalar kinds a field can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Float,
    Boolean,
    Date,
    Id,
    Generic,
}

impl ScalarKind {
    pub fn type_name(self) -> &'static str {
        match self {
            Self::String => TypeRef::STRING,
            Self::Float => TypeRef::FLOAT,
            Self::Boolean => TypeRef::BOOLEAN,
            Self::Date => DATE_SCALAR,
            Self::Id => TypeRef::ID,
            Self::Generic => GENERIC_SCALAR,
        }
    }

    pub fn type_ref(self) -> TypeRef {
        TypeRef::named(self.type_name())
    }
}

/// Returns the scalar a field kind maps to, or `None` for structured kinds.
///
/// Reference-ness is ignored here: an `ObjectID` with `ref` is still an `ID`
/// when used as a filter or input.
pub fn scalar_kind(kind: &FieldKind) -> Option<ScalarKind> {
    match kind {
        FieldKind::String => Some(ScalarKind::String),
        FieldKind::Number => Some(ScalarKind::Float),
        FieldKind::Boolean => Some(ScalarKind::Boolean),
        FieldKind::Date => Some(ScalarKind::Date),
        FieldKind::ObjectId => Some(ScalarKind::Id),
        FieldKind::Other(_) => Some(ScalarKind::Generic),
        // GraphQL object types need at least one field.
        FieldKind::Object(fields) if fields.is_empty() => Some(ScalarKind::Generic),
        FieldKind::Array(_) | FieldKind::Object(_) => None,
    }
}

/// How a generated field obtains its value from the parent record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldResolution {
    /// Read the value straight off the parent object.
    Value,
    /// The parent holds a local id; load that record of `model`.
    Reference { model: String },
    /// The parent holds a list of local ids; page through them as a connection.
    Connection { model: String },
}

/// Result of mapping one field descriptor.
#[derive(Debug, Clone)]
pub struct MappedField {
    pub type_ref: TypeRef,
    pub resolution: FieldResolution,
}

impl MappedField {
    fn value(type_ref: TypeRef) -> Self {
        Self {
            type_ref,
            resolution: FieldResolution::Value,
        }
    }
}

/// Where a field being mapped lives.
#[derive(Debug, Clone)]
pub struct FieldScope {
    /// The top-level model the field belongs to.
    pub model: String,
    /// The GraphQL type the field is declared on.
    pub type_name: String,
    /// Dotted path from the model root, for error messages.
    pub path: String,
}

impl FieldScope {
    pub fn model_root(model: &str) -> Self {
        Self {
            model: model.to_string(),
            type_name: model.to_string(),
            path: String::new(),
        }
    }

    fn field_path(&self, field: &str) -> String {
        if self.path.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", self.path, field)
        }
    }

    fn nested(&self, field: &str, types: &TypeRegistry) -> Self {
        let base = nested_type_name(&self.type_name, field);
        Self {
            model: self.model.clone(),
            type_name: types.nested_name(&self.type_name, &base),
            path: self.field_path(field),
        }
    }
}

/// Maps field descriptors to GraphQL types against one model registry.
pub struct TypeMapper<'a> {
    models: &'a ModelRegistry,
}

impl<'a> TypeMapper<'a> {
    pub fn new(models: &'a ModelRegistry) -> Self {
        Self { models }
    }

    /// Maps one field.
    ///
    /// Nested object types discovered on the way are built and added to
    /// `types`. Unknown instance kinds never fail; only a `ref` to a model
    /// outside the registry does.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::UnknownReference` for dangling references and
    /// `GraphQLError::TypeNameCollision` if a nested type name is taken.
    pub fn map_field(
        &self,
        scope: &FieldScope,
        field: &str,
        descriptor: &FieldDescriptor,
        types: &mut TypeRegistry,
    ) -> Result<MappedField, GraphQLError> {
        if let Some(target) = descriptor.reference_target() {
            let entry = self
                .models
                .resolve_reference(&scope.model, &scope.field_path(field), target)?;
            trace!(field = %scope.field_path(field), target = %entry.name, "Mapped reference field");
            return Ok(MappedField {
                type_ref: TypeRef::named(entry.name.clone()),
                resolution: FieldResolution::Reference {
                    model: entry.name.clone(),
                },
            });
        }

        if let Some(scalar) = scalar_kind(&descriptor.kind) {
            return Ok(MappedField::value(scalar.type_ref()));
        }

        match &descriptor.kind {
            FieldKind::Array(caster) => {
                if let Some(target) = caster.reference_target() {
                    let entry =
                        self.models
                            .resolve_reference(&scope.model, &scope.field_path(field), target)?;
                    return Ok(MappedField {
                        type_ref: TypeRef::named(connection_type_name(&entry.name)),
                        resolution: FieldResolution::Connection {
                            model: entry.name.clone(),
                        },
                    });
                }
                let element = self.map_element(scope, field, caster, types)?;
                Ok(MappedField::value(TypeRef::List(Box::new(element))))
            }
            FieldKind::Object(fields) => {
                let nested = scope.nested(field, types);
                let type_name = nested.type_name.clone();
                let object = self.build_object(&nested, Object::new(&type_name), fields, types)?;
                types.insert_nested(&scope.type_name, &type_name, object)?;
                Ok(MappedField::value(TypeRef::named(type_name)))
            }
            // Scalar kinds were handled above.
            _ => Ok(MappedField::value(ScalarKind::Generic.type_ref())),
        }
    }

    /// Maps a list element. References inside lists of lists have no
    /// connection to hang off, so they stay plain ids.
    fn map_element(
        &self,
        scope: &FieldScope,
        field: &str,
        descriptor: &FieldDescriptor,
        types: &mut TypeRegistry,
    ) -> Result<TypeRef, GraphQLError> {
        if let Some(target) = descriptor.reference_target() {
            self.models
                .resolve_reference(&scope.model, &scope.field_path(field), target)?;
            return Ok(ScalarKind::Id.type_ref());
        }
        if let FieldKind::Array(inner) = &descriptor.kind {
            let element = self.map_element(scope, field, inner, types)?;
            return Ok(TypeRef::List(Box::new(element)));
        }
        Ok(self.map_field(scope, field, descriptor, types)?.type_ref)
    }

    /// Adds one GraphQL field per descriptor to `object`.
    ///
    /// A descriptor named `id` is skipped on model roots, where the global
    /// id owns that slot.
    ///
    /// # Errors
    ///
    /// Besides the mapping errors, returns `GraphQLError::FieldNameCollision`
    /// when two descriptors sanitize to the same field name.
    pub fn build_object(
        &self,
        scope: &FieldScope,
        mut object: Object,
        fields: &FieldMap,
        types: &mut TypeRegistry,
    ) -> Result<Object, GraphQLError> {
        let root = scope.path.is_empty();
        let mut names = if root {
            FieldNames::with_fixed(&scope.type_name, &["id"])
        } else {
            FieldNames::new(&scope.type_name)
        };
        for (field, descriptor) in fields {
            let graphql_name = sanitize_field_name(field);
            if root && graphql_name == "id" {
                debug!(model = %scope.model, "Skipping descriptor field shadowing the global id");
                continue;
            }
            names.claim(&graphql_name)?;
            let mapped = self.map_field(scope, field, descriptor, types)?;
            object = object.field(model_field(field, &mapped));
        }
        Ok(object)
    }
}
