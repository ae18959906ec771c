//! Schema generation from model descriptors.
//!
//! The pipeline runs in four steps:
//! 1. [`ModelRegistry`] records every model name up front.
//! 2. [`TypeMapper`] maps each field descriptor to a GraphQL type, deferring
//!    references to other models by name.
//! 3. [`build_types`] produces one object type per model plus its edge and
//!    connection types into a [`TypeRegistry`].
//! 4. [`FieldAssembler`] and [`ModelSchemaBuilder`] add the Query, Viewer and
//!    Mutation entry points and finish the schema.

mod builder;
mod fields;
mod type_mapper;
mod type_registry;

pub use builder::{ModelSchemaBuilder, SchemaBuilderConfig};
pub use fields::{FieldAssembler, MutationParts};
pub use type_mapper::{
    DATE_SCALAR, FieldResolution, FieldScope, GENERIC_SCALAR, MappedField, ScalarKind, TypeMapper,
    scalar_kind,
};
pub use type_registry::{
    FieldNames, ModelEntry, ModelRegistry, PAGE_INFO_TYPE, TypeRegistry, build_types, page_info_type,
};
