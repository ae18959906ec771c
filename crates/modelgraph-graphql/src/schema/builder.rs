//! Model GraphQL schema builder.
//!
//! This module provides `ModelSchemaBuilder`, which generates a Relay
//! compliant GraphQL schema from a set of model descriptors. The builder uses
//! async-graphql's dynamic schema API to construct the schema at runtime.

use std::sync::Arc;

use async_graphql::Value;
use async_graphql::dynamic::{
    Field, FieldFuture, InputValue, Interface, InterfaceField, Object, Scalar, Schema,
    SchemaBuilder, TypeRef,
};
use tracing::{debug, trace};

use super::fields::FieldAssembler;
use super::type_mapper::{DATE_SCALAR, GENERIC_SCALAR};
use super::type_registry::{FieldNames, ModelRegistry, build_types, page_info_type};
use crate::context::ModelStores;
use crate::error::GraphQLError;
use crate::model::ModelSet;
use crate::relay::{NODE_INTERFACE, VIEWER_ID, VIEWER_TYPE, to_global_id};
use crate::resolvers::{NodeResolver, ViewerResolver};

/// Configuration for the schema builder.
#[derive(Debug, Clone)]
pub struct SchemaBuilderConfig {
    /// Whether to generate the Mutation root.
    pub mutation: bool,

    /// Maximum query depth allowed.
    pub max_depth: usize,

    /// Maximum query complexity allowed.
    pub max_complexity: usize,

    /// Whether to enable introspection queries.
    pub introspection_enabled: bool,
}

impl Default for SchemaBuilderConfig {
    fn default() -> Self {
        Self {
            mutation: true,
            max_depth: 15,
            max_complexity: 500,
            introspection_enabled: true,
        }
    }
}

/// Builds a GraphQL schema from model descriptors.
///
/// `ModelSchemaBuilder` generates a complete schema including:
/// - `Date` and `Generic` scalars
/// - One `Node` object type per model, with edge and connection types
/// - The `Viewer` singleton and the `node(id:)` entry point
/// - Query fields per model (single read, filtered list, connection)
/// - Mutation fields per model (add, update, delete), unless disabled
///
/// # Example
///
/// ```ignore
/// let models = ModelSet::from_json(&std::fs::read_to_string("models.json")?)?;
/// let stores = ModelStores::new().with_default(Arc::new(InMemoryStore::new()));
///
/// let schema = ModelSchemaBuilder::new(models, stores, SchemaBuilderConfig::default())
///     .build()?;
/// ```
pub struct ModelSchemaBuilder {
    /// Model descriptors, validated.
    models: ModelSet,

    /// Stores serving each model; attached to the schema as data.
    stores: ModelStores,

    /// Configuration options.
    config: SchemaBuilderConfig,
}

impl ModelSchemaBuilder {
    /// Creates a new schema builder.
    #[must_use]
    pub fn new(models: ModelSet, stores: ModelStores, config: SchemaBuilderConfig) -> Self {
        Self {
            models,
            stores,
            config,
        }
    }

    /// Builds the GraphQL schema.
    ///
    /// Each call builds a fresh schema. Two calls on the same inputs produce
    /// structurally identical schemas.
    ///
    /// # Errors
    ///
    /// Returns an error if a model lacks a store, a field references an
    /// unknown model, or two generated types (or two fields of one type)
    /// share a name. Engine rejections of the assembled schema are
    /// reported as `SchemaBuildFailed`.
    pub fn build(&self) -> Result<Schema, GraphQLError> {
        debug!(models = self.models.len(), "Starting GraphQL schema build");

        let models = ModelRegistry::new(&self.models);
        for entry in models.iter() {
            self.stores.require(&entry.name)?;
        }

        let mut types = build_types(&models)?;
        let assemblers: Vec<FieldAssembler<'_>> = models.iter().map(FieldAssembler::new).collect();

        let with_mutation = self.config.mutation && !models.is_empty();
        let mut schema_builder =
            Schema::build("Query", with_mutation.then_some("Mutation"), None);

        // Register custom scalars
        schema_builder = register_scalars(schema_builder);

        // Node interface and the types implementing it
        schema_builder = schema_builder.register(node_interface());
        schema_builder = schema_builder.register(page_info_type());

        let mut viewer = viewer_type();
        let mut viewer_names = FieldNames::with_fixed(VIEWER_TYPE, &["id"]);
        let mut query = Object::new("Query").description("Query root");
        let mut query_names = FieldNames::with_fixed("Query", &["viewer", "node"]);
        query = query.field(
            Field::new("viewer", TypeRef::named(VIEWER_TYPE), ViewerResolver::resolve())
                .description("The viewer singleton, entry point to all model connections"),
        );
        query = query.field(
            Field::new(
                "node",
                TypeRef::named(NODE_INTERFACE),
                NodeResolver::resolve(Arc::new(models.node_table())),
            )
            .argument(InputValue::new("id", TypeRef::named_nn(TypeRef::ID)))
            .description("Fetch any object by its global id"),
        );

        for assembler in &assemblers {
            for field in assembler.viewer_fields(&mut viewer_names)? {
                viewer = viewer.field(field);
            }
            for field in assembler.query_fields(&mut query_names)? {
                query = query.field(field);
            }
        }
        schema_builder = schema_builder.register(viewer).register(query);

        // Build Mutation type
        if with_mutation {
            let mut mutation = Object::new("Mutation").description("Mutation root");
            let mut mutation_names = FieldNames::new("Mutation");
            for assembler in &assemblers {
                for parts in assembler.mutations(&mut types, &mut mutation_names)? {
                    mutation = mutation.field(parts.field);
                    schema_builder = schema_builder.register(parts.input).register(parts.payload);
                }
            }
            schema_builder = schema_builder.register(mutation);
        } else {
            debug!("Mutation root disabled");
        }

        for (type_name, object) in types.into_objects() {
            trace!(type_name = %type_name, "Registering type");
            schema_builder = schema_builder.register(object);
        }

        // Configure limits
        let mut schema_builder = schema_builder
            .data(self.stores.clone())
            .limit_depth(self.config.max_depth)
            .limit_complexity(self.config.max_complexity);

        // Enable/disable introspection
        if !self.config.introspection_enabled {
            schema_builder = schema_builder.disable_introspection();
        }

        // Build the schema
        let schema = schema_builder
            .finish()
            .map_err(|e| GraphQLError::SchemaBuildFailed(e.to_string()))?;

        debug!("GraphQL schema build complete");
        Ok(schema)
    }
}

/// Registers the custom scalar types.
fn register_scalars(builder: SchemaBuilder) -> SchemaBuilder {
    let date = Scalar::new(DATE_SCALAR)
        .description("A date as an ISO 8601 string")
        .validator(|value| matches!(value, Value::String(_)));
    let generic = Scalar::new(GENERIC_SCALAR).description("An untyped JSON value");

    builder.register(date).register(generic)
}

fn node_interface() -> Interface {
    Interface::new(NODE_INTERFACE)
        .description("An object with a globally unique ID")
        .field(InterfaceField::new("id", TypeRef::named_nn(TypeRef::ID)))
}

fn viewer_type() -> Object {
    Object::new(VIEWER_TYPE)
        .description("Root of the model graph")
        .implement(NODE_INTERFACE)
        .field(Field::new("id", TypeRef::named_nn(TypeRef::ID), |_| {
            FieldFuture::new(async {
                Ok(Some(Value::String(to_global_id(VIEWER_TYPE, VIEWER_ID))))
            })
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldDescriptor, ModelDescriptor};
    use modelgraph_db_memory::InMemoryStore;

    fn stores() -> ModelStores {
        ModelStores::new().with_default(Arc::new(InMemoryStore::new()))
    }

    fn user_models() -> ModelSet {
        ModelSet::new(vec![
            ModelDescriptor::new("User")
                .field("name", FieldDescriptor::string())
                .field("age", FieldDescriptor::number())
                .field("mother", FieldDescriptor::reference("User"))
                .field("friends", FieldDescriptor::array(FieldDescriptor::reference("User"))),
        ])
        .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = SchemaBuilderConfig::default();
        assert!(config.mutation);
        assert_eq!(config.max_depth, 15);
        assert_eq!(config.max_complexity, 500);
        assert!(config.introspection_enabled);
    }

    #[test]
    fn test_schema_builder_creates_valid_schema() {
        let schema = ModelSchemaBuilder::new(user_models(), stores(), SchemaBuilderConfig::default())
            .build()
            .unwrap();
        let sdl = schema.sdl();

        assert!(sdl.contains("type Query"), "Schema should have Query type");
        assert!(sdl.contains("type Mutation"), "Schema should have Mutation type");
        assert!(sdl.contains("scalar Date"));
        assert!(sdl.contains("scalar Generic"));
        assert!(sdl.contains("interface Node"));
        assert!(sdl.contains("type User implements Node"));
        assert!(sdl.contains("type UserConnection"));
        assert!(sdl.contains("type UserEdge"));
        assert!(sdl.contains("type PageInfo"));
        assert!(sdl.contains("type Viewer implements Node"));
    }

    #[test]
    fn test_mutation_disabled() {
        let config = SchemaBuilderConfig {
            mutation: false,
            ..Default::default()
        };
        let schema = ModelSchemaBuilder::new(user_models(), stores(), config)
            .build()
            .unwrap();
        let sdl = schema.sdl();

        assert!(!sdl.contains("type Mutation"));
        assert!(!sdl.contains("addUserInput"));
    }

    #[test]
    fn test_empty_model_set_has_no_mutation() {
        let schema = ModelSchemaBuilder::new(ModelSet::default(), ModelStores::new(), SchemaBuilderConfig::default())
            .build()
            .unwrap();
        let sdl = schema.sdl();

        assert!(sdl.contains("type Query"));
        assert!(sdl.contains("viewer"));
        assert!(!sdl.contains("type Mutation"));
    }

    #[test]
    fn test_missing_store_is_config_error() {
        let err = ModelSchemaBuilder::new(user_models(), ModelStores::new(), SchemaBuilderConfig::default())
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, GraphQLError::MissingStore(ref model) if model == "User"));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_schema_with_disabled_introspection() {
        let config = SchemaBuilderConfig {
            introspection_enabled: false,
            ..Default::default()
        };
        let result = ModelSchemaBuilder::new(user_models(), stores(), config).build();

        assert!(result.is_ok(), "Schema should build with introspection disabled");
    }

    #[test]
    fn test_model_without_fields_has_only_id() {
        let models = ModelSet::new(vec![ModelDescriptor::new("Tag")]).unwrap();
        let schema = ModelSchemaBuilder::new(models, stores(), SchemaBuilderConfig::default())
            .build()
            .unwrap();

        assert!(schema.sdl().contains("type Tag implements Node"));
    }
}
