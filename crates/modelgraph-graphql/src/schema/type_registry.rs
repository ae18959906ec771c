//! Model and type registries.
//!
//! [`ModelRegistry`] knows every model name before any field is mapped, so a
//! reference can be checked without the referenced type existing yet.
//! [`TypeRegistry`] collects the generated object types and guarantees each
//! name is produced exactly once.

use std::collections::{HashMap, HashSet};

use async_graphql::dynamic::{Object, TypeRef};
use indexmap::IndexMap;
use tracing::{debug, trace};

use super::type_mapper::{DATE_SCALAR, FieldScope, GENERIC_SCALAR, TypeMapper};
use crate::error::GraphQLError;
use crate::model::{ModelDescriptor, ModelSet};
use crate::naming::{connection_type_name, edge_type_name};
use crate::relay::{NODE_INTERFACE, NodeTable, VIEWER_TYPE};
use crate::resolvers::{global_id_field, value_field};

/// Shared Relay page info type.
pub const PAGE_INFO_TYPE: &str = "PageInfo";

/// Names the generated types may never take.
const RESERVED_TYPE_NAMES: &[&str] = &[
    "Query",
    "Mutation",
    NODE_INTERFACE,
    VIEWER_TYPE,
    PAGE_INFO_TYPE,
    DATE_SCALAR,
    GENERIC_SCALAR,
];

/// One model known to the schema.
#[derive(Debug, Clone)]
pub struct ModelEntry {
    pub name: String,
    pub descriptor: ModelDescriptor,
}

/// Every model participating in one schema build.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    entries: IndexMap<String, ModelEntry>,
}

impl ModelRegistry {
    pub fn new(models: &ModelSet) -> Self {
        let entries = models
            .iter()
            .map(|descriptor| {
                (
                    descriptor.name.clone(),
                    ModelEntry {
                        name: descriptor.name.clone(),
                        descriptor: descriptor.clone(),
                    },
                )
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&ModelEntry> {
        self.entries.get(name)
    }

    /// Looks up the target of a reference declared on `model.field`.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::UnknownReference` when `target` is not a model.
    pub fn resolve_reference(
        &self,
        model: &str,
        field: &str,
        target: &str,
    ) -> Result<&ModelEntry, GraphQLError> {
        self.entries
            .get(target)
            .ok_or_else(|| GraphQLError::UnknownReference {
                model: model.to_string(),
                field: field.to_string(),
                target: target.to_string(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Global id lookup table for the `node` field.
    pub fn node_table(&self) -> NodeTable {
        NodeTable::new(self.entries.keys().cloned())
    }
}

/// Registry of generated object types.
#[derive(Default)]
pub struct TypeRegistry {
    /// Names that belong to fixed schema types.
    reserved: HashSet<String>,
    /// Types currently being generated.
    generating: HashSet<String>,
    /// Generated Object types ready for registration, in generation order.
    objects: IndexMap<String, Object>,
    /// Nested object types mapped to the type declaring them.
    nested_parents: HashMap<String, String>,
}

impl TypeRegistry {
    /// Creates an empty registry with the fixed schema type names reserved.
    pub fn new() -> Self {
        Self {
            reserved: RESERVED_TYPE_NAMES.iter().map(|s| (*s).to_string()).collect(),
            ..Self::default()
        }
    }

    /// Checks if a type has been generated or is being generated.
    pub fn is_known(&self, type_name: &str) -> bool {
        self.objects.contains_key(type_name) || self.generating.contains(type_name)
    }

    /// Claims a type name before its fields are generated.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::TypeNameCollision` if the name is reserved or
    /// already claimed.
    pub fn start_generating(&mut self, type_name: &str) -> Result<(), GraphQLError> {
        if self.reserved.contains(type_name) || self.is_known(type_name) {
            return Err(GraphQLError::TypeNameCollision(type_name.to_string()));
        }
        self.generating.insert(type_name.to_string());
        Ok(())
    }

    /// Stores the finished Object for a claimed name.
    pub fn finish_generating(&mut self, type_name: &str, object: Object) {
        self.generating.remove(type_name);
        self.objects.insert(type_name.to_string(), object);
        trace!(type_name = %type_name, "Generated type");
    }

    /// Claims a name and stores its Object in one step.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::TypeNameCollision` if the name is taken.
    pub fn insert(&mut self, type_name: &str, object: Object) -> Result<(), GraphQLError> {
        if self.reserved.contains(type_name) || self.objects.contains_key(type_name) {
            return Err(GraphQLError::TypeNameCollision(type_name.to_string()));
        }
        self.finish_generating(type_name, object);
        Ok(())
    }

    /// Stores a nested object type declared on `parent`.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::TypeNameCollision` if the name is taken.
    pub fn insert_nested(
        &mut self,
        parent: &str,
        type_name: &str,
        object: Object,
    ) -> Result<(), GraphQLError> {
        self.insert(type_name, object)?;
        self.nested_parents
            .insert(type_name.to_string(), parent.to_string());
        Ok(())
    }

    /// Picks the name of a nested type of `parent`.
    ///
    /// Sibling fields differing only in case (`address`, `Address`) share a
    /// base name; later ones get a numeric suffix (`User_Address2`).
    pub fn nested_name(&self, parent: &str, base: &str) -> String {
        let mut name = base.to_string();
        let mut suffix = 2;
        while self
            .nested_parents
            .get(&name)
            .is_some_and(|owner| owner == parent)
        {
            name = format!("{base}{suffix}");
            suffix += 1;
        }
        name
    }

    /// Claims a name for a type built outside this registry, such as a
    /// mutation input object.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::TypeNameCollision` if the name is taken.
    pub fn reserve(&mut self, type_name: &str) -> Result<(), GraphQLError> {
        if self.reserved.contains(type_name) || self.is_known(type_name) {
            return Err(GraphQLError::TypeNameCollision(type_name.to_string()));
        }
        self.reserved.insert(type_name.to_string());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    /// Consumes the registry, returning all generated objects.
    pub fn into_objects(self) -> impl Iterator<Item = (String, Object)> {
        self.objects.into_iter()
    }
}

/// Field names already taken on one object or input type.
///
/// `async_graphql::dynamic` refuses duplicate fields by panicking, so every
/// generated field name is claimed here first.
#[derive(Debug)]
pub struct FieldNames {
    type_name: String,
    claimed: HashSet<String>,
}

impl FieldNames {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            claimed: HashSet::new(),
        }
    }

    /// Starts with `fixed` already claimed.
    pub fn with_fixed(type_name: impl Into<String>, fixed: &[&str]) -> Self {
        let mut names = Self::new(type_name);
        names.claimed.extend(fixed.iter().map(|f| (*f).to_string()));
        names
    }

    /// Claims a field name.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::FieldNameCollision` if the name is taken.
    pub fn claim(&mut self, field: &str) -> Result<(), GraphQLError> {
        if !self.claimed.insert(field.to_string()) {
            return Err(GraphQLError::FieldNameCollision {
                type_name: self.type_name.clone(),
                field: field.to_string(),
            });
        }
        Ok(())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.claimed.contains(field)
    }
}

/// Builds the object, edge and connection types of every model, plus the
/// shared `PageInfo` type.
///
/// The returned registry holds exactly one type per model name. References
/// between models are by name, so models may reference themselves or each
/// other in any order.
///
/// # Errors
///
/// Fails on a reference to a model outside `models` or on a generated name
/// clash.
pub fn build_types(models: &ModelRegistry) -> Result<TypeRegistry, GraphQLError> {
    let mut types = TypeRegistry::new();
    let mapper = TypeMapper::new(models);

    for entry in models.iter() {
        let name = entry.name.as_str();

        // Claim the model's own name first so nested types cannot take it.
        types.start_generating(name)?;

        let object = Object::new(name)
            .description(format!("A {name} record"))
            .implement(NODE_INTERFACE)
            .field(global_id_field(name));
        let object = mapper.build_object(
            &FieldScope::model_root(name),
            object,
            &entry.descriptor.fields,
            &mut types,
        )?;
        types.finish_generating(name, object);

        types.insert(&edge_type_name(name), edge_type(name))?;
        types.insert(&connection_type_name(name), connection_type(name))?;
    }

    debug!(
        models = models.len(),
        types = types.len(),
        "Generated model types"
    );
    Ok(types)
}

fn edge_type(model: &str) -> Object {
    Object::new(edge_type_name(model))
        .description(format!("An edge in a {model} connection"))
        .field(value_field("cursor", TypeRef::named_nn(TypeRef::STRING)))
        .field(value_field("node", TypeRef::named(model)))
}

fn connection_type(model: &str) -> Object {
    Object::new(connection_type_name(model))
        .description(format!("A connection to a list of {model} records"))
        .field(value_field("count", TypeRef::named_nn(TypeRef::INT)))
        .field(value_field("pageInfo", TypeRef::named_nn(PAGE_INFO_TYPE)))
        .field(value_field("edges", TypeRef::named_list(edge_type_name(model))))
}

/// The shared Relay `PageInfo` type.
pub fn page_info_type() -> Object {
    Object::new(PAGE_INFO_TYPE)
        .description("Information about pagination in a connection")
        .field(value_field("hasNextPage", TypeRef::named_nn(TypeRef::BOOLEAN)))
        .field(value_field("hasPreviousPage", TypeRef::named_nn(TypeRef::BOOLEAN)))
        .field(value_field("startCursor", TypeRef::named(TypeRef::STRING)))
        .field(value_field("endCursor", TypeRef::named(TypeRef::STRING)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldDescriptor;

    fn user_models() -> ModelRegistry {
        let set = ModelSet::new(vec![
            ModelDescriptor::new("User")
                .field("name", FieldDescriptor::string())
                .field("mother", FieldDescriptor::reference("User"))
                .field("friends", FieldDescriptor::array(FieldDescriptor::reference("User")))
                .field(
                    "address",
                    FieldDescriptor::object([("city", FieldDescriptor::string())]),
                ),
        ])
        .unwrap();
        ModelRegistry::new(&set)
    }

    #[test]
    fn test_type_registry_rejects_reserved_names() {
        let mut registry = TypeRegistry::new();
        assert!(matches!(
            registry.start_generating("PageInfo"),
            Err(GraphQLError::TypeNameCollision(name)) if name == "PageInfo"
        ));
        assert!(registry.insert("Viewer", Object::new("Viewer")).is_err());
    }

    #[test]
    fn test_type_registry_tracks_generation() {
        let mut registry = TypeRegistry::new();

        registry.start_generating("User").unwrap();
        assert!(registry.is_known("User"));
        assert!(registry.is_empty());

        // Claimed names cannot be claimed again while in progress.
        assert!(registry.start_generating("User").is_err());

        registry.finish_generating("User", Object::new("User"));
        assert!(registry.is_known("User"));
        assert_eq!(registry.len(), 1);
        assert!(registry.insert("User", Object::new("User")).is_err());
    }

    #[test]
    fn test_build_types_one_type_per_model() {
        let types = build_types(&user_models()).unwrap();
        let names: Vec<_> = types.type_names().collect();

        assert_eq!(
            names,
            vec!["User_Address", "User", "UserEdge", "UserConnection"]
        );
    }

    #[test]
    fn test_build_types_unknown_reference() {
        let set = ModelSet::new(vec![
            ModelDescriptor::new("User").field("pet", FieldDescriptor::reference("Pet")),
        ])
        .unwrap();

        let err = build_types(&ModelRegistry::new(&set)).err().unwrap();
        assert!(matches!(err, GraphQLError::UnknownReference { .. }));
    }

    #[test]
    fn test_build_types_nested_name_collision() {
        // `User.address` generates `User_Address`, which is also a model.
        let set = ModelSet::new(vec![
            ModelDescriptor::new("User").field(
                "address",
                FieldDescriptor::object([("city", FieldDescriptor::string())]),
            ),
            ModelDescriptor::new("User_Address").field("city", FieldDescriptor::string()),
        ])
        .unwrap();

        let err = build_types(&ModelRegistry::new(&set)).err().unwrap();
        assert!(matches!(err, GraphQLError::TypeNameCollision(name) if name == "User_Address"));
    }

    #[test]
    fn test_field_names_reject_duplicates() {
        let mut names = FieldNames::with_fixed("Query", &["viewer", "node"]);
        names.claim("user").unwrap();

        assert!(names.contains("viewer"));
        assert!(matches!(
            names.claim("user"),
            Err(GraphQLError::FieldNameCollision { ref type_name, ref field })
                if type_name == "Query" && field == "user"
        ));
        assert!(names.claim("viewer").is_err());
    }

    #[test]
    fn test_nested_name_numbers_sibling_clashes() {
        let mut registry = TypeRegistry::new();
        assert_eq!(registry.nested_name("User", "User_Address"), "User_Address");

        registry
            .insert_nested("User", "User_Address", Object::new("User_Address"))
            .unwrap();
        assert_eq!(registry.nested_name("User", "User_Address"), "User_Address2");
        // Only siblings are numbered; other clashes stay errors.
        assert_eq!(registry.nested_name("Post", "User_Address"), "User_Address");
    }

    #[test]
    fn test_build_types_case_variant_nested_fields() {
        let set = ModelSet::new(vec![
            ModelDescriptor::new("User")
                .field(
                    "address",
                    FieldDescriptor::object([("city", FieldDescriptor::string())]),
                )
                .field(
                    "Address",
                    FieldDescriptor::object([("street", FieldDescriptor::string())]),
                ),
        ])
        .unwrap();

        let types = build_types(&ModelRegistry::new(&set)).unwrap();
        let names: Vec<_> = types.type_names().collect();
        assert_eq!(
            names,
            vec!["User_Address", "User_Address2", "User", "UserEdge", "UserConnection"]
        );
    }

    #[test]
    fn test_build_types_sanitized_field_clash() {
        let set = ModelSet::new(vec![
            ModelDescriptor::new("User")
                .field("first-name", FieldDescriptor::string())
                .field("first_name", FieldDescriptor::string()),
        ])
        .unwrap();

        let err = build_types(&ModelRegistry::new(&set)).err().unwrap();
        assert!(matches!(
            err,
            GraphQLError::FieldNameCollision { ref type_name, ref field }
                if type_name == "User" && field == "first_name"
        ));
    }

    #[test]
    fn test_model_registry_lookup() {
        let models = user_models();
        assert_eq!(models.len(), 1);
        assert!(models.get("User").is_some());
        assert!(models.resolve_reference("User", "mother", "User").is_ok());
        assert!(models.node_table().contains("User"));
    }
}
