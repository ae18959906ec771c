//! Per-model root, viewer and mutation fields.
//!
//! For a model `User` the assembler produces:
//!
//! - `user(id: ID!): User` on Query and Viewer
//! - `users(<filters>, id: ID, ids: [ID]): [User]` on Query
//! - `usersConnection(<filters>, first, after, last, before): UserConnection`
//!   on Query, and the same connection as `users` on Viewer
//! - `addUser`, `updateUser` and `deleteUser` with their input and payload
//!   types

use std::sync::Arc;

use async_graphql::dynamic::{Field, InputObject, InputValue, Object, TypeRef};
use tracing::{debug, trace};

use super::type_mapper::scalar_kind;
use super::type_registry::{FieldNames, ModelEntry, TypeRegistry};
use crate::error::GraphQLError;
use crate::model::{FieldDescriptor, FieldKind};
use crate::naming::{
    add_mutation_name, changed_edge_field_name, changed_field_name, connection_type_name,
    delete_mutation_name, edge_type_name, input_type_name, payload_type_name, plural_name,
    root_connection_name, sanitize_field_name, singular_name, update_mutation_name,
};
use crate::relay::VIEWER_TYPE;
use crate::resolvers::{
    ArgBinding, CONNECTION_ARGUMENTS, ConnectionResolver, CreateResolver, DeleteResolver,
    ListResolver, ReadResolver, UpdateResolver, add_connection_arguments, value_field,
};

const CLIENT_MUTATION_ID: &str = "clientMutationId";

/// Arguments the plural list field declares next to its filters.
const LIST_ARGUMENTS: [&str; 2] = ["id", "ids"];

/// The mutation field of one operation plus the types it introduces.
pub struct MutationParts {
    pub field: Field,
    pub input: InputObject,
    pub payload: Object,
}

/// Assembles the entry-point fields of one model.
pub struct FieldAssembler<'a> {
    entry: &'a ModelEntry,
    filters: Vec<ArgBinding>,
    /// Filters left once the plural field's own arguments are taken.
    list_filters: Arc<Vec<ArgBinding>>,
    /// Filters left once the pagination arguments are taken.
    connection_filters: Arc<Vec<ArgBinding>>,
    inputs: Arc<Vec<ArgBinding>>,
}

impl<'a> FieldAssembler<'a> {
    pub fn new(entry: &'a ModelEntry) -> Self {
        let filters = filter_bindings(entry);
        Self {
            entry,
            list_filters: Arc::new(without_arguments(&entry.name, &filters, &LIST_ARGUMENTS)),
            connection_filters: Arc::new(without_arguments(
                &entry.name,
                &filters,
                &CONNECTION_ARGUMENTS,
            )),
            filters,
            inputs: Arc::new(input_bindings(entry)),
        }
    }

    fn model(&self) -> &str {
        &self.entry.name
    }

    /// `user(id: ID!): User`
    pub fn singular_field(&self) -> Field {
        let model = self.model();
        Field::new(
            singular_name(model),
            TypeRef::named(model),
            ReadResolver::resolve(model.to_string()),
        )
        .argument(InputValue::new("id", TypeRef::named_nn(TypeRef::ID)))
        .description(format!("Fetch a single {model} by id"))
    }

    /// `users(<filters>, id: ID, ids: [ID]): [User]`
    pub fn plural_field(&self) -> Field {
        let model = self.model();
        let field = Field::new(
            plural_name(model),
            TypeRef::named_list(model),
            ListResolver::resolve(model.to_string(), self.list_filters.clone()),
        )
        .description(format!("List {model} records matching the given filters"));

        add_filter_arguments(field, &self.list_filters)
            .argument(InputValue::new("id", TypeRef::named(TypeRef::ID)))
            .argument(InputValue::new("ids", TypeRef::named_list(TypeRef::ID)))
    }

    /// A filtered connection over all records, under `name`.
    pub fn connection_field(&self, name: String) -> Field {
        let model = self.model();
        let field = Field::new(
            name,
            TypeRef::named(connection_type_name(model)),
            ConnectionResolver::resolve(model.to_string(), self.connection_filters.clone()),
        )
        .description(format!("Page through {model} records"));

        add_connection_arguments(add_filter_arguments(field, &self.connection_filters))
    }

    /// Fields for the Query root, with their names claimed in `names`.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::FieldNameCollision` if another model (or a
    /// fixed root field) already uses one of the names.
    pub fn query_fields(&self, names: &mut FieldNames) -> Result<Vec<Field>, GraphQLError> {
        let model = self.model();
        trace!(model = %model, "Assembling query fields");

        names.claim(&singular_name(model))?;
        names.claim(&plural_name(model))?;
        names.claim(&root_connection_name(model))?;
        Ok(vec![
            self.singular_field(),
            self.plural_field(),
            self.connection_field(root_connection_name(model)),
        ])
    }

    /// Fields for the Viewer type. The plural slot holds the connection.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::FieldNameCollision` on a name clash.
    pub fn viewer_fields(&self, names: &mut FieldNames) -> Result<Vec<Field>, GraphQLError> {
        let model = self.model();
        names.claim(&singular_name(model))?;
        names.claim(&plural_name(model))?;
        Ok(vec![
            self.singular_field(),
            self.connection_field(plural_name(model)),
        ])
    }

    /// `addUser(input: addUserInput!): addUserPayload`
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::FieldNameCollision` if an input field clashes
    /// with `clientMutationId`.
    pub fn add_mutation(&self) -> Result<MutationParts, GraphQLError> {
        let model = self.model();
        let name = add_mutation_name(model);

        let input = self.input_fields(&input_type_name(&name), &[])?;
        let payload = Object::new(payload_type_name(&name))
            .field(value_field("viewer", TypeRef::named(VIEWER_TYPE)))
            .field(value_field(
                &changed_edge_field_name(model),
                TypeRef::named(edge_type_name(model)),
            ))
            .field(value_field(CLIENT_MUTATION_ID, TypeRef::named(TypeRef::STRING)));

        let field = Field::new(
            &name,
            TypeRef::named(payload_type_name(&name)),
            CreateResolver::resolve(model.to_string(), self.inputs.clone()),
        )
        .argument(InputValue::new("input", TypeRef::named_nn(input_type_name(&name))))
        .description(format!("Create a {model}"));

        Ok(MutationParts {
            field,
            input,
            payload,
        })
    }

    /// `updateUser(input: updateUserInput!): updateUserPayload`
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::FieldNameCollision` if an input field clashes
    /// with `clientMutationId`.
    pub fn update_mutation(&self) -> Result<MutationParts, GraphQLError> {
        let model = self.model();
        let name = update_mutation_name(model);

        let input = self.input_fields(&input_type_name(&name), &["id"])?;
        let payload = Object::new(payload_type_name(&name))
            .field(value_field(&changed_field_name(model), TypeRef::named(model)))
            .field(value_field(CLIENT_MUTATION_ID, TypeRef::named(TypeRef::STRING)));

        let field = Field::new(
            &name,
            TypeRef::named(payload_type_name(&name)),
            UpdateResolver::resolve(model.to_string(), self.inputs.clone()),
        )
        .argument(InputValue::new("input", TypeRef::named_nn(input_type_name(&name))))
        .description(format!("Update fields of an existing {model}"));

        Ok(MutationParts {
            field,
            input,
            payload,
        })
    }

    /// `deleteUser(input: deleteUserInput!): deleteUserPayload`
    pub fn delete_mutation(&self) -> MutationParts {
        let model = self.model();
        let name = delete_mutation_name(model);

        let input = InputObject::new(input_type_name(&name))
            .field(InputValue::new("id", TypeRef::named_nn(TypeRef::ID)))
            .field(InputValue::new(CLIENT_MUTATION_ID, TypeRef::named(TypeRef::STRING)));
        let payload = Object::new(payload_type_name(&name))
            .field(value_field("viewer", TypeRef::named(VIEWER_TYPE)))
            .field(value_field("ok", TypeRef::named_nn(TypeRef::BOOLEAN)))
            .field(value_field("id", TypeRef::named_nn(TypeRef::ID)))
            .field(value_field(CLIENT_MUTATION_ID, TypeRef::named(TypeRef::STRING)));

        let field = Field::new(
            &name,
            TypeRef::named(payload_type_name(&name)),
            DeleteResolver::resolve(model.to_string()),
        )
        .argument(InputValue::new("input", TypeRef::named_nn(input_type_name(&name))))
        .description(format!("Delete a {model}"));

        MutationParts {
            field,
            input,
            payload,
        }
    }

    /// All three mutations. Their field names are claimed in `names` and
    /// their input and payload type names in `types`.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::TypeNameCollision` if an input or payload name
    /// is already taken, and `GraphQLError::FieldNameCollision` if a
    /// mutation or input field name is.
    pub fn mutations(
        &self,
        types: &mut TypeRegistry,
        names: &mut FieldNames,
    ) -> Result<Vec<MutationParts>, GraphQLError> {
        let model = self.model();
        for name in [
            add_mutation_name(model),
            update_mutation_name(model),
            delete_mutation_name(model),
        ] {
            names.claim(&name)?;
            types.reserve(&input_type_name(&name))?;
            types.reserve(&payload_type_name(&name))?;
        }
        let parts = vec![
            self.add_mutation()?,
            self.update_mutation()?,
            self.delete_mutation(),
        ];
        trace!(model = %model, "Assembled mutation fields");
        Ok(parts)
    }

    fn input_fields(&self, type_name: &str, fixed: &[&str]) -> Result<InputObject, GraphQLError> {
        let mut names = FieldNames::with_fixed(type_name, fixed);
        let mut input = InputObject::new(type_name);
        for name in fixed {
            input = input.field(InputValue::new(*name, TypeRef::named_nn(TypeRef::ID)));
        }
        for binding in self.inputs.iter() {
            names.claim(&binding.argument)?;
            input = input.field(binding.input_value());
        }
        names.claim(CLIENT_MUTATION_ID)?;
        Ok(input.field(InputValue::new(CLIENT_MUTATION_ID, TypeRef::named(TypeRef::STRING))))
    }

    /// Filter arguments derived from this model's fields.
    pub fn filters(&self) -> &[ArgBinding] {
        &self.filters
    }

    /// Input fields accepted by this model's add and update mutations.
    pub fn inputs(&self) -> &[ArgBinding] {
        &self.inputs
    }
}

fn add_filter_arguments(field: Field, filters: &[ArgBinding]) -> Field {
    filters
        .iter()
        .fold(field, |field, binding| field.argument(binding.input_value()))
}

/// Drops filters whose argument name a field already declares.
fn without_arguments(model: &str, filters: &[ArgBinding], taken: &[&str]) -> Vec<ArgBinding> {
    filters
        .iter()
        .filter(|binding| {
            let shadowed = taken.contains(&binding.argument.as_str());
            if shadowed {
                debug!(
                    model = %model,
                    argument = %binding.argument,
                    "Filter shadowed by a fixed argument"
                );
            }
            !shadowed
        })
        .cloned()
        .collect()
}

/// One binding per top-level scalar field.
fn filter_bindings(entry: &ModelEntry) -> Vec<ArgBinding> {
    entry
        .descriptor
        .fields
        .iter()
        .filter_map(|(field, descriptor)| scalar_binding(field, descriptor))
        .collect()
}

/// Scalar fields not starting with `_`, lists of scalars and reference
/// lists (as id lists).
fn input_bindings(entry: &ModelEntry) -> Vec<ArgBinding> {
    entry
        .descriptor
        .fields
        .iter()
        .filter(|(field, _)| !field.starts_with('_'))
        .filter_map(|(field, descriptor)| {
            if let FieldKind::Array(caster) = &descriptor.kind {
                return list_binding(field, caster);
            }
            scalar_binding(field, descriptor)
        })
        .collect()
}

fn scalar_binding(field: &str, descriptor: &FieldDescriptor) -> Option<ArgBinding> {
    let argument = sanitize_field_name(field);
    if argument == "id" {
        return None;
    }
    let scalar = scalar_kind(&descriptor.kind)?;
    Some(ArgBinding {
        argument,
        field: field.to_string(),
        type_ref: scalar.type_ref(),
        reference: descriptor.reference_target().map(str::to_string),
    })
}

fn list_binding(field: &str, caster: &FieldDescriptor) -> Option<ArgBinding> {
    let element = scalar_binding(field, caster)?;
    Some(ArgBinding {
        type_ref: TypeRef::List(Box::new(element.type_ref)),
        ..element
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelDescriptor, ModelSet};
    use crate::schema::type_registry::ModelRegistry;

    fn user_entry() -> ModelEntry {
        let set = ModelSet::new(vec![
            ModelDescriptor::new("User")
                .field("name", FieldDescriptor::string())
                .field("age", FieldDescriptor::number())
                .field("first-name", FieldDescriptor::string())
                .field("_version", FieldDescriptor::number())
                .field("mother", FieldDescriptor::reference("User"))
                .field("friends", FieldDescriptor::array(FieldDescriptor::reference("User")))
                .field("tags", FieldDescriptor::array(FieldDescriptor::string()))
                .field(
                    "address",
                    FieldDescriptor::object([("city", FieldDescriptor::string())]),
                ),
        ])
        .unwrap();
        ModelRegistry::new(&set).get("User").cloned().unwrap()
    }

    fn summary(bindings: &[ArgBinding]) -> Vec<(String, String)> {
        bindings
            .iter()
            .map(|b| (b.argument.clone(), b.type_ref.to_string()))
            .collect()
    }

    #[test]
    fn test_filters_are_top_level_scalars() {
        let entry = user_entry();
        let assembler = FieldAssembler::new(&entry);

        assert_eq!(
            summary(assembler.filters()),
            vec![
                ("name".to_string(), "String".to_string()),
                ("age".to_string(), "Float".to_string()),
                ("first_name".to_string(), "String".to_string()),
                ("_version".to_string(), "Float".to_string()),
                ("mother".to_string(), "ID".to_string()),
            ]
        );
        let mother = &assembler.filters()[4];
        assert_eq!(mother.reference.as_deref(), Some("User"));
    }

    #[test]
    fn test_inputs_skip_underscore_and_include_lists() {
        let entry = user_entry();
        let assembler = FieldAssembler::new(&entry);

        assert_eq!(
            summary(assembler.inputs()),
            vec![
                ("name".to_string(), "String".to_string()),
                ("age".to_string(), "Float".to_string()),
                ("first_name".to_string(), "String".to_string()),
                ("mother".to_string(), "ID".to_string()),
                ("friends".to_string(), "[ID]".to_string()),
                ("tags".to_string(), "[String]".to_string()),
            ]
        );
        let friends = &assembler.inputs()[4];
        assert_eq!(friends.field, "friends");
        assert_eq!(friends.reference.as_deref(), Some("User"));
    }

    #[test]
    fn test_hyphenated_field_keeps_record_key() {
        let entry = user_entry();
        let assembler = FieldAssembler::new(&entry);
        let binding = &assembler.filters()[2];

        assert_eq!(binding.argument, "first_name");
        assert_eq!(binding.field, "first-name");
    }

    #[test]
    fn test_mutation_names_are_claimed() {
        let entry = user_entry();
        let assembler = FieldAssembler::new(&entry);
        let mut types = TypeRegistry::new();

        let parts = assembler.mutations(&mut types, &mut FieldNames::new("Mutation")).unwrap();
        assert_eq!(parts.len(), 3);
        assert!(matches!(
            assembler.mutations(&mut types, &mut FieldNames::new("Mutation")),
            Err(GraphQLError::TypeNameCollision(name)) if name == "addUserInput"
        ));
    }

    #[test]
    fn test_root_field_names_are_claimed() {
        let entry = user_entry();
        let assembler = FieldAssembler::new(&entry);
        let mut names = FieldNames::with_fixed("Query", &["viewer", "node"]);

        assert_eq!(assembler.query_fields(&mut names).unwrap().len(), 3);
        assert!(names.contains("usersConnection"));
        assert!(matches!(
            assembler.query_fields(&mut names),
            Err(GraphQLError::FieldNameCollision { ref field, .. }) if field == "user"
        ));
    }

    #[test]
    fn test_filters_named_like_fixed_arguments_are_shadowed() {
        let set = ModelSet::new(vec![
            ModelDescriptor::new("Race")
                .field("first", FieldDescriptor::string())
                .field("ids", FieldDescriptor::string())
                .field("name", FieldDescriptor::string()),
        ])
        .unwrap();
        let entry = ModelRegistry::new(&set).get("Race").cloned().unwrap();
        let assembler = FieldAssembler::new(&entry);

        let arguments =
            |bindings: &[ArgBinding]| bindings.iter().map(|b| b.argument.clone()).collect::<Vec<_>>();
        assert_eq!(arguments(assembler.filters()), vec!["first", "ids", "name"]);
        assert_eq!(arguments(assembler.list_filters.as_slice()), vec!["first", "name"]);
        assert_eq!(arguments(assembler.connection_filters.as_slice()), vec!["ids", "name"]);
    }

    #[test]
    fn test_input_field_named_client_mutation_id_is_rejected() {
        let set = ModelSet::new(vec![
            ModelDescriptor::new("Job").field("clientMutationId", FieldDescriptor::string()),
        ])
        .unwrap();
        let entry = ModelRegistry::new(&set).get("Job").cloned().unwrap();
        let assembler = FieldAssembler::new(&entry);

        assert!(matches!(
            assembler.add_mutation().err(),
            Some(GraphQLError::FieldNameCollision { ref type_name, ref field })
                if type_name == "addJobInput" && field == "clientMutationId"
        ));
    }
}
