//! Naming rules for generated fields and types.
//!
//! Every generated name is a pure function of the model (and field) name.
//! Clients hard-code these names, so changing any rule here is a breaking
//! API change.
//!
//! Pluralization is a bare `s` suffix: `Person` becomes `persons`, not
//! `people`.

/// Root/viewer field for fetching one record: `User` -> `user`.
pub fn singular_name(model: &str) -> String {
    model.to_lowercase()
}

/// Root/viewer field for many records: `User` -> `users`.
pub fn plural_name(model: &str) -> String {
    format!("{}s", singular_name(model))
}

/// Root-level connection field: `User` -> `usersConnection`.
pub fn root_connection_name(model: &str) -> String {
    format!("{}Connection", plural_name(model))
}

/// Capitalizes the first character of a string.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

pub fn connection_type_name(model: &str) -> String {
    format!("{model}Connection")
}

pub fn edge_type_name(model: &str) -> String {
    format!("{model}Edge")
}

/// Type name for an inline object field: `User` + `address` -> `User_Address`.
///
/// The underscore keeps nested names out of the namespace of model names
/// (`UserAddress` stays available for a real model).
pub fn nested_type_name(parent: &str, field: &str) -> String {
    format!("{}_{}", parent, capitalize_first(&sanitize_field_name(field)))
}

pub fn add_mutation_name(model: &str) -> String {
    format!("add{}", capitalize_first(model))
}

pub fn update_mutation_name(model: &str) -> String {
    format!("update{}", capitalize_first(model))
}

pub fn delete_mutation_name(model: &str) -> String {
    format!("delete{}", capitalize_first(model))
}

/// Input object for a mutation: `addUser` -> `addUserInput`.
pub fn input_type_name(mutation: &str) -> String {
    format!("{mutation}Input")
}

/// Payload object for a mutation: `addUser` -> `addUserPayload`.
pub fn payload_type_name(mutation: &str) -> String {
    format!("{mutation}Payload")
}

/// Payload field holding the updated node: `User` -> `changedUser`.
pub fn changed_field_name(model: &str) -> String {
    format!("changed{}", capitalize_first(model))
}

/// Payload field holding the created edge: `User` -> `changedUserEdge`.
pub fn changed_edge_field_name(model: &str) -> String {
    format!("changed{}Edge", capitalize_first(model))
}

/// Sanitizes a field name for GraphQL by replacing hyphens with underscores.
pub fn sanitize_field_name(field: &str) -> String {
    field.replace('-', "_")
}

/// Checks if a name is valid for GraphQL.
///
/// GraphQL names must match the pattern `[_a-zA-Z][_a-zA-Z0-9]*`.
pub fn is_valid_graphql_name(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }

    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
