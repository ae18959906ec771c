//! Model descriptors: the declarative input the schema is derived from.
//!
//! Descriptors follow the document-model shape used by schema-based ODMs:
//!
//! ```json
//! {
//!   "User": {
//!     "name":    { "instance": "String" },
//!     "age":     { "instance": "Number" },
//!     "mother":  { "instance": "ObjectID", "ref": "User" },
//!     "friends": { "instance": "Array", "caster": { "instance": "ObjectID", "ref": "User" } },
//!     "address": { "instance": "Object", "caster": { "fields": { "city": { "instance": "String" } } } }
//!   }
//! }
//! ```

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::error::GraphQLError;
use crate::naming::is_valid_graphql_name;

/// Ordered field map; iteration order is schema order.
pub type FieldMap = IndexMap<String, FieldDescriptor>;

/// The data kind of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Date,
    ObjectId,
    /// List whose elements are described by the caster.
    Array(Box<FieldDescriptor>),
    /// Inline object with its own fields.
    Object(FieldMap),
    /// Any instance name this crate does not know. Maps to the generic scalar.
    Other(String),
}

/// Describes one field of a model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawField")]
pub struct FieldDescriptor {
    pub kind: FieldKind,
    /// Name of the model this field points to (ObjectID fields only).
    pub reference: Option<String>,
}

impl FieldDescriptor {
    fn of(kind: FieldKind) -> Self {
        Self {
            kind,
            reference: None,
        }
    }

    pub fn string() -> Self {
        Self::of(FieldKind::String)
    }

    pub fn number() -> Self {
        Self::of(FieldKind::Number)
    }

    pub fn boolean() -> Self {
        Self::of(FieldKind::Boolean)
    }

    pub fn date() -> Self {
        Self::of(FieldKind::Date)
    }

    pub fn object_id() -> Self {
        Self::of(FieldKind::ObjectId)
    }

    /// An ObjectID field pointing at another model.
    pub fn reference(model: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::ObjectId,
            reference: Some(model.into()),
        }
    }

    pub fn array(caster: FieldDescriptor) -> Self {
        Self::of(FieldKind::Array(Box::new(caster)))
    }

    pub fn object(fields: impl IntoIterator<Item = (impl Into<String>, FieldDescriptor)>) -> Self {
        Self::of(FieldKind::Object(
            fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn other(instance: impl Into<String>) -> Self {
        Self::of(FieldKind::Other(instance.into()))
    }

    /// Returns the referenced model if this is a reference field.
    pub fn reference_target(&self) -> Option<&str> {
        match self.kind {
            FieldKind::ObjectId => self.reference.as_deref(),
            _ => None,
        }
    }

    /// Returns the referenced model if this is an array of references.
    pub fn list_reference_target(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Array(caster) => caster.reference_target(),
            _ => None,
        }
    }
}

/// Wire shape of a field descriptor.
#[derive(Debug, Deserialize)]
struct RawField {
    #[serde(default)]
    instance: Option<String>,
    #[serde(default, rename = "ref")]
    reference: Option<String>,
    #[serde(default)]
    caster: Option<Box<RawField>>,
    #[serde(default)]
    fields: Option<FieldMap>,
}

impl From<RawField> for FieldDescriptor {
    fn from(raw: RawField) -> Self {
        let RawField {
            instance,
            reference,
            caster,
            fields,
        } = raw;

        let kind = match instance.as_deref() {
            Some("String") => FieldKind::String,
            Some("Number") => FieldKind::Number,
            Some("Boolean") => FieldKind::Boolean,
            Some("Date") => FieldKind::Date,
            Some("ObjectID") | Some("ObjectId") => FieldKind::ObjectId,
            Some("Array") => {
                let element = caster
                    .map(|c| FieldDescriptor::from(*c))
                    .unwrap_or_else(|| FieldDescriptor::other("Mixed"));
                FieldKind::Array(Box::new(element))
            }
            Some("Object") => {
                let fields = fields
                    .or_else(|| caster.and_then(|c| c.fields))
                    .unwrap_or_default();
                FieldKind::Object(fields)
            }
            Some(other) => FieldKind::Other(other.to_string()),
            None => match fields {
                Some(fields) => FieldKind::Object(fields),
                None => FieldKind::Other("Mixed".to_string()),
            },
        };

        Self { kind, reference }
    }
}

/// One model: a name plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDescriptor {
    pub name: String,
    pub fields: FieldMap,
}

impl ModelDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: FieldMap::new(),
        }
    }

    /// Appends a field, keeping declaration order.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.fields.insert(name.into(), descriptor);
        self
    }
}

/// A validated, ordered set of models with unique, GraphQL-safe names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelSet {
    models: Vec<ModelDescriptor>,
}

impl ModelSet {
    /// Validates and wraps a list of models.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::DuplicateModel` if two models share a name and
    /// `GraphQLError::InvalidName` if a name is not a valid GraphQL name.
    pub fn new(models: Vec<ModelDescriptor>) -> Result<Self, GraphQLError> {
        let mut seen = HashSet::new();
        for model in &models {
            if !is_valid_graphql_name(&model.name) {
                return Err(GraphQLError::InvalidName(model.name.clone()));
            }
            if !seen.insert(model.name.as_str()) {
                return Err(GraphQLError::DuplicateModel(model.name.clone()));
            }
        }

        debug!(count = models.len(), "Validated model set");
        Ok(Self { models })
    }

    /// Parses `{"ModelName": {"field": descriptor, ...}, ...}`.
    ///
    /// JSON objects cannot carry duplicate keys, so duplicate detection only
    /// applies to [`ModelSet::new`].
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::Validation` for malformed JSON and the errors of
    /// [`ModelSet::new`] for invalid names.
    pub fn from_json(json: &str) -> Result<Self, GraphQLError> {
        let raw: IndexMap<String, FieldMap> = serde_json::from_str(json)
            .map_err(|e| GraphQLError::Validation(format!("invalid model descriptors: {e}")))?;

        Self::new(
            raw.into_iter()
                .map(|(name, fields)| ModelDescriptor { name, fields })
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.models.iter()
    }

    pub fn get(&self, name: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.models.iter().map(|m| m.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> FieldDescriptor {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse(r#"{"instance": "String"}"#), FieldDescriptor::string());
        assert_eq!(parse(r#"{"instance": "Number"}"#), FieldDescriptor::number());
        assert_eq!(parse(r#"{"instance": "Boolean"}"#), FieldDescriptor::boolean());
        assert_eq!(parse(r#"{"instance": "Date"}"#), FieldDescriptor::date());
        assert_eq!(parse(r#"{"instance": "ObjectID"}"#), FieldDescriptor::object_id());
    }

    #[test]
    fn test_parse_reference() {
        let field = parse(r#"{"instance": "ObjectID", "ref": "User"}"#);
        assert_eq!(field, FieldDescriptor::reference("User"));
        assert_eq!(field.reference_target(), Some("User"));
    }

    #[test]
    fn test_parse_array_of_references() {
        let field = parse(r#"{"instance": "Array", "caster": {"instance": "ObjectID", "ref": "User"}}"#);
        assert_eq!(field, FieldDescriptor::array(FieldDescriptor::reference("User")));
        assert_eq!(field.list_reference_target(), Some("User"));
        assert_eq!(field.reference_target(), None);
    }

    #[test]
    fn test_parse_array_without_caster() {
        let field = parse(r#"{"instance": "Array"}"#);
        assert_eq!(field, FieldDescriptor::array(FieldDescriptor::other("Mixed")));
    }

    #[test]
    fn test_parse_nested_object() {
        let field = parse(
            r#"{"instance": "Object", "caster": {"fields": {
                "city": {"instance": "String"},
                "geo": {"instance": "Object", "caster": {"fields": {"lat": {"instance": "Number"}}}}
            }}}"#,
        );

        let FieldKind::Object(fields) = &field.kind else {
            panic!("Expected object kind");
        };
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["city", "geo"]);
        assert!(matches!(fields["geo"].kind, FieldKind::Object(_)));
    }

    #[test]
    fn test_parse_unknown_instance() {
        assert_eq!(parse(r#"{"instance": "Buffer"}"#), FieldDescriptor::other("Buffer"));
        assert_eq!(parse(r#"{}"#), FieldDescriptor::other("Mixed"));
    }

    #[test]
    fn test_model_set_rejects_duplicates() {
        let err = ModelSet::new(vec![ModelDescriptor::new("User"), ModelDescriptor::new("User")])
            .unwrap_err();
        assert!(matches!(err, GraphQLError::DuplicateModel(name) if name == "User"));
    }

    #[test]
    fn test_model_set_rejects_invalid_names() {
        let err = ModelSet::new(vec![ModelDescriptor::new("user-profile")]).unwrap_err();
        assert!(matches!(err, GraphQLError::InvalidName(_)));
    }

    #[test]
    fn test_model_set_from_json_keeps_order() {
        let set = ModelSet::from_json(
            r#"{
                "User": {"name": {"instance": "String"}, "age": {"instance": "Number"}},
                "Post": {"title": {"instance": "String"}}
            }"#,
        )
        .unwrap();

        assert_eq!(set.names(), vec!["User", "Post"]);
        let user = set.get("User").unwrap();
        assert_eq!(user.fields.keys().collect::<Vec<_>>(), vec!["name", "age"]);
    }

    #[test]
    fn test_model_set_from_invalid_json() {
        assert!(matches!(
            ModelSet::from_json("[1, 2]"),
            Err(GraphQLError::Validation(_))
        ));
    }
}
