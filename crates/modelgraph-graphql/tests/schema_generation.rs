//! Tests for the shape of generated schemas.

use std::sync::Arc;

use modelgraph_db_memory::InMemoryStore;
use modelgraph_graphql::{
    FieldDescriptor, GraphQLError, ModelDescriptor, ModelSchemaBuilder, ModelSet, ModelStores,
    SchemaBuilderConfig,
};
use serde_json::{Value, json};

const MODELS_JSON: &str = r#"{
    "User": {
        "name":     { "instance": "String" },
        "age":      { "instance": "Number" },
        "birthday": { "instance": "Date" },
        "avatar":   { "instance": "Buffer" },
        "mother":   { "instance": "ObjectID", "ref": "User" },
        "friends":  { "instance": "Array", "caster": { "instance": "ObjectID", "ref": "User" } },
        "posts":    { "instance": "Array", "caster": { "instance": "ObjectID", "ref": "Post" } },
        "address":  { "instance": "Object", "caster": { "fields": {
            "city": { "instance": "String" },
            "geo":  { "instance": "Object", "fields": { "lat": { "instance": "Number" } } }
        } } }
    },
    "Post": {
        "title":  { "instance": "String" },
        "author": { "instance": "ObjectID", "ref": "User" }
    }
}"#;

fn stores() -> ModelStores {
    ModelStores::new().with_default(Arc::new(InMemoryStore::new()))
}

fn build(models: ModelSet) -> Result<async_graphql::dynamic::Schema, GraphQLError> {
    ModelSchemaBuilder::new(models, stores(), SchemaBuilderConfig::default()).build()
}

async fn introspect_type(schema: &async_graphql::dynamic::Schema, name: &str) -> Value {
    let query = format!(
        r#"{{ __type(name: "{name}") {{
            name kind
            interfaces {{ name }}
            fields {{ name type {{ kind name ofType {{ kind name ofType {{ name }} }} }} }}
        }} }}"#
    );
    let response = schema.execute(query).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    response.data.into_json().unwrap()["__type"].clone()
}

fn field<'a>(type_info: &'a Value, name: &str) -> &'a Value {
    type_info["fields"]
        .as_array()
        .and_then(|fields| fields.iter().find(|f| f["name"] == json!(name)))
        .unwrap_or_else(|| panic!("field {name} missing"))
}

#[tokio::test]
async fn test_field_type_table() {
    let schema = build(ModelSet::from_json(MODELS_JSON).unwrap()).unwrap();
    let user = introspect_type(&schema, "User").await;

    assert_eq!(user["interfaces"], json!([{"name": "Node"}]));
    assert_eq!(field(&user, "id")["type"]["kind"], json!("NON_NULL"));
    assert_eq!(field(&user, "id")["type"]["ofType"]["name"], json!("ID"));
    assert_eq!(field(&user, "name")["type"]["name"], json!("String"));
    assert_eq!(field(&user, "age")["type"]["name"], json!("Float"));
    assert_eq!(field(&user, "birthday")["type"]["name"], json!("Date"));
    assert_eq!(field(&user, "avatar")["type"]["name"], json!("Generic"));
    assert_eq!(field(&user, "mother")["type"]["name"], json!("User"));
    assert_eq!(field(&user, "friends")["type"]["name"], json!("UserConnection"));
    assert_eq!(field(&user, "posts")["type"]["name"], json!("PostConnection"));
    assert_eq!(field(&user, "address")["type"]["name"], json!("User_Address"));

    let address = introspect_type(&schema, "User_Address").await;
    assert_eq!(field(&address, "geo")["type"]["name"], json!("User_Address_Geo"));
}

#[tokio::test]
async fn test_self_reference_is_one_type() {
    let schema = build(ModelSet::from_json(MODELS_JSON).unwrap()).unwrap();
    let response = schema.execute("{ __schema { types { name } } }").await;
    let data = response.data.into_json().unwrap();

    let user_types = data["__schema"]["types"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|t| t["name"] == json!("User"))
        .count();
    assert_eq!(user_types, 1);

    // The mother field and the root field point at the same named type.
    let user = introspect_type(&schema, "User").await;
    let post = introspect_type(&schema, "Post").await;
    assert_eq!(field(&user, "mother")["type"]["name"], json!("User"));
    assert_eq!(field(&post, "author")["type"]["name"], json!("User"));
}

#[tokio::test]
async fn test_root_and_viewer_fields() {
    let schema = build(ModelSet::from_json(MODELS_JSON).unwrap()).unwrap();

    let query = introspect_type(&schema, "Query").await;
    let names: Vec<_> = query["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "viewer",
            "node",
            "user",
            "users",
            "usersConnection",
            "post",
            "posts",
            "postsConnection"
        ]
    );
    assert_eq!(field(&query, "users")["type"]["kind"], json!("LIST"));
    assert_eq!(field(&query, "users")["type"]["ofType"]["name"], json!("User"));

    let viewer = introspect_type(&schema, "Viewer").await;
    assert_eq!(viewer["interfaces"], json!([{"name": "Node"}]));
    assert_eq!(field(&viewer, "users")["type"]["name"], json!("UserConnection"));
    assert_eq!(field(&viewer, "post")["type"]["name"], json!("Post"));

    let mutation = introspect_type(&schema, "Mutation").await;
    let names: Vec<_> = mutation["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        names,
        vec!["addUser", "updateUser", "deleteUser", "addPost", "updatePost", "deletePost"]
    );
}

#[tokio::test]
async fn test_connection_types() {
    let schema = build(ModelSet::from_json(MODELS_JSON).unwrap()).unwrap();

    let connection = introspect_type(&schema, "UserConnection").await;
    assert_eq!(field(&connection, "count")["type"]["ofType"]["name"], json!("Int"));
    assert_eq!(field(&connection, "pageInfo")["type"]["ofType"]["name"], json!("PageInfo"));
    assert_eq!(field(&connection, "edges")["type"]["ofType"]["name"], json!("UserEdge"));

    let edge = introspect_type(&schema, "UserEdge").await;
    assert_eq!(field(&edge, "cursor")["type"]["ofType"]["name"], json!("String"));
    assert_eq!(field(&edge, "node")["type"]["name"], json!("User"));
}

#[test]
fn test_builds_are_structurally_equivalent() {
    let first = build(ModelSet::from_json(MODELS_JSON).unwrap()).unwrap();
    let second = build(ModelSet::from_json(MODELS_JSON).unwrap()).unwrap();

    assert_eq!(first.sdl(), second.sdl());
}

#[test]
fn test_unknown_reference_fails_build() {
    let models = ModelSet::new(vec![
        ModelDescriptor::new("User").field("pet", FieldDescriptor::reference("Pet")),
    ])
    .unwrap();

    let err = build(models).err().unwrap();
    assert!(matches!(
        err,
        GraphQLError::UnknownReference { ref model, ref field, ref target }
            if model == "User" && field == "pet" && target == "Pet"
    ));
    assert!(err.is_configuration_error());
}

#[test]
fn test_duplicate_model_rejected() {
    let err = ModelSet::new(vec![ModelDescriptor::new("User"), ModelDescriptor::new("User")])
        .err()
        .unwrap();
    assert!(matches!(err, GraphQLError::DuplicateModel(name) if name == "User"));
}

#[test]
fn test_model_named_like_fixed_type_collides() {
    let models = ModelSet::new(vec![ModelDescriptor::new("PageInfo")]).unwrap();
    assert!(matches!(
        build(models),
        Err(GraphQLError::TypeNameCollision(name)) if name == "PageInfo"
    ));
}

#[test]
fn test_id_descriptor_field_is_skipped() {
    let models = ModelSet::new(vec![
        ModelDescriptor::new("User")
            .field("id", FieldDescriptor::string())
            .field("name", FieldDescriptor::string()),
    ])
    .unwrap();

    let sdl = build(models).unwrap().sdl();
    assert!(sdl.contains("type User implements Node"));
    assert!(!sdl.contains("id: String"));
}

fn field_collision(models: Vec<ModelDescriptor>) -> (String, String) {
    match build(ModelSet::new(models).unwrap()) {
        Err(GraphQLError::FieldNameCollision { type_name, field }) => (type_name, field),
        other => panic!("expected a field name collision, got {:?}", other.err()),
    }
}

#[test]
fn test_plural_of_one_model_is_singular_of_another() {
    let collision = field_collision(vec![
        ModelDescriptor::new("User").field("name", FieldDescriptor::string()),
        ModelDescriptor::new("Users").field("name", FieldDescriptor::string()),
    ]);
    assert_eq!(collision.1, "users");
}

#[test]
fn test_models_differing_in_case_collide() {
    let collision = field_collision(vec![ModelDescriptor::new("User"), ModelDescriptor::new("USER")]);
    assert_eq!(collision.1, "user");
}

#[test]
fn test_model_named_like_fixed_root_field_collides() {
    assert_eq!(
        field_collision(vec![ModelDescriptor::new("viewer")]),
        ("Query".to_string(), "viewer".to_string())
    );
    assert_eq!(
        field_collision(vec![ModelDescriptor::new("node")]),
        ("Query".to_string(), "node".to_string())
    );
}

#[test]
fn test_sanitized_field_names_collide() {
    let err = build(
        ModelSet::new(vec![
            ModelDescriptor::new("User")
                .field("first-name", FieldDescriptor::string())
                .field("first_name", FieldDescriptor::string()),
        ])
        .unwrap(),
    )
    .err()
    .unwrap();

    assert!(err.is_configuration_error());
    assert_eq!(err.error_code(), "FIELD_NAME_COLLISION");
}

#[tokio::test]
async fn test_case_variant_nested_fields_get_distinct_types() {
    let models = ModelSet::new(vec![
        ModelDescriptor::new("User")
            .field("address", FieldDescriptor::object([("city", FieldDescriptor::string())]))
            .field("Address", FieldDescriptor::object([("street", FieldDescriptor::string())])),
    ])
    .unwrap();
    let schema = build(models).unwrap();
    let user = introspect_type(&schema, "User").await;

    assert_eq!(field(&user, "address")["type"]["name"], json!("User_Address"));
    assert_eq!(field(&user, "Address")["type"]["name"], json!("User_Address2"));
}

#[tokio::test]
async fn test_filter_named_first_stays_off_connections() {
    let models = ModelSet::new(vec![
        ModelDescriptor::new("Race")
            .field("first", FieldDescriptor::string())
            .field("name", FieldDescriptor::string()),
    ])
    .unwrap();
    let schema = build(models).unwrap();

    let response = schema
        .execute(r#"{ races(first: "Ann") { name } racesConnection(first: 1) { count } }"#)
        .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
}
