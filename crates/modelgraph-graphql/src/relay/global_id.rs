//! Relay global object identification.
//!
//! A global id is standard base64 of `"<TypeName>:<localId>"`. The encoding
//! is stable across schema builds, so clients may persist these ids.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::GraphQLError;

/// Encodes a global id.
pub fn to_global_id(type_name: &str, local_id: &str) -> String {
    STANDARD.encode(format!("{type_name}:{local_id}"))
}

/// Decodes a global id into `(type_name, local_id)`.
///
/// Returns `None` for anything that is not a well-formed global id.
pub fn from_global_id(global_id: &str) -> Option<(String, String)> {
    let bytes = STANDARD.decode(global_id).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    let (type_name, local_id) = decoded.split_once(':')?;
    if type_name.is_empty() || local_id.is_empty() {
        return None;
    }
    Some((type_name.to_string(), local_id.to_string()))
}

/// Resolves an id argument for a field that belongs to `type_name`.
///
/// Accepts either a global id of that type or a raw local id; anything that
/// does not decode to a global id of `type_name` is taken as a local id.
pub fn to_local_id(type_name: &str, id: &str) -> String {
    match from_global_id(id) {
        Some((decoded_type, local_id)) if decoded_type == type_name => local_id,
        _ => id.to_string(),
    }
}

/// Like [`to_local_id`], for arguments that must name one record.
///
/// # Errors
///
/// Returns `GraphQLError::InvalidId` for a blank id.
pub fn parse_local_id(type_name: &str, id: &str) -> Result<String, GraphQLError> {
    let local_id = to_local_id(type_name, id);
    if local_id.trim().is_empty() {
        return Err(GraphQLError::InvalidId(format!(
            "'{id}' does not identify a {type_name}"
        )));
    }
    Ok(local_id)
}
