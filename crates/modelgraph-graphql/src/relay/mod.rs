//! Relay protocol support: global ids, cursors and node type lookup.

mod cursor;
mod global_id;

pub use cursor::{CursorData, cursor_to_offset, offset_to_cursor};
pub use global_id::{from_global_id, parse_local_id, to_global_id, to_local_id};

use std::collections::HashSet;

/// Name of the Relay Node interface.
pub const NODE_INTERFACE: &str = "Node";

/// Name and fixed local id of the viewer singleton.
pub const VIEWER_TYPE: &str = "Viewer";
pub const VIEWER_ID: &str = "viewer";

/// What a global id points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTarget {
    /// The viewer singleton.
    Viewer,
    /// A record of a model.
    Record { model: String, id: String },
}

/// Lookup table from global ids to concrete types, built alongside the
/// type map for one schema.
#[derive(Debug, Clone, Default)]
pub struct NodeTable {
    models: HashSet<String>,
}

impl NodeTable {
    pub fn new(models: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            models: models.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolves a global id to the node it identifies.
    ///
    /// Returns `None` for malformed ids and ids of types this schema does
    /// not contain.
    pub fn resolve(&self, global_id: &str) -> Option<NodeTarget> {
        let (type_name, id) = from_global_id(global_id)?;
        if type_name == VIEWER_TYPE {
            return Some(NodeTarget::Viewer);
        }
        self.models
            .contains(&type_name)
            .then(|| NodeTarget::Record { model: type_name, id })
    }

    pub fn contains(&self, model: &str) -> bool {
        self.models.contains(model)
    }
}
