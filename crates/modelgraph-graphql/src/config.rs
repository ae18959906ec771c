//! GraphQL configuration.
//!
//! Configuration can be specified in `modelgraph.toml` under the `[graphql]`
//! section.
//!
//! # Example Configuration
//!
//! ```toml
//! [graphql]
//! mutation = true
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! ```

use serde::{Deserialize, Serialize};

use crate::schema::SchemaBuilderConfig;

/// GraphQL schema configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLConfig {
    /// Generate the Mutation root (add/update/delete per model).
    /// Default: true
    #[serde(default = "default_mutation")]
    pub mutation: bool,

    /// Maximum query depth allowed.
    /// Self-referencing models make unbounded nesting possible.
    /// Default: 15
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum query complexity allowed.
    /// Default: 500
    #[serde(default = "default_max_complexity")]
    pub max_complexity: usize,

    /// Enable GraphQL introspection queries.
    /// Default: true
    #[serde(default = "default_introspection")]
    pub introspection: bool,
}

fn default_mutation() -> bool {
    true
}

fn default_max_depth() -> usize {
    15
}

fn default_max_complexity() -> usize {
    500
}

fn default_introspection() -> bool {
    true
}

impl Default for GraphQLConfig {
    fn default() -> Self {
        Self {
            mutation: default_mutation(),
            max_depth: default_max_depth(),
            max_complexity: default_max_complexity(),
            introspection: default_introspection(),
        }
    }
}

impl GraphQLConfig {
    /// Parses a `[graphql]` table out of a TOML document.
    ///
    /// A document without the table yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML or the table has
    /// the wrong shape.
    pub fn from_toml_str(document: &str) -> Result<Self, String> {
        #[derive(Deserialize)]
        struct Document {
            #[serde(default)]
            graphql: GraphQLConfig,
        }

        let document: Document =
            toml::from_str(document).map_err(|e| format!("invalid graphql config: {e}"))?;
        Ok(document.graphql)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values are invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_depth == 0 {
            return Err("graphql.max_depth must be > 0".into());
        }
        if self.max_complexity == 0 {
            return Err("graphql.max_complexity must be > 0".into());
        }
        Ok(())
    }

    /// Converts this config to a SchemaBuilderConfig.
    #[must_use]
    pub fn to_schema_builder_config(&self) -> SchemaBuilderConfig {
        SchemaBuilderConfig {
            mutation: self.mutation,
            max_depth: self.max_depth,
            max_complexity: self.max_complexity,
            introspection_enabled: self.introspection,
        }
    }
}
