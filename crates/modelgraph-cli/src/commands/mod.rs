pub mod query;
pub mod sdl;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use modelgraph_graphql::{GraphQLConfig, ModelSet, SchemaBuilderConfig};

/// Reads and validates a model descriptor file.
fn load_models(path: &Path) -> Result<ModelSet> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read model file: {}", path.display()))?;
    ModelSet::from_json(&content).with_context(|| format!("Invalid model file: {}", path.display()))
}

/// Builder configuration from the config file, with flag overrides applied.
fn builder_config(config: &GraphQLConfig, no_mutation: bool) -> SchemaBuilderConfig {
    let mut builder_config = config.to_schema_builder_config();
    if no_mutation {
        builder_config.mutation = false;
    }
    builder_config
}
