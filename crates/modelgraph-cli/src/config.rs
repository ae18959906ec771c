use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use modelgraph_graphql::GraphQLConfig;
use tracing::debug;

const DEFAULT_CONFIG_FILE: &str = "modelgraph.toml";

/// Loads the `[graphql]` configuration.
///
/// An explicit path must exist. Without one, `./modelgraph.toml` is used when
/// present and the defaults otherwise.
pub fn load(explicit: Option<&Path>) -> Result<GraphQLConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                debug!("No config file, using defaults");
                return Ok(GraphQLConfig::default());
            }
            default
        }
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = GraphQLConfig::from_toml_str(&content).map_err(|e| anyhow!(e))?;
    config.validate().map_err(|e| anyhow!(e))?;

    debug!(path = %path.display(), "Loaded config");
    Ok(config)
}
