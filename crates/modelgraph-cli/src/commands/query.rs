use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_graphql::{Request, Variables};
use modelgraph_db_memory::InMemoryStore;
use modelgraph_graphql::{GraphQLConfig, ModelSchemaBuilder, ModelStores};
use tracing::debug;

use super::{builder_config, load_models};
use crate::cli::QueryArgs;
use crate::output::{print_json, print_warning};

/// Executes one GraphQL request over a freshly seeded in-memory store.
pub async fn run(args: &QueryArgs, config: &GraphQLConfig) -> Result<()> {
    let models = load_models(&args.models)?;
    let store = match &args.seed {
        Some(path) => load_seed(path)?,
        None => InMemoryStore::new(),
    };
    debug!(models = models.len(), records = store.len(), "Building schema over seeded store");

    let stores = ModelStores::new().with_default(Arc::new(store));
    let schema =
        ModelSchemaBuilder::new(models, stores, builder_config(config, args.no_mutation)).build()?;

    let query = match (&args.query, &args.file) {
        (Some(query), _) => query.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read query file: {}", path.display()))?,
        (None, None) => anyhow::bail!("Either --query or --file is required"),
    };

    let mut request = Request::new(query);
    if let Some(variables) = &args.variables {
        let json: serde_json::Value =
            serde_json::from_str(variables).context("Invalid --variables JSON")?;
        request = request.variables(Variables::from_json(json));
    }

    let response = schema.execute(request).await;
    let error_count = response.errors.len();
    print_json(&serde_json::to_value(&response).context("Failed to serialize response")?);

    if error_count > 0 {
        print_warning(&format!("Request finished with {error_count} error(s)"));
        anyhow::bail!("GraphQL request failed");
    }
    Ok(())
}

fn load_seed(path: &Path) -> Result<InMemoryStore> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file: {}", path.display()))?;
    let seed: serde_json::Value = serde_json::from_str(&content).context("Invalid seed JSON")?;
    InMemoryStore::from_seed(&seed).with_context(|| format!("Invalid seed file: {}", path.display()))
}
