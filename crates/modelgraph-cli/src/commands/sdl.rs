use std::sync::Arc;

use anyhow::Result;
use modelgraph_db_memory::InMemoryStore;
use modelgraph_graphql::{GraphQLConfig, ModelSchemaBuilder, ModelStores};
use tracing::debug;

use super::{builder_config, load_models};
use crate::cli::SdlArgs;

/// Prints the schema generated for a model file.
pub fn run(args: &SdlArgs, config: &GraphQLConfig) -> Result<()> {
    let models = load_models(&args.models)?;
    debug!(models = models.len(), "Generating SDL");

    // Printing SDL never touches data; an empty store satisfies the builder.
    let stores = ModelStores::new().with_default(Arc::new(InMemoryStore::new()));
    let schema =
        ModelSchemaBuilder::new(models, stores, builder_config(config, args.no_mutation)).build()?;

    print!("{}", schema.sdl());
    Ok(())
}
