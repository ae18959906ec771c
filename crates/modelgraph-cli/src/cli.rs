use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "modelgraph")]
#[command(about = "Generate Relay GraphQL schemas from model descriptors")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to ./modelgraph.toml when present)
    #[arg(short, long, global = true, env = "MODELGRAPH_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the generated schema as SDL
    Sdl(SdlArgs),
    /// Execute a GraphQL request against an in-memory store
    Query(QueryArgs),
}

#[derive(clap::Args)]
pub struct SdlArgs {
    /// Model descriptor file (JSON)
    #[arg(short, long)]
    pub models: PathBuf,
    /// Leave out the Mutation root
    #[arg(long)]
    pub no_mutation: bool,
}

#[derive(clap::Args)]
pub struct QueryArgs {
    /// Model descriptor file (JSON)
    #[arg(short, long)]
    pub models: PathBuf,
    /// Seed data: {"Model": [record, ...], ...}
    #[arg(short, long)]
    pub seed: Option<PathBuf>,
    /// GraphQL request text
    #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
    pub query: Option<String>,
    /// File holding the GraphQL request
    #[arg(short, long)]
    pub file: Option<PathBuf>,
    /// Request variables as a JSON object
    #[arg(long)]
    pub variables: Option<String>,
    /// Leave out the Mutation root
    #[arg(long)]
    pub no_mutation: bool,
}
