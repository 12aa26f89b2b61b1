//! CLI command definitions and handlers.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use shopgraph_core::{Dataset, EndpointPolicy, ShopGraphConfig, WeightMode};
use shopgraph_graph::GraphClient;

pub mod audit;
pub mod derive;
pub mod script;
pub mod seed;
pub mod status;

/// ShopGraph - seed and derive the e-commerce graph
#[derive(Parser)]
#[command(name = "shopgraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Neo4j connection overrides. Unset flags fall back to the environment and
/// the config file.
#[derive(Args, Debug, Default)]
pub struct ConnectionArgs {
    /// Bolt URI, e.g. bolt://localhost:7687
    #[arg(long, global = true)]
    pub uri: Option<String>,

    #[arg(long, global = true)]
    pub user: Option<String>,

    #[arg(long, global = true)]
    pub password: Option<String>,

    #[arg(long, global = true)]
    pub database: Option<String>,
}

/// Options shared by commands that derive relationships.
#[derive(Args, Debug, Default)]
pub struct DeriveArgs {
    /// How BOUGHT_WITH weights behave on re-runs: accumulate or reset
    #[arg(long)]
    pub weight_mode: Option<WeightMode>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the dataset and derive relationships
    Seed(seed::SeedArgs),

    /// Re-run the relationship derivations against the current graph
    Derive(DeriveArgs),

    /// Render the full load as a Cypher script
    Script(script::ScriptArgs),

    /// Execute a Cypher script statement by statement
    RunScript(script::RunScriptArgs),

    /// Show node and relationship counts
    Status,

    /// Check a dataset for unenforced expectations
    Audit(audit::AuditArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let mut config = ShopGraphConfig::resolve(self.config.as_deref())
            .context("Failed to resolve configuration")?;
        self.connection.apply(&mut config);

        match self.command {
            Commands::Seed(args) => seed::execute(args, config).await,
            Commands::Derive(args) => derive::execute(args, config).await,
            Commands::Script(args) => script::execute_render(args, config),
            Commands::RunScript(args) => script::execute_run(args, &config).await,
            Commands::Status => status::execute(&config).await,
            Commands::Audit(args) => audit::execute(args),
        }
    }
}

impl ConnectionArgs {
    fn apply(&self, config: &mut ShopGraphConfig) {
        if let Some(uri) = &self.uri {
            config.neo4j.uri = uri.clone();
        }
        if let Some(user) = &self.user {
            config.neo4j.user = user.clone();
        }
        if let Some(password) = &self.password {
            config.neo4j.password = password.clone();
        }
        if let Some(database) = &self.database {
            config.neo4j.database = database.clone();
        }
    }
}

impl DeriveArgs {
    pub fn apply(&self, config: &mut ShopGraphConfig) {
        if let Some(mode) = self.weight_mode {
            config.derive.weight_mode = mode;
        }
    }
}

/// Apply a `--missing-endpoints` override.
pub fn apply_policy(policy: Option<EndpointPolicy>, config: &mut ShopGraphConfig) {
    if let Some(policy) = policy {
        config.load.missing_endpoints = policy;
    }
}

/// The dataset at `path`, or the built-in sample.
pub fn read_dataset(path: Option<&Path>) -> Result<Dataset> {
    match path {
        Some(p) => Dataset::from_json_file(p)
            .with_context(|| format!("Failed to read dataset {}", p.display())),
        None => Ok(Dataset::sample()),
    }
}

/// Connect to Neo4j using the resolved configuration.
pub async fn connect(config: &ShopGraphConfig) -> Result<GraphClient> {
    GraphClient::connect(&config.neo4j)
        .await
        .with_context(|| format!("Failed to connect to Neo4j at {}", config.neo4j.uri))
}
