//! Seed command: load the dataset, then derive relationships.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use shopgraph_core::{EndpointPolicy, ShopGraphConfig};
use shopgraph_graph::{derive_relationships, load_dataset, GraphStore, MemoryGraph};

use super::{apply_policy, connect, read_dataset, DeriveArgs};
use crate::output;

#[derive(Args)]
pub struct SeedArgs {
    /// JSON dataset to load instead of the built-in sample
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Run against an in-process graph instead of Neo4j
    #[arg(long)]
    pub memory: bool,

    /// Remove all existing nodes and relationships first
    #[arg(long)]
    pub fresh: bool,

    /// Load base data only
    #[arg(long)]
    pub no_derive: bool,

    /// What to do when an edge names a missing node: reject or skip
    #[arg(long)]
    pub missing_endpoints: Option<EndpointPolicy>,

    #[command(flatten)]
    pub derive: DeriveArgs,
}

pub async fn execute(args: SeedArgs, mut config: ShopGraphConfig) -> Result<()> {
    apply_policy(args.missing_endpoints, &mut config);
    args.derive.apply(&mut config);
    let dataset = read_dataset(args.dataset.as_deref())?;

    if args.memory {
        let graph = MemoryGraph::new();
        run(&graph, &args, &config, &dataset).await?;
        output::print_derived_edges(&graph).await?;
        Ok(())
    } else {
        let client = connect(&config).await?;
        run(&client, &args, &config, &dataset).await
    }
}

async fn run<S>(
    store: &S,
    args: &SeedArgs,
    config: &ShopGraphConfig,
    dataset: &shopgraph_core::Dataset,
) -> Result<()>
where
    S: GraphStore + ?Sized,
{
    println!("{}", "Seeding graph...".bold());

    for warning in dataset.audit() {
        tracing::warn!(%warning, "Dataset audit");
    }

    if args.fresh {
        store.clear().await.context("Failed to clear graph")?;
        println!("  {}", "Existing graph cleared".dimmed());
    }

    let load = match load_dataset(store, dataset, &config.load).await {
        Ok(report) => report,
        Err(e) => {
            println!(
                "{} {}",
                "Load aborted.".red().bold(),
                "The graph is partially loaded; re-run with --fresh.".yellow()
            );
            return Err(e.into());
        }
    };
    output::print_load_report(&load);

    if !args.no_derive {
        let derived = derive_relationships(store, &config.derive).await?;
        output::print_derive_report(&derived, config.derive.weight_mode);
    }

    let counts = store.counts().await?;
    output::print_counts(&counts);
    Ok(())
}
