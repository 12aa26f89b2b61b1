//! Derive command: recompute derived relationships on an existing graph.

use anyhow::Result;
use colored::Colorize;

use shopgraph_core::ShopGraphConfig;
use shopgraph_graph::derive_relationships;

use super::{connect, DeriveArgs};
use crate::output;

pub async fn execute(args: DeriveArgs, mut config: ShopGraphConfig) -> Result<()> {
    args.apply(&mut config);
    let client = connect(&config).await?;

    println!("{}", "Deriving relationships...".bold());
    let report = derive_relationships(&client, &config.derive).await?;
    output::print_derive_report(&report, config.derive.weight_mode);
    Ok(())
}
