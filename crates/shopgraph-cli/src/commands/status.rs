//! Status command.

use anyhow::Result;
use colored::Colorize;

use shopgraph_core::schema::RelType;
use shopgraph_core::ShopGraphConfig;
use shopgraph_graph::GraphStore;

use super::connect;
use crate::output;

pub async fn execute(config: &ShopGraphConfig) -> Result<()> {
    let client = connect(config).await?;

    println!("{}", "Graph Status".bold());
    println!("{}", "─".repeat(40));
    println!("  Server:        {}", config.neo4j.uri.cyan());

    let counts = client.counts().await?;
    output::print_counts(&counts);

    println!();
    for rel in RelType::ALL {
        let n = client.edges(rel).await?.len();
        let name = format!("{:<14}", rel.as_str());
        let name = if rel.is_derived() {
            name.magenta()
        } else {
            name.normal()
        };
        println!("  {} {}", name, n);
    }
    println!("{}", "─".repeat(40));
    Ok(())
}
