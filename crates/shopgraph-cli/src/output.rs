//! Terminal output formatting.

use anyhow::Result;
use colored::Colorize;

use shopgraph_core::schema::RelType;
use shopgraph_core::WeightMode;
use shopgraph_graph::{DeriveReport, GraphCounts, GraphStore, LoadReport, MemoryGraph};

pub fn print_load_report(report: &LoadReport) {
    println!("\n{}", "Load complete:".green().bold());
    println!("  Nodes created:         {}", report.nodes_created);
    println!("  Relationships created: {}", report.relationships_created);
    if report.relationships_matched > 0 {
        println!("  Relationships matched: {}", report.relationships_matched);
    }
    if !report.skipped.is_empty() {
        println!(
            "  {} {}",
            "Skipped (missing endpoint):".yellow(),
            report.skipped.len()
        );
        for edge in &report.skipped {
            println!("    {} {}", "-".dimmed(), edge);
        }
    }
}

pub fn print_derive_report(report: &DeriveReport, mode: WeightMode) {
    println!("\n{} {}", "Derived relationships".green().bold(), format!("(weights: {})", mode).dimmed());
    println!(
        "  HAS_HISTORY: {} created, {} existing",
        report.history_created, report.history_matched
    );
    if mode == WeightMode::Reset {
        println!("  BOUGHT_WITH: {} removed before recompute", report.bought_with_removed);
    }
    println!("  BOUGHT_WITH: {} product pairs weighted", report.bought_with_pairs);
    println!(
        "  SIMILAR:     {} created, {} existing",
        report.similar_created, report.similar_matched
    );
}

pub fn print_counts(counts: &GraphCounts) {
    println!("  Nodes:         {}", counts.nodes.to_string().cyan());
    println!("  Relationships: {}", counts.relationships.to_string().cyan());
}

/// List the derived product edges of an in-process graph.
pub async fn print_derived_edges(graph: &MemoryGraph) -> Result<()> {
    for rel in [RelType::BoughtWith, RelType::Similar] {
        let edges = graph.edges(rel).await?;
        println!("\n{} ({}):", rel.as_str().bold(), edges.len());
        for edge in &edges {
            let detail = rel
                .property()
                .and_then(|p| edge.properties.get(p))
                .map(|v| format!("{}", v))
                .unwrap_or_default();
            println!(
                "  {} {} {} {}",
                edge.from.to_string().dimmed(),
                "->".dimmed(),
                edge.to,
                detail.yellow()
            );
        }
    }
    Ok(())
}
