//! Audit command: report unenforced dataset expectations.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::read_dataset;

#[derive(Args)]
pub struct AuditArgs {
    /// JSON dataset to check instead of the built-in sample
    #[arg(long)]
    pub dataset: Option<PathBuf>,
}

pub fn execute(args: AuditArgs) -> Result<()> {
    let dataset = read_dataset(args.dataset.as_deref())?;
    let warnings = dataset.audit();

    if warnings.is_empty() {
        println!(
            "{} ({} nodes checked)",
            "Dataset is clean".green().bold(),
            dataset.node_count()
        );
        return Ok(());
    }

    println!("{}", format!("{} warning(s):", warnings.len()).yellow().bold());
    for warning in &warnings {
        println!("  {} {}", "!".yellow(), warning);
    }
    Ok(())
}
