//! Script commands: render the load as Cypher, or execute a Cypher file.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use shopgraph_core::ShopGraphConfig;
use shopgraph_graph::{cypher, run_script};

use super::{connect, read_dataset, DeriveArgs};

#[derive(Args)]
pub struct ScriptArgs {
    /// JSON dataset to render instead of the built-in sample
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Write the script here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub derive: DeriveArgs,
}

#[derive(Args)]
pub struct RunScriptArgs {
    /// Path to a .cypher file
    pub file: PathBuf,
}

pub fn execute_render(args: ScriptArgs, mut config: ShopGraphConfig) -> Result<()> {
    args.derive.apply(&mut config);
    let dataset = read_dataset(args.dataset.as_deref())?;
    let script = cypher::render_script(&dataset, config.derive.weight_mode);

    match args.output {
        Some(path) => {
            std::fs::write(&path, &script)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("{} {}", "Script written to".green(), path.display());
        }
        None => print!("{}", script),
    }
    Ok(())
}

pub async fn execute_run(args: RunScriptArgs, config: &ShopGraphConfig) -> Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let client = connect(config).await?;

    println!("{} {}", "Running".bold(), args.file.display().to_string().cyan());
    let report = run_script(&client, &text).await;

    println!(
        "  {} of {} statements succeeded",
        report.succeeded().to_string().green(),
        report.outcomes.len()
    );
    let failed: Vec<_> = report.failed().collect();
    for outcome in &failed {
        println!(
            "  {} {} {}",
            format!("#{}", outcome.index).red(),
            outcome.preview.dimmed(),
            outcome.error.as_deref().unwrap_or_default()
        );
    }

    if !failed.is_empty() {
        bail!("{} statement(s) failed", failed.len());
    }
    Ok(())
}
