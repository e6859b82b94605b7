//! Cirrus command line interface

use clap::{Parser, Subcommand};
use cirrus_agent::Reconciler;
use cirrus_core::{manifest, Settings, SettingsLoader};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cirrus")]
#[command(version = cirrus_agent::VERSION)]
#[command(about = "Cirrus - ComfyUI volume reconciler and launcher", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (YAML); defaults to .cirrus/config.yaml lookup
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the volume and launch the server
    Up,

    /// Reconcile the volume without launching the server
    Sync,

    /// Show declared model tasks and whether each is satisfied
    Models,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    cirrus_utils::logging::init(cli.verbose);

    let settings = match &cli.config {
        Some(path) => SettingsLoader::load_from_file(path).await?,
        None => SettingsLoader::load_default().await?,
    };

    match cli.command {
        Commands::Up => up(settings).await?,
        Commands::Sync => sync(settings).await?,
        Commands::Models => show_models(settings),
        Commands::Version => show_version(),
    }

    Ok(())
}

async fn up(settings: Settings) -> anyhow::Result<()> {
    let reconciler = Reconciler::new(settings);
    let pid = reconciler.run().await?;

    println!(
        "{} server running with pid {}",
        "Up:".bright_green().bold(),
        pid.to_string().bright_yellow()
    );
    Ok(())
}

async fn sync(settings: Settings) -> anyhow::Result<()> {
    let reconciler = Reconciler::new(settings);
    let report = reconciler.reconcile().await?;

    println!("{}", "Reconciliation complete".bright_green().bold());
    println!("  {} {}", "Fetched:".bright_white(), report.models_fetched.len());
    println!("  {} {}", "Present:".bright_white(), report.models_skipped.len());
    if !report.models_failed.is_empty() {
        println!(
            "  {} {}",
            "Failed:".bright_red(),
            report.models_failed.join(", ")
        );
    }
    Ok(())
}

fn show_models(settings: Settings) {
    let layout = settings.layout();

    println!("{}", "Declared model tasks".bright_cyan().bold());
    println!();

    for task in manifest::model_tasks() {
        let dest = layout.model_path(task);
        let status = if dest.exists() {
            "present".bright_green()
        } else {
            "missing".bright_red()
        };

        println!("  {} {}/{} ({})", status, task.category, task.filename, task.repo);
    }
}

fn show_version() {
    println!();
    println!(
        "  {} {}",
        "Cirrus".bright_cyan().bold(),
        cirrus_agent::VERSION.bright_yellow()
    );
    println!();
    println!("  ComfyUI volume reconciler and launcher");
    println!();
}
