use anyhow::Context;
use api_client::TiingoClient;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use configuration::{Config, init_logging, load_config};
use engine::Engine;
use std::path::PathBuf;
use std::sync::Arc;

mod report;

/// The main entry point for the MarketScope report generator.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    // Keep the guard alive so the file writer flushes on exit.
    let _log_guard = init_logging(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Report(args) => handle_report(args, config).await,
        Commands::Metrics(args) => handle_metrics(args, config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// End-of-day market overview: per-instrument trend metrics and cross-market views.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute every configured instrument and print the full market overview.
    Report(ReportArgs),
    /// Compute and print the metric record of a single symbol.
    Metrics(MetricsArgs),
}

#[derive(Args)]
struct ReportArgs {
    /// The reporting date (format: YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Print the snapshot as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct MetricsArgs {
    /// The symbol to compute (e.g., "SPY").
    #[arg(long)]
    symbol: String,

    /// The reporting date (format: YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Print the record as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn build_engine(config: Config, show_progress: bool) -> anyhow::Result<Engine> {
    let source = TiingoClient::new(&config.provider)?;
    let engine = Engine::new(Arc::new(source), config.scan, config.universe);
    if show_progress {
        Ok(engine.with_progress_bar()?)
    } else {
        Ok(engine)
    }
}

async fn handle_report(args: ReportArgs, config: Config) -> anyhow::Result<()> {
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let engine = build_engine(config, !args.json)?;
    tracing::info!(%as_of, json = args.json, "Generating market report");

    let snapshot = engine
        .run_cycle(as_of)
        .await
        .with_context(|| format!("Market cycle for {} failed", as_of))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", report::render(&snapshot));
    }
    Ok(())
}

async fn handle_metrics(args: MetricsArgs, config: Config) -> anyhow::Result<()> {
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let engine = build_engine(config, false)?;

    let record = engine
        .metrics_for(&args.symbol, as_of)
        .await
        .with_context(|| format!("Could not compute metrics for {}", args.symbol))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print!("{}", report::render_record(&record));
    }
    Ok(())
}
