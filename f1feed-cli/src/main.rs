//! f1feed CLI — fetch, list and inspect the configured endpoints.
//!
//! Commands:
//! - `fetch` — fetch every endpoint, print a summary, optionally write a JSON snapshot
//! - `list` — print each handler's name, kind and resolved URL
//! - `get` — fetch one endpoint and print its payload

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use f1feed_core::config::{DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILE};
use f1feed_core::{FetchMode, FetchSummary, Pipeline, PipelineSettings, ResponseEnvelope};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "f1feed", about = "f1feed — configuration-driven F1 data fetcher")]
struct Cli {
    /// Directory holding the configuration document.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_DIR)]
    config_dir: PathBuf,

    /// Configuration file name (`.toml` is read as TOML, anything else as YAML).
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config_file: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every configured endpoint.
    Fetch {
        /// Fetch endpoints concurrently.
        #[arg(long, default_value_t = false)]
        parallel: bool,

        /// Write the fetch summary as JSON to this path.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List the endpoint handlers built from the configuration.
    List,
    /// Fetch a single endpoint and print its payload.
    Get {
        /// Endpoint name (e.g. driver, lap).
        name: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "f1feed=info,f1feed_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = PipelineSettings::new(cli.config_dir, cli.config_file);

    match cli.command {
        Commands::Fetch { parallel, output } => run_fetch(settings, parallel, output.as_deref()),
        Commands::List => run_list(settings),
        Commands::Get { name } => run_get(settings, &name),
    }
}

fn run_fetch(settings: PipelineSettings, parallel: bool, output: Option<&Path>) -> Result<()> {
    let mode = if parallel {
        FetchMode::Parallel
    } else {
        FetchMode::Sequential
    };
    let mut pipeline = Pipeline::new(settings).with_mode(mode);

    if let Err(e) = pipeline.initialize() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let summary = pipeline.fetch_all();
    print_summary(&summary);

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
        println!("Snapshot saved to: {}", path.display());
    }

    Ok(())
}

fn run_list(settings: PipelineSettings) -> Result<()> {
    let mut pipeline = Pipeline::new(settings);
    pipeline.initialize()?;

    let Some(registry) = pipeline.registry() else {
        bail!("pipeline has no registry after initialization");
    };

    println!("{:<20} {:<24} URL", "Endpoint", "Kind");
    println!("{}", "-".repeat(80));
    for handler in registry.handlers() {
        println!(
            "{:<20} {:<24} {}",
            handler.name(),
            handler.kind().to_string(),
            handler.url()
        );
    }

    if !registry.rejected().is_empty() {
        println!();
        println!("Rejected entries:");
        for entry in registry.rejected() {
            println!("  {}.{}: {}", entry.section, entry.name, entry.error);
        }
    }

    Ok(())
}

fn run_get(settings: PipelineSettings, name: &str) -> Result<()> {
    let mut pipeline = Pipeline::new(settings);
    pipeline.initialize()?;

    let Some(handler) = pipeline.get_handler(name) else {
        let known: Vec<&str> = pipeline
            .registry()
            .map(|r| r.names().collect())
            .unwrap_or_default();
        bail!("unknown endpoint '{name}'. Valid: {}", known.join(", "));
    };

    match handler.fetch() {
        ResponseEnvelope::Success { payload } => {
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(())
        }
        ResponseEnvelope::Failed { cause } => {
            bail!("fetching '{name}' from {} failed: {cause}", handler.url())
        }
    }
}

fn print_summary(summary: &FetchSummary) {
    println!("=== Fetch Summary ===");
    println!("Fetched at: {}", summary.fetched_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Endpoints:  {}", summary.total);
    println!("Succeeded:  {}", summary.succeeded);
    println!("Failed:     {}", summary.failed);

    if !summary.failures.is_empty() {
        println!();
        for failure in &summary.failures {
            println!("  {:<20} {} ({})", failure.name, failure.cause, failure.url);
        }
    }
}
