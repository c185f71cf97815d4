//! arrayflow - Main Entry Point
//!
//! Starts an engine from the configured locality layout and evaluates a small
//! demonstration graph, or lists the registered primitive patterns.
//!
//! Usage: `arrayflow [--config <path>] [--patterns]` (see `--help`)

use anyhow::Context;
use arrayflow::{config::EngineConfig, Engine, LocalityId, LoggingConfig, Value};
use clap::Parser;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "arrayflow")]
#[command(about = "Evaluate array-language primitive graphs")]
struct Cli {
    /// Engine configuration file (.toml or .json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// List the registered primitive patterns and exit
    #[arg(long)]
    patterns: bool,
}

/// Install the global subscriber. The returned guard flushes the log file on drop.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    match &config.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, &config.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
            None
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => EngineConfig::load_or_default_location(),
    };

    let _guard = init_logging(&config.logging);
    tracing::info!("Starting arrayflow");

    let engine = Engine::new(config).context("Failed to start engine")?;

    if cli.patterns {
        for pattern in engine.registry().iter() {
            println!("{:<16} {}", pattern.name, pattern.signatures.join(" | "));
        }
        return Ok(());
    }

    // greater_equal(sum([1, 2, 3]), 5)
    let last = LocalityId((engine.pool().len() - 1) as u32);
    let sum = engine.create("sum", last, vec![Value::from(vec![1.0, 2.0, 3.0])])?;
    let root = engine.create("__ge", LocalityId::HERE, vec![sum.into(), Value::Int(5)])?;
    let result = engine.evaluate(&root, vec![])?;
    println!("greater_equal(sum([1, 2, 3]), 5) = {}", result);

    tracing::info!("Shutting down...");
    Ok(())
}
