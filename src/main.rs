mod capabilities;
mod pipeline;

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use firesight_core::config::AppConfig;
use firesight_core::state::StateRecord;
use firesight_graph::Executor;

#[derive(Parser)]
#[command(name = "firesight", version, about = "Firefighter support pipeline runner")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "firesight.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline against a sensor-snapshot JSON file
    Run {
        /// Path to the snapshot JSON (raw_sensor_data / raw_vision_data fields)
        #[arg(short, long)]
        input: PathBuf,

        /// Override the step limit
        #[arg(long)]
        max_steps: Option<usize>,
    },
    /// Show the parsed configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = if cli.config.exists() {
        AppConfig::load(&cli.config)?
    } else {
        info!(config = %cli.config.display(), "Config file not found, using defaults");
        AppConfig::default()
    };

    match cli.command {
        Commands::Run { input, max_steps } => run(config, &input, max_steps).await,
        Commands::Config => {
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

async fn run(config: AppConfig, input: &PathBuf, max_steps: Option<usize>) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("reading snapshot {}", input.display()))?;
    let fields: HashMap<String, serde_json::Value> =
        serde_json::from_str(&raw).context("parsing snapshot JSON")?;
    let initial_state = StateRecord::from_map(fields);

    let graph = pipeline::build_graph(&config)?;

    let mut executor = Executor::new(graph);
    if let Some(limit) = max_steps.or(config.engine.max_steps) {
        executor = executor.with_max_steps(limit);
    }

    let report = executor.run(initial_state).await?;

    for step in &report.trace {
        println!("{:<24} {:>6} ms", step.node, step.elapsed_ms);
    }
    println!("{}", serde_json::to_string_pretty(report.state.data())?);

    match &report.outcome {
        firesight_graph::Outcome::Completed => Ok(()),
        firesight_graph::Outcome::Failed(reason) => {
            anyhow::bail!("pipeline failed: {reason}")
        }
    }
}
