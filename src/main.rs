use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use dock_plugin_host::config::HostConfig;
use dock_plugin_host::scenario::{Scenario, ScenarioRunner};

/// Replay dock plugin scenarios against the plugin host
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario file (YAML) to replay
    scenario: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so the report on stdout stays clean
    let log_level = if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set global default subscriber")?;

    let config = if let Some(config_path) = args.config {
        HostConfig::load_from_file(&config_path)?
    } else {
        HostConfig::load_default()?
    };

    let scenario = Scenario::load_from_file(&args.scenario)
        .with_context(|| format!("Failed to load {}", args.scenario.display()))?;

    let runner = ScenarioRunner::new(&scenario, &config);
    runner.run(&scenario.steps);

    println!("{}", runner.report());
    Ok(())
}
