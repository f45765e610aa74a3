use std::{fs::File, io, path::PathBuf};

use clap::Parser;
use planner::{SessionConfig, script::{ReplayScript, replay}};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "planner=debug,replay=info";

/// Replays a scripted sequence of map interactions and prints what the
/// planner asked of the map and the routing engine.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON script of UI events; reads stdin when omitted
    script: Option<PathBuf>,

    /// Session config JSON (falls back to PLANNER_CONFIG and defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print the report
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SessionConfig::from_file(path)?,
        None => SessionConfig::from_env()?,
    };

    let script: ReplayScript = match &args.script {
        Some(path) => serde_json::from_reader(File::open(path)?)?,
        None => serde_json::from_reader(io::stdin().lock())?,
    };
    tracing::info!("replaying {} events", script.events.len());

    let report = replay(script, &config).await;

    let stdout = io::stdout().lock();
    if args.pretty {
        serde_json::to_writer_pretty(stdout, &report)?;
    } else {
        serde_json::to_writer(stdout, &report)?;
    }
    println!();
    Ok(())
}
