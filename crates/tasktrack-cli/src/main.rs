use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tasktrack_core::{AppBuilder, TrackerConfig};

mod script;

use script::{DEMO_SCRIPT, ScriptRunner, parse_script};

/// Drive the task tracker with a JSON script of requests.
///
/// Logs go to stderr (`RUST_LOG`, `TASKTRACK_LOG_FORMAT=json`); one JSON
/// result per step goes to stdout.
#[derive(Parser, Debug)]
#[command(name = "tasktrack", version, about = "Task tracker demo driver")]
struct Cli {
    /// Script to run (default: built-in demo)
    #[arg(long)]
    script: Option<PathBuf>,

    /// Pretty-print each result
    #[arg(long)]
    pretty: bool,

    /// Stop at the first step that does not succeed
    #[arg(long)]
    stop_on_error: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("TASKTRACK_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let source = match &cli.script {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?,
        None => DEMO_SCRIPT.to_string(),
    };
    let steps = parse_script(&source)?;

    let app = AppBuilder::new()
        .config(TrackerConfig::from_env())
        .build()
        .context("invalid configuration")?;
    tracing::info!(steps = steps.len(), "running script");

    let mut runner = ScriptRunner::new(app);
    let mut stdout = std::io::stdout().lock();
    for (index, step) in steps.into_iter().enumerate() {
        let outcome = runner.run_step(index, step).await?;
        let line = if cli.pretty {
            serde_json::to_string_pretty(&outcome)?
        } else {
            serde_json::to_string(&outcome)?
        };
        writeln!(stdout, "{line}")?;

        if cli.stop_on_error && outcome.status >= 400 {
            anyhow::bail!("step {index} ({}) failed with status {}", outcome.op, outcome.status);
        }
    }
    Ok(())
}
