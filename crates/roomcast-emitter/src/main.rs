//! roomcast-emit: publish one event to the subscriber fleet and exit.
//!
//! - Loads `roomcast.yaml` (or `--config PATH` / `ROOMCAST_CONFIG`)
//! - Connects to Redis, emits once, closes
//! - Log level via `RUST_LOG`

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use roomcast_core::error::Result;
use roomcast_emitter::{cli::EmitCommand, config, emitter::Emitter};

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    // Exits with usage on bad arguments.
    let cmd = EmitCommand::parse();

    match run(cmd).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "roomcast-emit failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cmd: EmitCommand) -> Result<()> {
    let cfg = config::load_from_file(&cmd.config_path)?;

    let emitter = Emitter::connect(&cfg).await?;
    tracing::info!(prefix = emitter.prefix(), event = %cmd.event, "roomcast-emit publishing");

    let res = cmd.run(&emitter).await;
    emitter.close().await?;
    res
}
