//! liveblocks-mcp: Liveblocks MCP server on stdio.

use clap::Parser;
use liveblocks_mcp::bootstrap;
use liveblocks_mcp::config::{self, Environment};
use liveblocks_mcp::diagnostics::Diagnostics;
use liveblocks_mcp::error::{Error, Result};
use liveblocks_mcp::server::LiveblocksServer;
use liveblocks_mcp::telemetry::{TelemetryConfig, init_telemetry};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "liveblocks-mcp", version, about = "Liveblocks MCP server over stdio")]
struct Cli {
    /// Environment file to load (defaults to `.env` if present)
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut diagnostics = Diagnostics::stderr();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            diagnostics.fatal(&e);
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(async {
        match tokio::spawn(run(cli)).await {
            Ok(result) => result,
            Err(e) => Err(Error::Other(format!("main task failed: {e}"))),
        }
    });
    // A pending stdin read would otherwise block runtime shutdown.
    runtime.shutdown_background();

    let outcome = bootstrap::finish(result, &mut diagnostics);
    ExitCode::from(outcome.exit_status())
}

async fn run(cli: Cli) -> Result<()> {
    let env_file = config::load_env_file(cli.env_file.as_deref());
    let env = Environment::capture();

    let _guard = init_telemetry(TelemetryConfig::from_environment(&env, "liveblocks-mcp"))?;
    env_file.log();

    let mut diagnostics = Diagnostics::stderr();
    let connection = bootstrap::start(&env, LiveblocksServer::new, &mut diagnostics).await?;

    tokio::select! {
        result = connection.waiting() => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupt received, shutting down");
            Ok(())
        }
    }
}
