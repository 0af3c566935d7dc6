use anyhow::{Context, Result};
use clap::Parser;
use element_dev::cli::{validate_root, Cli};
use element_dev::{app, display};
use element_dev_core::Error;
use std::process::ExitCode;
use std::time::Duration;

/// How long abandoned loading steps may hold up exit
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

fn main() -> Result<ExitCode> {
    // Logs go to stderr so the prompts stay readable
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let root = match validate_root(&cli.target()) {
        Ok(root) => root,
        Err(Error::InvalidRoot(message)) => {
            eprintln!("❌ Error: {message}");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => {
            eprintln!("❌ Error: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    display::clear_terminal();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    let result = runtime.block_on(app::run(root));
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}
