//! # codeprep
//!
//! Thin entrypoint for the `codeprep` command-line interface. All logic lives
//! in the `codeprep_cli` library crate.

use anyhow::Result;
use clap::Parser;
use codeprep_cli::{run, Cli};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // stdout is reserved for per-file progress lines.
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive("codeprep=info".parse()?))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("[codeprep error] Failed to execute command: {e:?}");
        std::process::exit(1);
    }

    Ok(())
}
