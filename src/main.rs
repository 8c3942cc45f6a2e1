mod app;
mod cli;
mod content;
mod error;
mod model;
mod preferences;
mod transform;
#[cfg(feature = "tui")]
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Text mode logs to stderr. The TUI owns the terminal, so it only logs when
/// given a file to write to.
fn init_tracing(args: &cli::Cli) -> Result<()> {
    let interactive = !args.text && cfg!(feature = "tui");

    if let Some(path) = args.log_file.as_deref() {
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file {}", path.display()))?;
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("text_liner=info"));
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init();
    } else if !interactive {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("text_liner=warn"));
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let is_text = args.text;
    init_tracing(&args)?;

    match cli::run(args) {
        Ok(()) => Ok(()),
        Err(e) if is_text => {
            eprintln!("text-liner: {e:#}");
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("{e:#}");
            Err(e)
        }
    }
}
