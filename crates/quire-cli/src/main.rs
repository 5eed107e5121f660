//! Quire CLI - drive a notebook kernel from the terminal.

mod colors;
mod input;
mod repl;
mod run;
mod summary;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "quire")]
#[command(about = "Headless notebook kernel for Rhai scripts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a file of JSON actions and print the resulting notebook
    Run {
        /// Path to a JSON-lines action file, or `-` for stdin
        actions: String,

        /// Notebook configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print a per-cell summary instead of the notebook JSON
        #[arg(long)]
        summary: bool,

        /// Pretty-print the notebook JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Read actions interactively from stdin
    Repl {
        /// Notebook configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Helper to format quire-core errors with recovery hints
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(quire_err) = err.downcast_ref::<quire_core::Error>() {
            anyhow::anyhow!("{}", quire_err.with_hint())
        } else {
            err
        }
    };

    match cli.command {
        Commands::Run {
            actions,
            config,
            summary,
            pretty,
        } => {
            let output = if summary {
                run::Output::Summary
            } else if pretty {
                run::Output::PrettyJson
            } else {
                run::Output::Json
            };
            run::execute(&actions, config.as_deref(), output).map_err(format_error)?;
        }

        Commands::Repl { config } => {
            repl::execute(config.as_deref()).map_err(format_error)?;
        }
    }

    Ok(())
}

/// Build a kernel from an optional configuration file.
pub(crate) fn load_kernel(config: Option<&std::path::Path>) -> anyhow::Result<quire_core::Kernel> {
    let config = match config {
        Some(path) => quire_core::NotebookConfig::from_file(path)?,
        None => quire_core::NotebookConfig::default(),
    };
    Ok(quire_core::Kernel::new(config)?)
}
