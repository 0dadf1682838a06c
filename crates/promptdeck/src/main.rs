// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Promptdeck - a gallery of prompt cards and their image pairs.
//!
//! This is the binary entry point for the gallery service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod check;
mod export;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use promptdeck_config::PromptdeckConfig;
use promptdeck_export::ExportFormat;

/// Promptdeck - a gallery of prompt cards and their image pairs.
#[derive(Parser, Debug)]
#[command(name = "promptdeck", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway.
    Serve,
    /// Validate configuration and report storage health.
    Check {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Export cards by id.
    Export {
        /// Comma-separated card ids.
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<String>,
        /// json, csv or text.
        #[arg(long, default_value = "json")]
        format: ExportFormat,
        /// Write to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> PromptdeckConfig {
    let loaded = match path {
        Some(path) => promptdeck_config::load_and_validate_path(path),
        None => promptdeck_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            promptdeck_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

/// Log to stderr so `export` can write to stdout.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("promptdeck={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("promptdeck: use --help for available commands");
        return;
    };

    let config = load_config(cli.config.as_ref());
    init_tracing(&config.app.log_level);

    let result = match command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Check { plain } => check::run_check(&config, plain).await,
        Commands::Export { ids, format, out } => {
            export::run_export(&config, &ids, format, out.as_deref()).await
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
