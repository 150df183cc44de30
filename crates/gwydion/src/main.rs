//! Gwydion - Google Calendar scheduling and AI content generation service.
//!
//! Main entry point for the Gwydion CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{config, serve};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Gwydion - Google Calendar scheduling and AI content generation service
#[derive(Parser)]
#[command(name = "gwydion")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the Gwydion API server
    Serve(serve::ServeArgs),

    /// Configuration management
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Tracing goes to the console and to a rotating JSON file
    let filter = if cli.verbose {
        "gwydion=debug,gwydion_server=debug,gwydion_oauth=debug,gwydion_calendar=debug,\
         gwydion_llm=debug,gwydion_content=debug,gwydion_config=debug,info"
    } else {
        "gwydion=info,gwydion_server=info,gwydion_oauth=info,gwydion_calendar=info,\
         gwydion_llm=info,warn"
    };

    let log_dir = gwydion_config::xdg_config_dir()
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "gwydion.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "gwydion=trace,gwydion_server=trace,gwydion_oauth=trace,\
                     gwydion_calendar=trace,gwydion_llm=trace,gwydion_content=trace,\
                     gwydion_config=trace,info",
                )),
        )
        .init();

    let ctx = commands::Context {
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Serve(args) => serve::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}
