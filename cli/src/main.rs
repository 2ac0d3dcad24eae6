//! # Questsmith Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point for the questsmith binary. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Examples
//!
//! ```bash
//! # Run the quest API
//! questsmith serve --port 8000
//!
//! # Generate quests in the terminal, with info-level logs
//! questsmith -v generate dragon forest
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level (`RUST_LOG` wins if set)
//! 3. Route to the command handler
//! 4. Report any error on stderr and exit with status 1
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command handlers (serve, generate).
mod common; // Quest generation and system probes.
mod core; // Errors, configuration, templating.

#[derive(Parser, Debug)]
#[command(
    name = "questsmith",
    about = "⚔️ Questsmith: fantasy quests from a keyword",
    long_about = "Turns a short keyword prompt into a fantasy quest using a hosted language model,\n\
                  falling back to stored examples when the model is unavailable.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Run the quest HTTP API.
    #[command(alias = "s")]
    Serve(commands::serve::ServeArgs),
    /// Generate quests for prompts given on the command line.
    #[command(alias = "g")]
    Generate(commands::generate::GenerateArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Serve(args) => commands::serve::handle_serve(args).await,
        Commands::Generate(args) => commands::generate::handle_generate(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

