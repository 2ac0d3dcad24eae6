//! # Questsmith Quest Server
//!
//! File: cli/src/commands/serve/mod.rs
//!
//! ## Overview
//!
//! This module provides the HTTP API of questsmith. It exposes quest
//! generation and a status report as JSON endpoints, with configurable:
//! - Port binding (with automatic fallback if port is in use)
//! - Host interface binding
//! - CORS (Cross-Origin Resource Sharing)
//! - Model usage (`--offline` serves from examples only)
//!
//! ## Architecture
//!
//! - `config.rs`: CLI flags layered over the configuration files
//! - `handlers.rs`: Routes, request/response types, shared state
//! - `cleanup.rs`: Removal of echoed JSON from model output
//! - `server_logic.rs`: Listener, middleware and graceful shutdown
//!
//! ## Examples
//!
//! ```bash
//! # Serve on the default 127.0.0.1:8000
//! questsmith serve
//!
//! # Listen on all interfaces, without calling the model
//! questsmith serve --host 0.0.0.0 --port 9000 --offline
//!
//! # Try it
//! curl -X POST localhost:8000/generate -H 'content-type: application/json' \
//!      -d '{"prompt": "dragon"}'
//! ```
//!
use crate::core::error::Result;
use tracing::info;

pub use config::ServeArgs;

pub mod cleanup;
pub mod config;
pub mod handlers;
pub mod server_logic;

/// # Handle Serve Command (`handle_serve`)
///
/// Resolves the effective configuration and runs the server until shutdown.
pub async fn handle_serve(args: ServeArgs) -> Result<()> {
    info!("Handling serve command with args: {:?}", args);

    let options = args.source.options();
    let config = config::load_and_merge_config(args)?;
    info!("Effective server config: {:?}", config);

    server_logic::run_server(config, options).await?;

    Ok(())
}
