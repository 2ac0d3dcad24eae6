//! # Questsmith HTTP Server Implementation
//!
//! File: cli/src/commands/serve/server_logic.rs
//!
//! ## Overview
//!
//! Starts the quest API for `questsmith serve`:
//! - Port availability checking with automatic fallback
//! - CORS and request tracing middleware
//! - Graceful shutdown on Ctrl+C / SIGTERM
//!
//! ## Architecture
//!
//! 1. Build the example store and quest generator once
//! 2. Wrap them with a fresh `ServerContext` in the router state
//! 3. Find an available port if the requested one is in use
//! 4. Serve until a shutdown signal arrives
//!
use super::config::ServerConfig;
use super::handlers::{self, AppState, ServerContext};
use crate::commands::build_generator;
use crate::common::quest::GeneratorOptions;
use crate::core::error::Result;
use anyhow::Context;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

/// # Run HTTP Server (`run_server`)
///
/// Builds the generator, binds the first free port starting at `config.port`
/// (up to 10 attempts), and serves until shutdown.
///
/// ## Errors
///
/// - No available port within the allowed attempts.
/// - Binding the listener fails.
/// - The server itself fails.
pub async fn run_server(config: ServerConfig, options: GeneratorOptions) -> Result<()> {
    let max_port_attempts = 10;
    let addr = find_available_port(config.host, config.port, max_port_attempts).await?;

    let generator = build_generator(&config.settings, options);
    let model_loaded = generator.model_id().is_some();
    let context = ServerContext::new(config.settings.model.model_id.clone(), model_loaded);
    let state = AppState {
        generator: Arc::new(generator),
        context: Arc::new(context),
    };
    let app = create_app(state, config.enable_cors);

    println!("\n=================================================================");
    println!("⚔️  Questsmith {}", handlers::VERSION);
    println!("🌐 Local URL:         http://localhost:{}", addr.port());
    println!("⚙️  Binding to address: {}", addr);
    println!(
        "🧠 Model:             {} ({})",
        config.settings.model.model_id,
        if model_loaded { "enabled" } else { "examples only" }
    );
    println!("📜 Dataset:           {}", config.settings.examples.dataset_path);
    println!("🔒 CORS enabled:      {}", config.enable_cors);
    println!("=================================================================\n");

    info!("Starting quest server on {}", addr);
    println!("Server starting! Press Ctrl+C to stop.");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

/// Resolves when Ctrl+C or (on Unix) SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// # Find Available Port (`find_available_port`)
///
/// Tries `start_port` and the following ports, up to `max_attempts` in total,
/// and returns the first address that can be bound.
async fn find_available_port(
    req_host: std::net::IpAddr,
    start_port: u16,
    max_attempts: u8,
) -> Result<SocketAddr> {
    let mut current_port = start_port;

    for attempt in 0..max_attempts {
        let addr = SocketAddr::new(req_host, current_port);

        match TcpListener::bind(addr).await {
            Ok(listener) => {
                drop(listener);
                if attempt > 0 {
                    info!(
                        "Port {} was unavailable, successfully bound to available port {}.",
                        start_port, current_port
                    );
                }
                return Ok(addr);
            }
            Err(e) => {
                warn!(
                    "Attempt {}: Port {} on host {} is unavailable (Error: {}). Trying next port...",
                    attempt + 1,
                    current_port,
                    req_host,
                    e
                );
                current_port = match current_port.checked_add(1) {
                    Some(next) => next,
                    None => break,
                };
            }
        }
    }

    anyhow::bail!(
        "Could not find an available port on host {} starting from port {} after trying {} ports.",
        req_host,
        start_port,
        max_attempts
    )
}

/// # Create Axum Application (`create_app`)
///
/// The API routes wrapped in request tracing and, when enabled, permissive CORS.
fn create_app(state: AppState, enable_cors: bool) -> Router {
    let cors_layer = if enable_cors {
        info!("CORS middleware enabled (permissive).");
        CorsLayer::permissive()
    } else {
        info!("CORS middleware disabled.");
        CorsLayer::new()
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    handlers::router(state).layer(
        ServiceBuilder::new()
            .layer(trace_layer)
            .layer(cors_layer),
    )
}
