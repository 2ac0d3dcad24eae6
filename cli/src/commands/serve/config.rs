//! # Questsmith Server Configuration
//!
//! File: cli/src/commands/serve/config.rs
//!
//! ## Overview
//!
//! Builds the effective settings for `questsmith serve` by layering the
//! command-line flags over the loaded configuration (`core::config`):
//! 1. Command-line arguments (highest priority)
//! 2. Project `.questsmith.toml`, then user `config.toml`
//! 3. Default values (lowest priority)
//!
//! ## Examples
//!
//! ```bash
//! questsmith serve --host 0.0.0.0 --port 9000 --offline
//! ```
//!
//! ```rust
//! let config = load_and_merge_config(args)?;
//! println!("Listening on: {}:{}", config.host, config.port);
//! ```
//!
use crate::commands::QuestSourceArgs;
use crate::core::config::{self, Config};
use crate::core::error::Result;
use clap::Parser;
use std::net::{IpAddr, Ipv4Addr};
use tracing::{debug, warn};

/// # Server Command Arguments (`ServeArgs`)
///
/// Flags left unset fall back to the configuration files, then to defaults
/// (`127.0.0.1:8000`, CORS enabled).
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Network port to listen on. If busy, the next ports are tried.
    #[arg(long, short)]
    pub port: Option<u16>,

    /// IP address to bind. Use `0.0.0.0` to listen on all interfaces.
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Do not send CORS headers.
    #[arg(long)]
    pub no_cors: bool,

    #[command(flatten)]
    pub source: QuestSourceArgs,
}

/// # Effective Server Configuration (`ServerConfig`)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub enable_cors: bool,
    /// Loaded configuration with command-line overrides applied.
    pub settings: Config,
}

/// Loads configuration files and applies `args` on top.
pub fn load_and_merge_config(args: ServeArgs) -> Result<ServerConfig> {
    let settings = config::load_config()?;
    merge_args(args, settings)
}

fn merge_args(args: ServeArgs, mut settings: Config) -> Result<ServerConfig> {
    args.source.apply_to(&mut settings);

    let host = match args.host {
        Some(host) => host,
        None => settings.server.host.parse().unwrap_or_else(|e| {
            warn!(
                "Invalid host IP '{}' in config file ({}), using 127.0.0.1",
                settings.server.host, e
            );
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }),
    };
    let port = args.port.unwrap_or(settings.server.port);
    let enable_cors = !args.no_cors && settings.server.enable_cors;

    config::validate_config(&settings)?;
    debug!("Server settings resolved: {}:{} (CORS: {})", host, port, enable_cors);

    Ok(ServerConfig {
        host,
        port,
        enable_cors,
        settings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults_from_config() {
        let config = merge_args(ServeArgs::default(), Config::default()).unwrap();
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.port, 8000);
        assert!(config.enable_cors);
        assert!(config.settings.model.enabled);
    }

    #[test]
    fn test_args_override_config() {
        let mut settings = Config::default();
        settings.server.port = 9100;
        settings.server.host = "0.0.0.0".into();

        let args = ServeArgs {
            port: Some(9200),
            no_cors: true,
            source: QuestSourceArgs {
                offline: true,
                dataset: Some(PathBuf::from("/tmp/quests.jsonl")),
                seed: None,
            },
            ..Default::default()
        };
        let config = merge_args(args, settings).unwrap();
        assert_eq!(config.port, 9200);
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED)); // From config
        assert!(!config.enable_cors);
        assert!(!config.settings.model.enabled);
        assert_eq!(config.settings.examples.dataset_path, "/tmp/quests.jsonl");
    }

    #[test]
    fn test_invalid_config_host_falls_back() {
        let mut settings = Config::default();
        settings.server.host = "not-an-ip".into();
        let config = merge_args(ServeArgs::default(), settings).unwrap();
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[test]
    fn test_config_can_disable_cors() {
        let mut settings = Config::default();
        settings.server.enable_cors = false;
        let config = merge_args(ServeArgs::default(), settings).unwrap();
        assert!(!config.enable_cors);
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let mut settings = Config::default();
        settings.model.temperature = 0.0;
        assert!(merge_args(ServeArgs::default(), settings).is_err());
    }
}
