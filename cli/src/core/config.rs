//! # Questsmith Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements the configuration system for questsmith, handling
//! loading, merging, validation, and access to configuration data. It supports a
//! multi-level approach that combines defaults, user settings, and
//! project-specific overrides. Command-line flags are applied on top by the
//! individual commands (see `commands::serve::config`).
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.questsmith.toml` in current directory or ancestors
//! 2. User-specific `config.toml` in the platform config dir (e.g. `~/.config/questsmith/`)
//! 3. Default values defined in the code
//!
//! ## Examples
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8000
//!
//! [model]
//! model_id = "openai-community/gpt2"
//! temperature = 0.9
//!
//! [examples]
//! dataset_path = "~/quests/dataset.json"
//! ```
//!
//! ```rust
//! let cfg = config::load_config()?;
//! let store = ExampleStore::load(Path::new(&cfg.examples.dataset_path), cfg.examples.max_lines);
//! ```
//!
use crate::core::error::{QuestsmithError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// The effective configuration: defaults overlaid with the user and project
/// files (see `ConfigLayer`).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Config {
    pub server: ServerSection,
    pub model: ModelConfig,
    pub examples: ExamplesConfig,
}

/// HTTP listener settings for `questsmith serve`.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSection {
    /// Interface to bind. Parsed as an IP address by the serve command.
    pub host: String,
    pub port: u16,
    /// Send permissive CORS headers.
    pub enable_cors: bool,
}

/// Hosted text-generation model used by the primary quest strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// When false, generation goes straight to the example-based fallbacks.
    pub enabled: bool,
    /// Base URL of the inference API; the model id is appended as a path segment.
    pub endpoint: String,
    pub model_id: String,
    /// Name of the environment variable holding the API token.
    pub token_env: String,
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub timeout_secs: u64,
    /// Text after this marker in the model output is taken as the quest.
    pub marker: String,
}

/// Location of the optional line-delimited example dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamplesConfig {
    /// Path to the dataset (can use ~). Will be expanded.
    pub dataset_path: String,
    /// Only this many leading lines of the dataset are considered.
    pub max_lines: usize,
}

/// One configuration file as written. Every key is optional, so a layer only
/// overrides what it actually sets.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    #[serde(default)]
    pub server: ServerLayer,
    #[serde(default)]
    pub model: ModelLayer,
    #[serde(default)]
    pub examples: ExamplesLayer,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerLayer {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub enable_cors: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ModelLayer {
    pub enabled: Option<bool>,
    pub endpoint: Option<String>,
    pub model_id: Option<String>,
    pub token_env: Option<String>,
    pub max_new_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub timeout_secs: Option<u64>,
    pub marker: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExamplesLayer {
    pub dataset_path: Option<String>,
    pub max_lines: Option<usize>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_endpoint() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}
fn default_model_id() -> String {
    "openai-community/gpt2".to_string()
}
fn default_token_env() -> String {
    "HUGGINGFACE_TOKEN".to_string()
}
fn default_max_new_tokens() -> u32 {
    500
}
fn default_temperature() -> f32 {
    0.9
}
fn default_top_p() -> f32 {
    0.95
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_marker() -> String {
    "### Quest:".to_string()
}
fn default_dataset_path() -> String {
    "dataset.json".to_string()
}
fn default_max_lines() -> usize {
    50
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: true,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_endpoint(),
            model_id: default_model_id(),
            token_env: default_token_env(),
            max_new_tokens: default_max_new_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            timeout_secs: default_timeout_secs(),
            marker: default_marker(),
        }
    }
}

impl Default for ExamplesConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            max_lines: default_max_lines(),
        }
    }
}

const PROJECT_CONFIG_FILENAME: &str = ".questsmith.toml";

pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(
        user_config.unwrap_or_default(),
        project_config.unwrap_or_default(),
    );
    expand_config_paths(&mut merged_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<ConfigLayer>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "Questsmith", "questsmith") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.is_file() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<ConfigLayer>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file ({PROJECT_CONFIG_FILENAME}) found in current directory or ancestors.");
        Ok(None)
    }
}

/// Walks up from `start` looking for `.questsmith.toml`, stopping at the
/// first directory that contains `.git`.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

pub fn load_config_from_path(path: &Path) -> Result<ConfigLayer> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Field-wise merge: a key set in the project file wins, then a key set in
/// the user file, then the built-in default.
fn merge_configs(user: ConfigLayer, project: ConfigLayer) -> Config {
    fn pick<T>(project: Option<T>, user: Option<T>, default: impl FnOnce() -> T) -> T {
        project.or(user).unwrap_or_else(default)
    }

    let (ps, us) = (project.server, user.server);
    let (pm, um) = (project.model, user.model);
    let (pe, ue) = (project.examples, user.examples);

    Config {
        server: ServerSection {
            host: pick(ps.host, us.host, default_host),
            port: pick(ps.port, us.port, default_port),
            enable_cors: pick(ps.enable_cors, us.enable_cors, || true),
        },
        model: ModelConfig {
            enabled: pick(pm.enabled, um.enabled, || true),
            endpoint: pick(pm.endpoint, um.endpoint, default_endpoint),
            model_id: pick(pm.model_id, um.model_id, default_model_id),
            token_env: pick(pm.token_env, um.token_env, default_token_env),
            max_new_tokens: pick(pm.max_new_tokens, um.max_new_tokens, default_max_new_tokens),
            temperature: pick(pm.temperature, um.temperature, default_temperature),
            top_p: pick(pm.top_p, um.top_p, default_top_p),
            timeout_secs: pick(pm.timeout_secs, um.timeout_secs, default_timeout_secs),
            marker: pick(pm.marker, um.marker, default_marker),
        },
        examples: ExamplesConfig {
            dataset_path: pick(pe.dataset_path, ue.dataset_path, default_dataset_path),
            max_lines: pick(pe.max_lines, ue.max_lines, default_max_lines),
        },
    }
}

pub fn expand_config_paths(config: &mut Config) {
    config.examples.dataset_path = shellexpand::tilde(&config.examples.dataset_path).into_owned();
    debug!("Expanded dataset path: {}", config.examples.dataset_path);
}

pub fn validate_config(config: &Config) -> Result<()> {
    debug!("Validating final configuration...");
    let model = &config.model;
    if model.max_new_tokens == 0 {
        return Err(anyhow!(QuestsmithError::Config(
            "model.max_new_tokens must be greater than 0".into()
        )));
    }
    if !(model.temperature > 0.0 && model.temperature <= 2.0) {
        return Err(anyhow!(QuestsmithError::Config(format!(
            "model.temperature must be in (0, 2], got {}",
            model.temperature
        ))));
    }
    if !(model.top_p > 0.0 && model.top_p <= 1.0) {
        return Err(anyhow!(QuestsmithError::Config(format!(
            "model.top_p must be in (0, 1], got {}",
            model.top_p
        ))));
    }
    if model.marker.trim().is_empty() {
        return Err(anyhow!(QuestsmithError::Config(
            "model.marker cannot be empty".into()
        )));
    }
    if model.endpoint.trim().is_empty() {
        return Err(anyhow!(QuestsmithError::Config(
            "model.endpoint cannot be empty".into()
        )));
    }
    if config.examples.max_lines == 0 {
        return Err(anyhow!(QuestsmithError::Config(
            "examples.max_lines must be greater than 0".into()
        )));
    }
    let dataset = PathBuf::from(&config.examples.dataset_path);
    if dataset.exists() && !dataset.is_file() {
        warn!(
            "Configured dataset path '{}' exists but is not a file; only built-in examples will be used.",
            dataset.display()
        );
    }
    debug!("Configuration validation successful.");
    Ok(())
}
