//! # Questsmith Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout questsmith. It follows
//! a two-level approach:
//! - `QuestsmithError`: a `thiserror` enum for the specific failures the
//!   application knows how to describe (configuration, model, templates, prompts).
//! - `Result<T>`: an alias for `anyhow::Result<T>`, so call sites can attach
//!   context with `.context(..)` / `.with_context(..)`.
//!
//! HTTP handlers do not return these directly; they translate failures into
//! `ApiError` (see `commands::serve::handlers`), which knows its status code.
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if config.model.max_new_tokens == 0 {
//!     return Err(QuestsmithError::Config("max_new_tokens must be > 0".into()))?;
//! }
//!
//! // Add context to errors using anyhow
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read file: {}", path.display()))?;
//! ```
//!
use thiserror::Error;

/// Custom error type for questsmith.
#[derive(Error, Debug)]
pub enum QuestsmithError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Model request failed: {source}")]
    ModelHttp {
        #[from]
        source: reqwest::Error,
    },

    #[error("Model output did not contain the marker '{marker}'")]
    MarkerNotFound { marker: String },

    #[error("Template rendering error: {source}")]
    Template {
        #[from]
        source: tera::Error,
    },

    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = QuestsmithError::Config("top_p must be in (0, 1]".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: top_p must be in (0, 1]"
        );

        let marker = QuestsmithError::MarkerNotFound {
            marker: "### Quest:".into(),
        };
        assert_eq!(
            marker.to_string(),
            "Model output did not contain the marker '### Quest:'"
        );

        let unavailable = QuestsmithError::ModelUnavailable("no API token".into());
        assert_eq!(unavailable.to_string(), "Model unavailable: no API token");
    }
}
