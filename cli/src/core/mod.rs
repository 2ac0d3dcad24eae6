//! # Questsmith Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces shared by every command:
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and the crate-wide `Result` alias
//! - `templating`: Tera rendering of the model instruction prompt and landing page
//!
//! ```rust
//! use crate::core::config;
//! use crate::core::error::{QuestsmithError, Result};
//! use crate::core::templating;
//! ```
//!
pub mod config;
pub mod error;
pub mod templating;
