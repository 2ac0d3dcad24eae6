//! # Questsmith Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared functionality used by more than one command, kept apart from the
//! command-specific logic in `commands::` and the infrastructure in `core::`.
//!
//! - **`quest`**: the quest generator, its fallback strategies, and the example store.
//! - **`system`**: best-effort host CPU/memory usage for the status endpoint.
//!
//! ```rust
//! use crate::common::quest::{GeneratorOptions, QuestGenerator};
//! use crate::common::system;
//! ```
//!

/// Quest generation: strategy chain, hosted model, example store.
pub mod quest;
/// Host resource usage probes.
pub mod system;
