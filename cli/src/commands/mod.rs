//! # Questsmith Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! The top-level commands of the questsmith CLI, plus the flags they share:
//!
//! - `serve`: the HTTP API (`POST /generate`, `GET /status`, ...)
//! - `generate`: one-shot quest generation printed to the terminal
//!
//! Both commands draw quests from the same place, configured by
//! `QuestSourceArgs` (`--offline`, `--dataset`, `--seed`) and built by
//! `build_generator`.
//!

/// One-shot generation for prompts given on the command line.
pub mod generate;
/// The quest HTTP API.
pub mod serve;

use crate::common::quest::examples::ExampleStore;
use crate::common::quest::{GeneratorOptions, QuestGenerator};
use crate::core::config::Config;
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Flags controlling where quests come from.
#[derive(Args, Debug, Default, Clone)]
pub struct QuestSourceArgs {
    /// Skip the hosted model and answer from the example store only.
    #[arg(long)]
    pub offline: bool,

    /// Line-delimited JSON file of extra `{"prompt", "quest"}` examples.
    #[arg(long, value_name = "PATH")]
    pub dataset: Option<PathBuf>,

    /// Seed for the fuzzy-match word substitution (deterministic output).
    #[arg(long)]
    pub seed: Option<u64>,
}

impl QuestSourceArgs {
    /// Writes the flags that map onto configuration into `settings`.
    pub fn apply_to(&self, settings: &mut Config) {
        if self.offline {
            settings.model.enabled = false;
        }
        if let Some(dataset) = &self.dataset {
            // A quoted `~/...` reaches us unexpanded by the shell.
            settings.examples.dataset_path =
                shellexpand::tilde(&dataset.to_string_lossy()).into_owned();
        }
    }

    pub fn options(&self) -> GeneratorOptions {
        GeneratorOptions {
            offline: self.offline,
            seed: self.seed,
        }
    }
}

/// Loads the example store and assembles the strategy chain.
pub fn build_generator(settings: &Config, options: GeneratorOptions) -> QuestGenerator {
    let store = ExampleStore::load(
        Path::new(&settings.examples.dataset_path),
        settings.examples.max_lines,
    );
    QuestGenerator::from_config(settings, Arc::new(store), options)
}
