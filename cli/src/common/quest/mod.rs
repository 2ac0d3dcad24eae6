//! # Quest Generation (`common::quest`)
//!
//! File: cli/src/common/quest/mod.rs
//!
//! ## Overview
//!
//! Turns a keyword prompt into a quest. Generation is an ordered chain of
//! strategies, each tried once:
//!
//! 1. `HostedModel`: the text-generation model (when configured)
//! 2. `ExactMatch`: a stored example with the same prompt
//! 3. `FuzzyMatch`: a related stored example, lightly reworded
//! 4. `GenericTemplate`: a fixed sentence embedding the prompt
//!
//! The first non-empty answer wins. `QuestGenerator::generate` cannot fail:
//! if every strategy declines, the generic template is used.
//!
//! ## Usage
//!
//! ```rust
//! let store = Arc::new(ExampleStore::load(&dataset_path, 50));
//! let generator = QuestGenerator::from_config(&config, store, GeneratorOptions::default());
//! let quest = generator.generate("dragon").await;
//! ```
//!
pub mod examples;
pub mod model;
pub mod strategy;

use crate::core::config::Config;
use examples::ExampleStore;
use model::HostedModel;
use std::sync::Arc;
use strategy::{generic_quest, ExactMatch, FuzzyMatch, GenericTemplate, QuestStrategy};
use tracing::{debug, info};

/// Switches that commands layer on top of the configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneratorOptions {
    /// Skip the model strategy entirely.
    pub offline: bool,
    /// Seed for the fuzzy strategy's word substitutions.
    pub seed: Option<u64>,
}

pub struct QuestGenerator {
    strategies: Vec<Box<dyn QuestStrategy>>,
    model_id: Option<String>,
}

impl QuestGenerator {
    /// A generator running exactly `strategies`, in order.
    pub fn new(strategies: Vec<Box<dyn QuestStrategy>>) -> Self {
        Self {
            strategies,
            model_id: None,
        }
    }

    /// The standard chain. The model strategy is included only when it can be
    /// built (enabled, token present, not offline).
    pub fn from_config(config: &Config, store: Arc<ExampleStore>, options: GeneratorOptions) -> Self {
        let mut strategies: Vec<Box<dyn QuestStrategy>> = Vec::new();
        let mut model_id = None;

        if options.offline {
            info!("Offline mode: quests come from examples only.");
        } else {
            match HostedModel::from_config(&config.model) {
                Ok(model) => {
                    model_id = Some(model.model_id().to_string());
                    strategies.push(Box::new(model));
                }
                Err(e) => info!("Model strategy not used: {:#}", e),
            }
        }

        let fuzzy = match options.seed {
            Some(seed) => FuzzyMatch::seeded(store.clone(), seed),
            None => FuzzyMatch::from_entropy(store.clone()),
        };
        strategies.push(Box::new(ExactMatch::new(store)));
        strategies.push(Box::new(fuzzy));
        strategies.push(Box::new(GenericTemplate));

        Self {
            strategies,
            model_id,
        }
    }

    /// Runs the chain for a non-empty `prompt`.
    pub async fn generate(&self, prompt: &str) -> String {
        for strategy in &self.strategies {
            match strategy.attempt(prompt).await {
                Some(quest) if !quest.trim().is_empty() => {
                    debug!("Quest for '{}' produced by {}", prompt, strategy.name());
                    return quest;
                }
                Some(_) => debug!("{} returned an empty quest", strategy.name()),
                None => debug!("{} declined '{}'", strategy.name(), prompt),
            }
        }
        generic_quest(prompt)
    }

    /// Id of the hosted model in the chain, if any.
    pub fn model_id(&self) -> Option<&str> {
        self.model_id.as_deref()
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }
}
