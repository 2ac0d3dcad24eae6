//! # Quest Strategies
//!
//! File: cli/src/common/quest/strategy.rs
//!
//! ## Overview
//!
//! Every way of producing a quest implements `QuestStrategy`. A strategy either
//! returns a quest or declines with `None`; it never errors. The generator
//! tries strategies in order and keeps the first non-empty answer.
//!
//! The example-based strategies live here:
//! - `ExactMatch`: a stored prompt equal to the input (case-insensitive).
//! - `FuzzyMatch`: a stored prompt contained in the input or containing it,
//!   with a few words of its quest swapped for words from other quests.
//! - `GenericTemplate`: a fixed sentence embedding the prompt. Always answers.
//!
//! The model-backed strategy is in `model.rs`.
//!
use super::examples::ExampleStore;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Maximum number of word positions the fuzzy strategy tries to replace.
const MAX_SUBSTITUTIONS: usize = 3;

/// Only words longer than this (in characters) are replaced.
const MIN_REPLACEABLE_LEN: usize = 4;

/// One step of the fallback chain.
#[async_trait]
pub trait QuestStrategy: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Produces a quest for `prompt`, or `None` to let the next strategy try.
    async fn attempt(&self, prompt: &str) -> Option<String>;
}

pub struct ExactMatch {
    store: Arc<ExampleStore>,
}

impl ExactMatch {
    pub fn new(store: Arc<ExampleStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl QuestStrategy for ExactMatch {
    fn name(&self) -> &'static str {
        "exact-match"
    }

    async fn attempt(&self, prompt: &str) -> Option<String> {
        let wanted = prompt.to_lowercase();
        self.store
            .examples()
            .iter()
            .find(|example| example.prompt.to_lowercase() == wanted)
            .map(|example| example.quest.clone())
    }
}

pub struct FuzzyMatch {
    store: Arc<ExampleStore>,
    // Never held across an await.
    rng: Mutex<StdRng>,
}

impl FuzzyMatch {
    pub fn new(store: Arc<ExampleStore>, rng: StdRng) -> Self {
        Self {
            store,
            rng: Mutex::new(rng),
        }
    }

    /// Deterministic substitutions for a given seed.
    pub fn seeded(store: Arc<ExampleStore>, seed: u64) -> Self {
        Self::new(store, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(store: Arc<ExampleStore>) -> Self {
        Self::new(store, StdRng::from_entropy())
    }

    fn vary(&self, quest: &str) -> String {
        let mut words: Vec<String> = quest.split_whitespace().map(str::to_string).collect();
        if words.is_empty() {
            return String::new();
        }

        // A poisoned lock only means another request panicked mid-draw; the
        // RNG state is still usable.
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        for _ in 0..MAX_SUBSTITUTIONS.min(words.len()) {
            let idx = rng.gen_range(0..words.len());
            if !is_replaceable(&words[idx]) {
                continue;
            }
            let Some(donor) = self.store.examples().choose(&mut *rng) else {
                continue;
            };
            let donor_words: Vec<&str> = donor.quest.split_whitespace().collect();
            if let Some(replacement) = donor_words.choose(&mut *rng) {
                debug!("Substituting '{}' with '{}'", words[idx], replacement);
                words[idx] = (*replacement).to_string();
            }
        }
        words.join(" ")
    }
}

fn is_replaceable(word: &str) -> bool {
    word.chars().count() > MIN_REPLACEABLE_LEN
        && word.chars().next().is_some_and(char::is_lowercase)
}

#[async_trait]
impl QuestStrategy for FuzzyMatch {
    fn name(&self) -> &'static str {
        "fuzzy-match"
    }

    async fn attempt(&self, prompt: &str) -> Option<String> {
        let wanted = prompt.to_lowercase();
        let example = self.store.examples().iter().find(|example| {
            let stored = example.prompt.to_lowercase();
            stored.contains(&wanted) || wanted.contains(&stored)
        })?;
        debug!(
            "Prompt '{}' fuzzily matched example '{}'",
            prompt, example.prompt
        );
        Some(self.vary(&example.quest))
    }
}

/// Last resort; always answers.
pub struct GenericTemplate;

#[async_trait]
impl QuestStrategy for GenericTemplate {
    fn name(&self) -> &'static str {
        "generic-template"
    }

    async fn attempt(&self, prompt: &str) -> Option<String> {
        Some(generic_quest(prompt))
    }
}

pub fn generic_quest(prompt: &str) -> String {
    format!(
        "Embark on an epic quest to {prompt} in the forgotten lands. Battle fierce enemies, \
         solve ancient puzzles, and claim legendary treasures that grant magical powers. \
         Your success will determine the fate of the realm."
    )
}
