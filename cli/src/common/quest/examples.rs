//! # Example Store
//!
//! File: cli/src/common/quest/examples.rs
//!
//! ## Overview
//!
//! Holds the (prompt, quest) pairs the fallback strategies match against. The
//! store starts from a small built-in set and can be extended once at startup
//! from a line-delimited JSON file, one `{"prompt": ..., "quest": ...}` object
//! per line. Loading is best-effort:
//! - only the first `max_lines` lines are considered;
//! - a line is accepted only if it fully decodes, otherwise it is skipped;
//! - entries already present (exact equality) are not added twice;
//! - a missing or unreadable file leaves just the built-in set.
//!
//! After loading the store is never mutated; it is shared behind an `Arc`.
//!
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// A stored reference pair used by the example-based strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub prompt: String,
    pub quest: String,
}

impl Example {
    pub fn new(prompt: &str, quest: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            quest: quest.to_string(),
        }
    }
}

/// Ordered, deduplicated, read-only collection of examples.
#[derive(Debug, Clone, Default)]
pub struct ExampleStore {
    examples: Vec<Example>,
}

impl ExampleStore {
    /// The built-in examples only.
    pub fn builtin() -> Self {
        Self::from_examples(builtin_examples())
    }

    /// Builds a store from `examples`, dropping exact duplicates and keeping
    /// the first occurrence.
    pub fn from_examples(examples: impl IntoIterator<Item = Example>) -> Self {
        let mut store = Self::default();
        for example in examples {
            store.push_unique(example);
        }
        store
    }

    /// Built-in examples extended with up to `max_lines` lines of the dataset
    /// at `path`. Never fails.
    pub fn load(path: &Path, max_lines: usize) -> Self {
        let mut store = Self::builtin();

        if !path.is_file() {
            debug!(
                "No example dataset at {}, using {} built-in examples.",
                path.display(),
                store.len()
            );
            return store;
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    "Could not load examples from {}: {}. Using built-in examples only.",
                    path.display(),
                    e
                );
                return store;
            }
        };

        let (parsed, skipped) = parse_dataset(&content, max_lines);
        let before = store.len();
        for example in parsed {
            store.push_unique(example);
        }
        info!(
            "Loaded {} examples from {} ({} lines skipped, {} total).",
            store.len() - before,
            path.display(),
            skipped,
            store.len()
        );
        store
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    fn push_unique(&mut self, example: Example) {
        if !self.examples.contains(&example) {
            self.examples.push(example);
        }
    }
}

/// Parses the leading `max_lines` lines of a line-delimited dataset.
/// Returns the decoded examples and the number of lines that did not decode.
fn parse_dataset(content: &str, max_lines: usize) -> (Vec<Example>, usize) {
    let mut examples = Vec::new();
    let mut skipped = 0;
    for (index, line) in content.lines().take(max_lines).enumerate() {
        match serde_json::from_str::<Example>(line) {
            Ok(example) => examples.push(example),
            Err(e) => {
                debug!("Skipping dataset line {}: {}", index + 1, e);
                skipped += 1;
            }
        }
    }
    (examples, skipped)
}

fn builtin_examples() -> Vec<Example> {
    vec![
        Example::new(
            "dragon",
            "Slay the ancient dragon Vrothgar, who guards the cursed hoard in the Emberfall Peaks.",
        ),
        Example::new(
            "forest",
            "Venture into the Whispering Woods to find the lost druid stone before the moon wanes.",
        ),
        Example::new(
            "necromancer",
            "Hunt down the necromancer Malgros, whose undead minions plague the Weeping Vale.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_builtin_examples() {
        let store = ExampleStore::builtin();
        assert_eq!(store.len(), 3);
        assert_eq!(store.examples()[0].prompt, "dragon");
        assert_eq!(store.examples()[2].prompt, "necromancer");
    }

    #[test]
    fn test_missing_file_falls_back_to_builtin() {
        let dir = tempdir().unwrap();
        let store = ExampleStore::load(&dir.path().join("nope.json"), 50);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_directory_path_falls_back_to_builtin() {
        let dir = tempdir().unwrap();
        let store = ExampleStore::load(dir.path(), 50);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_malformed_line_is_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset.json");
        fs::write(
            &path,
            concat!(
                r#"{"prompt": "wizard", "quest": "Steal the archmage's grimoire."}"#,
                "\n",
                r#"{"prompt": "broken", "quest": "#,
                "\n",
                "not json at all\n",
                r#"{"prompt": "kraken", "quest": "Sink the kraken before the tide turns."}"#,
                "\n",
            ),
        )
        .unwrap();

        let store = ExampleStore::load(&path, 50);
        let prompts: Vec<&str> = store.examples().iter().map(|e| e.prompt.as_str()).collect();
        assert_eq!(
            prompts,
            vec!["dragon", "forest", "necromancer", "wizard", "kraken"]
        );
    }

    #[test]
    fn test_duplicates_are_not_added() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset.json");
        let dragon = serde_json::to_string(&builtin_examples()[0]).unwrap();
        let wizard = r#"{"prompt": "wizard", "quest": "Find the tower."}"#;
        fs::write(&path, format!("{dragon}\n{wizard}\n{wizard}\n")).unwrap();

        let store = ExampleStore::load(&path, 50);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_same_prompt_different_quest_is_kept() {
        let store = ExampleStore::from_examples(vec![
            Example::new("dragon", "One."),
            Example::new("dragon", "Two."),
            Example::new("dragon", "One."),
        ]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_only_leading_lines_are_considered() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset.json");
        let lines: Vec<String> = (0..60)
            .map(|i| format!(r#"{{"prompt": "p{i}", "quest": "Quest number {i}."}}"#))
            .collect();
        fs::write(&path, lines.join("\n")).unwrap();

        let store = ExampleStore::load(&path, 50);
        assert_eq!(store.len(), 3 + 50);
        assert!(store.examples().iter().all(|e| e.prompt != "p50"));
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let (examples, skipped) = parse_dataset(r#"{"prompt": "lonely"}"#, 50);
        assert!(examples.is_empty());
        assert_eq!(skipped, 1);
    }
}
