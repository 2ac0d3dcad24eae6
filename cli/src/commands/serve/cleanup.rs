//! # Quest Output Cleanup
//!
//! File: cli/src/commands/serve/cleanup.rs
//!
//! ## Overview
//!
//! Some models echo request/response JSON back instead of plain prose, e.g.
//!
//! ```text
//! {"prompt": "dragon", "quest": "Tame the storm drake."} {"prompt": "forest", ...
//! ```
//!
//! `clean_quest` pulls the quest for the requested prompt out of such output.
//! It is a heuristic, tried in order:
//! 1. a regex for a complete `{"prompt": "<prompt>", "quest": "<text>"}` object;
//! 2. a looser scan: split on `{"prompt":`, take the first chunk mentioning the
//!    prompt that has a `"quest":` field, and read up to the next `}`;
//! 3. otherwise the output is returned unchanged.
//!
use regex::RegexBuilder;
use tracing::debug;

const PROMPT_KEY: &str = r#"{"prompt":"#;
const QUEST_KEY: &str = r#""quest":"#;

/// Extracts the quest for `prompt` from possibly echoed model output.
pub fn clean_quest(raw: &str, prompt: &str) -> String {
    if let Some(quest) = extract_echoed_object(raw, prompt) {
        debug!("Extracted quest from echoed JSON object");
        return quest;
    }
    if let Some(quest) = extract_loose(raw, prompt) {
        debug!("Extracted quest from loosely echoed JSON");
        return quest;
    }
    raw.to_string()
}

fn extract_echoed_object(raw: &str, prompt: &str) -> Option<String> {
    let pattern = format!(
        r#"\{{\s*"prompt":\s*"{}",\s*"quest":\s*"([^"]+)"\s*\}}"#,
        regex::escape(prompt)
    );
    let re = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .ok()?;
    re.captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn extract_loose(raw: &str, prompt: &str) -> Option<String> {
    let wanted = prompt.to_lowercase();
    raw.split(PROMPT_KEY)
        .filter(|part| part.to_lowercase().contains(&wanted))
        .find_map(|part| {
            let value = part.split(QUEST_KEY).nth(1)?;
            let value = value.split('}').next().unwrap_or_default();
            Some(value.trim_matches(|c| c == '"' || c == ' ').trim().to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_untouched() {
        let quest = "Slay the ancient dragon Vrothgar, who guards the cursed hoard.";
        assert_eq!(clean_quest(quest, "dragon"), quest);
    }

    #[test]
    fn test_echoed_object_is_extracted() {
        let raw = r#"Here you go: {"prompt": "dragon", "quest": " Tame the storm drake. "} {"prompt": "forest", "quest": "Burn it."}"#;
        assert_eq!(clean_quest(raw, "dragon"), "Tame the storm drake.");
        assert_eq!(clean_quest(raw, "forest"), "Burn it.");
    }

    #[test]
    fn test_echoed_object_prompt_is_case_insensitive() {
        let raw = r#"{"prompt": "Dragon", "quest": "Find the egg."}"#;
        assert_eq!(clean_quest(raw, "dragon"), "Find the egg.");
    }

    #[test]
    fn test_prompt_with_regex_characters() {
        let raw = r#"{"prompt": "c++ (wizard)", "quest": "Compile the spellbook."}"#;
        assert_eq!(clean_quest(raw, "c++ (wizard)"), "Compile the spellbook.");
    }

    #[test]
    fn test_loose_extraction_when_object_is_not_closed_cleanly() {
        // Quest contains an escaped quote, so the strict pattern cannot match.
        let raw = r#"{"prompt": "forest", "quest": "Find the \"lost\" stone"}"#;
        assert_eq!(
            clean_quest(raw, "forest"),
            r#"Find the \"lost\" stone"#
        );
    }

    #[test]
    fn test_loose_extraction_skips_chunks_without_quest() {
        let raw = r#"{"prompt": "forest" ... {"prompt": "forest","quest":"Guard the grove"#;
        // The first chunk mentions the prompt but has no quest field; the
        // second is truncated, so only the loose scan applies.
        assert_eq!(clean_quest(raw, "forest"), "Guard the grove");
    }

    #[test]
    fn test_prompt_mentioned_without_quest_field_returns_raw() {
        let raw = "Embark on an epic quest to dragon in the forgotten lands.";
        assert_eq!(clean_quest(raw, "dragon"), raw);
    }

    #[test]
    fn test_other_prompt_only_returns_raw() {
        let raw = r#"{"prompt": "forest", "quest": "Guard the grove"}"#;
        assert_eq!(clean_quest(raw, "dragon"), raw);
    }
}
