//! # Questsmith Generate Command
//!
//! File: cli/src/commands/generate.rs
//!
//! ## Overview
//!
//! Implements `questsmith generate`, which runs the quest generator for each
//! prompt given on the command line and prints the results. It uses the same
//! configuration and fallback chain as the server, which makes it handy for
//! checking a dataset or model setup without starting the API.
//!
//! ## Usage
//!
//! ```bash
//! questsmith generate dragon forest "shadow titan"
//! questsmith generate --offline --seed 7 --dataset ./dataset.json wizard
//! ```
//!
use crate::commands::{build_generator, QuestSourceArgs};
use crate::core::config;
use crate::core::error::{QuestsmithError, Result};
use anyhow::anyhow;
use clap::Parser;
use tracing::info;

const SEPARATOR_WIDTH: usize = 40;

/// # Generate Arguments (`GenerateArgs`)
#[derive(Parser, Debug)]
#[command(about = "Generate quests for one or more keyword prompts")]
pub struct GenerateArgs {
    /// Keyword prompts, e.g. `dragon` or `"shadow titan"`.
    #[arg(required = true)]
    prompts: Vec<String>,

    #[command(flatten)]
    source: QuestSourceArgs,
}

/// # Handle Generate Command (`handle_generate`)
///
/// ## Errors
///
/// - Any prompt is empty (checked before anything is generated).
/// - The configuration cannot be loaded or is invalid.
pub async fn handle_generate(args: GenerateArgs) -> Result<()> {
    if let Some(position) = args.prompts.iter().position(|p| p.is_empty()) {
        return Err(anyhow!(QuestsmithError::InvalidPrompt(format!(
            "prompt #{} is empty",
            position + 1
        ))));
    }

    let mut settings = config::load_config()?;
    args.source.apply_to(&mut settings);
    config::validate_config(&settings)?;

    let generator = build_generator(&settings, args.source.options());
    info!(
        "Generating {} quest(s) using: {}",
        args.prompts.len(),
        generator.strategy_names().join(" -> ")
    );

    for prompt in &args.prompts {
        let quest = generator.generate(prompt).await;
        println!("\nPrompt: {}", prompt);
        println!("Quest: {}", quest);
        println!("{}", "-".repeat(SEPARATOR_WIDTH));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_prompt_is_rejected() {
        let args = GenerateArgs::parse_from(["generate", "--offline", "dragon", ""]);
        let err = handle_generate(args).await.unwrap_err();
        assert!(err.to_string().contains("prompt #2 is empty"));
    }

    #[test]
    fn test_parses_source_flags() {
        let args = GenerateArgs::parse_from([
            "generate",
            "--offline",
            "--seed",
            "9",
            "--dataset",
            "quests.jsonl",
            "dragon",
            "forest",
        ]);
        assert_eq!(args.prompts, vec!["dragon", "forest"]);
        assert!(args.source.offline);
        assert_eq!(args.source.seed, Some(9));
        assert_eq!(
            args.source.dataset.as_deref(),
            Some(std::path::Path::new("quests.jsonl"))
        );
    }

    #[test]
    fn test_requires_a_prompt() {
        assert!(GenerateArgs::try_parse_from(["generate"]).is_err());
    }
}
