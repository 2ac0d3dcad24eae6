//! # Questsmith Template System
//!
//! File: cli/src/core/templating.rs
//!
//! ## Overview
//!
//! Renders the two text artifacts questsmith produces from templates, using the
//! Tera engine:
//! - the instruction prompt sent to the text-generation model, which embeds
//!   the user's keyword and ends with the `### Quest:` marker the model
//!   continues from;
//! - the static landing page served at `GET /`.
//!
//! Both templates are compiled into the binary. The instruction prompt is
//! rendered without HTML escaping so keywords like `fire & ice` reach the model
//! untouched; the landing page is escaped.
//!
//! ## Examples
//!
//! ```rust
//! let instruction = templating::render_instruction("dragon", "### Quest:")?;
//! assert!(instruction.ends_with("### Quest:"));
//! ```
//!
use crate::core::error::{QuestsmithError, Result};
use anyhow::anyhow;
use tera::{Context, Tera};

const INSTRUCTION_TEMPLATE: &str = r#"You are a senior quest designer for a AAA game studio. Create an exciting, playable game quest that hooks players instantly and keeps them engaged. Use simple, direct language that every gamer understands.

Key gaming elements to include:
1. *Player-Centric Design:* The PLAYER is the hero. Use "you" to put them in the action.

2. *Clear Gameplay Loop:* Build a compelling loop with:
   - Combat encounters with varied enemy types
   - Exploration of interesting locations
   - Meaningful choices with consequences
   - Boss battles with unique mechanics

3. *Progression & Rewards:* Include:
   - XP rewards and level-ups
   - Unique loot and gear with special abilities
   - New skills or abilities the player can unlock
   - Crafting materials or collectibles

4. *Gaming Tropes Done Right:* Moments gamers love:
   - Epic boss fights with phases
   - Tense stealth sections
   - Dramatic escapes and chase sequences
   - Plot twists that change the gameplay

5. *Simple Language:* Direct, action-oriented words. Keep it simple but exciting, and explain each element in detail.

### Prompt: {{ prompt }}
{{ marker }}"#;

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Questsmith {{ version }}</title>
</head>
<body>
  <h1>Questsmith</h1>
  <p>Type a keyword (for example <em>dragon</em> or <em>forest</em>) and receive a quest.</p>
  <form id="quest-form">
    <input id="prompt" name="prompt" placeholder="dragon" required>
    <button type="submit">Generate</button>
  </form>
  <pre id="quest"></pre>
  <footer>Model: {{ model_name }}</footer>
  <script>
    document.getElementById("quest-form").addEventListener("submit", async (event) => {
      event.preventDefault();
      const prompt = document.getElementById("prompt").value;
      const response = await fetch("/generate", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify({ prompt }),
      });
      const body = await response.json();
      document.getElementById("quest").textContent = body.quest || body.error;
    });
  </script>
</body>
</html>
"#;

/// Renders the model instruction prompt for `prompt`, ending with `marker`.
pub fn render_instruction(prompt: &str, marker: &str) -> Result<String> {
    let mut context = Context::new();
    context.insert("prompt", prompt);
    context.insert("marker", marker);
    Tera::one_off(INSTRUCTION_TEMPLATE, &context, false).map_err(|e| {
        anyhow!(QuestsmithError::Template { source: e })
            .context("Failed to render model instruction prompt")
    })
}

/// Renders the landing page.
pub fn render_index(version: &str, model_name: &str) -> Result<String> {
    let mut context = Context::new();
    context.insert("version", version);
    context.insert("model_name", model_name);
    Tera::one_off(INDEX_TEMPLATE, &context, true).map_err(|e| {
        anyhow!(QuestsmithError::Template { source: e }).context("Failed to render landing page")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_embeds_prompt_and_marker() -> Result<()> {
        let rendered = render_instruction("shadow titan", "### Quest:")?;
        assert!(rendered.contains("### Prompt: shadow titan\n### Quest:"));
        assert!(rendered.ends_with("### Quest:"));
        assert!(rendered.contains("Player-Centric Design"));
        Ok(())
    }

    #[test]
    fn test_instruction_is_not_html_escaped() -> Result<()> {
        let rendered = render_instruction("fire & ice <realm>", "### Quest:")?;
        assert!(rendered.contains("### Prompt: fire & ice <realm>"));
        Ok(())
    }

    #[test]
    fn test_index_escapes_values() -> Result<()> {
        let rendered = render_index("1.0.0", "<b>model</b>")?;
        assert!(rendered.contains("Questsmith 1.0.0"));
        assert!(rendered.contains("&lt;b&gt;model&lt;&#x2F;b&gt;"));
        Ok(())
    }
}
