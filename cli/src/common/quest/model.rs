//! # Hosted Model Strategy
//!
//! File: cli/src/common/quest/model.rs
//!
//! ## Overview
//!
//! The primary quest strategy: render the instruction prompt, send it to a
//! hosted text-generation endpoint (Hugging Face Inference API request shape),
//! and keep the text that follows the quest marker.
//!
//! The client, token and URL are resolved once, when the strategy is built,
//! and reused for every call. Any failure (HTTP error, unexpected body, missing
//! marker, empty continuation) is logged as a warning and reported to the
//! generator as `None`, so the example-based fallbacks take over.
//!
//! ## Request
//!
//! ```json
//! POST {endpoint}/{model_id}
//! Authorization: Bearer <token>
//! {"inputs": "...### Prompt: dragon\n### Quest:",
//!  "parameters": {"max_new_tokens": 500, "temperature": 0.9, "top_p": 0.95,
//!                 "do_sample": true, "return_full_text": true}}
//! ```
//!
//! The response is `[{"generated_text": "..."}]` (or the bare object).
//!
use super::strategy::QuestStrategy;
use crate::core::config::ModelConfig;
use crate::core::error::{QuestsmithError, Result};
use crate::core::templating;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Serialize, Debug)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Serialize, Debug)]
struct GenerationParameters {
    max_new_tokens: u32,
    temperature: f32,
    top_p: f32,
    do_sample: bool,
    return_full_text: bool,
}

pub struct HostedModel {
    client: reqwest::Client,
    url: String,
    token: String,
    settings: ModelConfig,
}

impl HostedModel {
    /// Builds the strategy from configuration, reading the API token from the
    /// environment variable named by `token_env`.
    ///
    /// Fails with `QuestsmithError::ModelUnavailable` when the model is
    /// disabled or no token is set.
    pub fn from_config(settings: &ModelConfig) -> Result<Self> {
        if !settings.enabled {
            return Err(anyhow!(QuestsmithError::ModelUnavailable(
                "disabled in configuration".into()
            )));
        }
        let token = std::env::var(&settings.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(QuestsmithError::ModelUnavailable(format!(
                    "environment variable {} is not set",
                    settings.token_env
                )))
            })?;
        Self::with_token(settings, token)
    }

    pub fn with_token(settings: &ModelConfig, token: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| anyhow!(QuestsmithError::ModelHttp { source: e }))?;
        let url = format!(
            "{}/{}",
            settings.endpoint.trim_end_matches('/'),
            settings.model_id
        );
        info!("Hosted model configured at {}", url);
        Ok(Self {
            client,
            url,
            token,
            settings: settings.clone(),
        })
    }

    pub fn model_id(&self) -> &str {
        &self.settings.model_id
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let instruction = templating::render_instruction(prompt, &self.settings.marker)?;
        let request = GenerationRequest {
            inputs: &instruction,
            parameters: GenerationParameters {
                max_new_tokens: self.settings.max_new_tokens,
                temperature: self.settings.temperature,
                top_p: self.settings.top_p,
                do_sample: true,
                return_full_text: true,
            },
        };

        debug!("Requesting completion from {}", self.url);
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| anyhow!(QuestsmithError::ModelHttp { source: e }))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(QuestsmithError::ModelUnavailable(format!(
                "endpoint returned {status}: {body}"
            ))));
        }

        let body: Value = response
            .json()
            .await
            .context("Model response was not valid JSON")?;
        let generated = generated_text(&body).ok_or_else(|| {
            anyhow!(QuestsmithError::ModelUnavailable(
                "response did not contain generated_text".into()
            ))
        })?;
        extract_quest(generated, &self.settings.marker)
    }
}

fn generated_text(body: &Value) -> Option<&str> {
    body.get(0)
        .and_then(|first| first.get("generated_text"))
        .or_else(|| body.get("generated_text"))
        .and_then(Value::as_str)
}

/// Returns the trimmed text between the first occurrence of `marker` and the
/// next one (or the end of the output).
pub fn extract_quest(generated: &str, marker: &str) -> Result<String> {
    let quest = generated
        .split(marker)
        .nth(1)
        .ok_or_else(|| {
            anyhow!(QuestsmithError::MarkerNotFound {
                marker: marker.to_string()
            })
        })?
        .trim();
    if quest.is_empty() {
        return Err(anyhow!(QuestsmithError::ModelUnavailable(
            "model produced an empty quest".into()
        )));
    }
    Ok(quest.to_string())
}

#[async_trait]
impl QuestStrategy for HostedModel {
    fn name(&self) -> &'static str {
        "hosted-model"
    }

    async fn attempt(&self, prompt: &str) -> Option<String> {
        match self.generate(prompt).await {
            Ok(quest) => Some(quest),
            Err(e) => {
                warn!("Model generation failed, using fallback quest generation: {:#}", e);
                None
            }
        }
    }
}
