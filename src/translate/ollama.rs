use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::{Result, MixlateError};
use crate::language::LanguageTag;
use super::TranslationEngine;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
    pub done: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    pub text: String,
}

/// Translation through ollama's `/api/generate`.
pub struct OllamaEngine {
    client: Client,
    config: EngineConfig,
    // One generate request in flight at a time.
    inference: Mutex<()>,
}

impl OllamaEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            inference: Mutex::new(()),
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: String) -> Result<String> {
        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt,
            stream: false,
            format: "json".to_string(),
        };

        let url = format!("{}/api/generate", self.config.endpoint);
        debug!("Sending translation request to: {}", url);

        let _guard = self.inference.lock().await;

        let response = self.client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| MixlateError::Engine(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(MixlateError::Engine(format!(
                "Ollama API error {}: {}", status, error_text
            )));
        }

        let generated: GenerateResponse = response.json().await
            .map_err(|e| MixlateError::Engine(format!("Failed to parse response: {}", e)))?;

        Ok(generated.response)
    }
}

#[async_trait]
impl TranslationEngine for OllamaEngine {
    async fn translate(
        &self,
        text: &str,
        source: LanguageTag,
        target: LanguageTag,
    ) -> Result<String> {
        let prompt = build_translation_prompt(text, source, target);
        let raw = self.generate(prompt).await?;
        let raw = raw.trim();

        debug!("Raw ollama response: {}", raw);

        Ok(parse_translation(raw))
    }
}

/// Prompt declaring the source language as authoritative, JSON output.
pub fn build_translation_prompt(text: &str, source: LanguageTag, target: LanguageTag) -> String {
    let source_name = source.display_name();
    let target_name = target.display_name();

    format!(
        "Translate the passage below from {source_name} ({source}) into {target_name} ({target}).\n\
         Treat the passage as {source_name} even if some words look like another language, \
         and render every word in {target_name}.\n\
         \n\
         Reply with a single JSON object {{\"text\": \"...\"}} holding the {target_name} passage \
         and nothing else.\n\
         \n\
         Passage:\n\
         {text}\n"
    )
}

/// Extract the translation from a model response: JSON first, then a
/// line-based cleanup for models that ignore the format.
pub fn parse_translation(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    if let Ok(result) = serde_json::from_str::<TranslationResult>(raw) {
        return result.text.trim().to_string();
    }

    clean_translation_response(raw)
}

fn is_preamble(line: &str) -> bool {
    line.starts_with("Here are")
        || line.starts_with("Here is")
        || line.starts_with("Option")
        || line.starts_with("**Option")
        || line.starts_with("Translation:")
        || line.starts_with("- ")
        || line.starts_with("* ")
        || (line.starts_with("**") && line.ends_with("**"))
}

fn clean_translation_response(response: &str) -> String {
    let lines: Vec<&str> = response.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    lines
        .iter()
        .find(|line| !is_preamble(line) && line.chars().count() > 3)
        .or_else(|| lines.first())
        .map(|line| line.to_string())
        .unwrap_or_else(|| response.trim().to_string())
}

/// Check if ollama is available and the model is loaded
pub async fn check_ollama_availability(endpoint: &str, model: &str) -> Result<()> {
    let client = Client::new();
    let url = format!("{}/api/show", endpoint);

    let request = json!({
        "name": model
    });

    let response = client
        .post(&url)
        .json(&request)
        .send()
        .await
        .map_err(|e| MixlateError::Engine(format!("Failed to connect to ollama: {}", e)))?;

    if response.status().is_success() {
        info!("Ollama model '{}' is available", model);
        Ok(())
    } else {
        Err(MixlateError::Engine(format!(
            "Ollama model '{}' not found. Please pull the model first: ollama pull {}",
            model, model
        )))
    }
}
