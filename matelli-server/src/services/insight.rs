//! Nutrition insight for a weekly kit via the Gemini REST API (no SDK dependency)
//!
//! The insight is decoration: every failure turns into a fixed encouraging
//! text and is only logged.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use shared::models::Weekday;
use thiserror::Error;

use crate::core::Config;

/// Returned when the model answers with no text
pub const EMPTY_RESPONSE_FALLBACK: &str =
    "Seu planejamento semanal está excelente! Uma jornada nutritiva e saborosa te espera.";

/// Returned on any request failure
pub const ERROR_FALLBACK: &str =
    "Sua escolha foi excelente! Equilíbrio e sabor para todos os seus dias.";

const TEMPERATURE: f64 = 0.7;
const MAX_OUTPUT_TOKENS: u32 = 500;

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("Insight provider not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned status {0}")]
    Status(u16),

    #[error("Request timed out")]
    Timeout,
}

/// Text generation backend
#[async_trait]
pub trait InsightProvider: Send + Sync {
    /// Generated text; an empty string means the model said nothing
    async fn generate(&self, prompt: &str) -> Result<String, InsightError>;
}

/// `models/{model}:generateContent` client
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl InsightProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, InsightError> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": TEMPERATURE,
                "maxOutputTokens": MAX_OUTPUT_TOKENS,
            }
        });

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(InsightError::Status(status.as_u16()));
        }

        let value: serde_json::Value = resp.json().await?;
        Ok(response_text(&value))
    }
}

/// Concatenated text parts of the first candidate
fn response_text(value: &serde_json::Value) -> String {
    value["candidates"][0]["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p["text"].as_str())
                .collect::<String>()
        })
        .unwrap_or_default()
}

pub fn build_prompt(days: &BTreeMap<Weekday, Vec<String>>) -> String {
    let summary = days
        .iter()
        .map(|(day, meals)| format!("{}: {}", day, meals.join(", ")))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "O usuário montou o seguinte kit semanal de marmitas congeladas organizado por dias da semana:\n\
         {summary}\n\n\
         Como um nutricionista especialista, dê um feedback curto e motivador sobre esse planejamento semanal em português brasileiro.\n\
         Analise se a distribuição das refeições ao longo dos dias está variada e equilibrada.\n\
         Mantenha o tom profissional mas acolhedor. No máximo 3 parágrafos curtos."
    )
}

#[derive(Clone)]
pub struct InsightService {
    provider: Option<Arc<dyn InsightProvider>>,
    timeout: Duration,
}

impl std::fmt::Debug for InsightService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsightService")
            .field("configured", &self.provider.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl InsightService {
    pub fn new(provider: Option<Arc<dyn InsightProvider>>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Gemini when `GEMINI_API_KEY` is set, otherwise always the fallback
    pub fn from_config(config: &Config) -> Self {
        let provider = config.gemini_api_key.as_ref().map(|key| {
            Arc::new(GeminiProvider::new(
                &config.gemini_base_url,
                &config.gemini_model,
                key,
            )) as Arc<dyn InsightProvider>
        });
        if provider.is_none() {
            tracing::info!("GEMINI_API_KEY not set, nutrition insight uses fallback text");
        }
        Self::new(provider, config.insight_timeout())
    }

    async fn try_generate(&self, prompt: &str) -> Result<String, InsightError> {
        let provider = self.provider.as_ref().ok_or(InsightError::NotConfigured)?;
        tokio::time::timeout(self.timeout, provider.generate(prompt))
            .await
            .map_err(|_| InsightError::Timeout)?
    }

    /// Feedback text for a kit; never fails
    pub async fn insight(&self, days: &BTreeMap<Weekday, Vec<String>>) -> String {
        let prompt = build_prompt(days);
        match self.try_generate(&prompt).await {
            Ok(text) if text.trim().is_empty() => EMPTY_RESPONSE_FALLBACK.to_string(),
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "Nutrition insight failed, using fallback");
                ERROR_FALLBACK.to_string()
            }
        }
    }
}
