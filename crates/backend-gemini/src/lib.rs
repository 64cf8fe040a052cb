//! Gemini knowledge backend.
//!
//! Provides the `KnowledgeBackend` trait and its Gemini implementation.
//! The product assistant sends general-knowledge and nutrition questions
//! here; everything else is answered from templates without a network call.

use serde::Deserialize;
use serde_json::json;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors from knowledge backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("No API key configured")]
    MissingApiKey,

    #[error("Backend not available")]
    Unavailable,
}

/// Trait for text-generation backends (Gemini, offline stand-ins, ...).
pub trait KnowledgeBackend {
    /// Send a prompt and return the generated text.
    fn ask(&self, prompt: &str) -> impl Future<Output = Result<String, BackendError>> + Send;

    /// Check if the backend is reachable and configured.
    fn health_check(&self) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Get the backend name for logging.
    fn name(&self) -> &'static str;
}

/// Gemini backend configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL of the Generative Language API
    pub base_url: String,
    pub model: String,
    /// API key; requests fail with `MissingApiKey` when absent
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash-latest".to_string(),
            api_key: None,
            timeout_secs: 30,
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
        }
    }
}

impl GeminiConfig {
    /// Defaults overridden by `GEMINI_API_KEY`, `GEMINI_MODEL` and
    /// `GEMINI_BASE_URL`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            model: std::env::var("GEMINI_MODEL").unwrap_or(defaults.model.clone()),
            base_url: std::env::var("GEMINI_BASE_URL").unwrap_or(defaults.base_url.clone()),
            ..defaults
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Gemini `generateContent` backend.
pub struct GeminiBackend {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiBackend {
    /// Create a new Gemini backend.
    pub fn new(config: GeminiConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn api_key(&self) -> Result<&str, BackendError> {
        self.config
            .api_key
            .as_deref()
            .ok_or(BackendError::MissingApiKey)
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Build the JSON request body for a prompt.
    fn build_request(&self, prompt: &str) -> serde_json::Value {
        json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "temperature": self.config.temperature,
                "topK": self.config.top_k,
                "topP": self.config.top_p,
                "maxOutputTokens": self.config.max_output_tokens,
            }
        })
    }

    /// Pull the first candidate's first text part out of a response.
    fn parse_response(&self, response: serde_json::Value) -> Result<String, BackendError> {
        let parsed: GenerateResponse =
            serde_json::from_value(response).map_err(|e| BackendError::ParseError(e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| BackendError::ParseError("Missing candidate text".to_string()))
    }
}

impl KnowledgeBackend for GeminiBackend {
    async fn ask(&self, prompt: &str) -> Result<String, BackendError> {
        let key = self.api_key()?;
        let url = self.generate_url();

        tracing::debug!(model = %self.config.model, prompt_len = prompt.len(), "Sending Gemini request");

        let response = self
            .client
            .post(&url)
            .query(&[("key", key)])
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "Gemini request failed");
            return Err(BackendError::RequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BackendError::ParseError(e.to_string()))?;

        let answer = self.parse_response(json)?;
        tracing::debug!(answer_len = answer.len(), "Gemini answer received");
        Ok(answer)
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        let key = self.api_key()?;
        let url = format!(
            "{}/models/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );

        let response = self
            .client
            .get(url)
            .query(&[("key", key)])
            .send()
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(BackendError::Unavailable)
        }
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

/// Backend for running without network access. Every call is `Unavailable`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineBackend;

impl KnowledgeBackend for OfflineBackend {
    async fn ask(&self, _prompt: &str) -> Result<String, BackendError> {
        Err(BackendError::Unavailable)
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        Err(BackendError::Unavailable)
    }

    fn name(&self) -> &'static str {
        "offline"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> GeminiBackend {
        GeminiBackend::new(GeminiConfig::default()).unwrap()
    }

    #[test]
    fn test_generate_url() {
        let config = GeminiConfig {
            base_url: "http://localhost:8080/v1beta/".to_string(),
            ..Default::default()
        };
        let backend = GeminiBackend::new(config).unwrap();
        assert_eq!(
            backend.generate_url(),
            "http://localhost:8080/v1beta/models/gemini-1.5-flash-latest:generateContent"
        );
    }

    #[test]
    fn test_build_request() {
        let body = backend().build_request("How many calories in rice?");
        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "How many calories in rice?"
        );
        assert_eq!(body["generationConfig"]["topK"], 40);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1024);
    }

    #[test]
    fn test_parse_response() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "About 130 kcal per 100g." }] }
            }]
        });
        assert_eq!(
            backend().parse_response(response).unwrap(),
            "About 130 kcal per 100g."
        );
    }

    #[test]
    fn test_parse_response_without_candidates() {
        let response = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert!(matches!(
            backend().parse_response(response),
            Err(BackendError::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let result = backend().ask("hello").await;
        assert!(matches!(result, Err(BackendError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_offline_backend() {
        assert!(matches!(
            OfflineBackend.ask("anything").await,
            Err(BackendError::Unavailable)
        ));
        assert!(OfflineBackend.health_check().await.is_err());
    }
}
