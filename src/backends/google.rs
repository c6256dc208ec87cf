//! Google Gemini API client.
//!
//! Targets the `generateContent` endpoint of the Generative Language API.
//! Conversation roles map 1:1 onto the wire (`user`/`model`).

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::chat::{ChatClient, ChatMessage, ChatRole};
use crate::error::ChatError;

use super::error_for_status;

const PROVIDER_NAME: &str = "Gemini";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration for the Gemini client.
#[derive(Debug)]
pub struct GoogleConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// API root, overridable for tests.
    pub base_url: String,
}

/// Client for the Gemini API, bound to one credential and one model.
///
/// Uses `Arc` internally for configuration, making cloning cheap.
#[derive(Debug, Clone)]
pub struct Google {
    pub config: Arc<GoogleConfig>,
    pub client: Client,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Deserialize, Debug)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize, Debug)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Deserialize, Debug)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Deserialize, Debug)]
struct GeminiCandidatePart {
    text: String,
}

impl Google {
    pub fn new(
        api_key: impl Into<String>,
        model: Option<String>,
        base_url: Option<String>,
    ) -> Self {
        Self::with_client(Client::new(), api_key, model, base_url)
    }

    /// Creates a new Gemini client with a custom HTTP client.
    pub fn with_client(
        client: Client,
        api_key: impl Into<String>,
        model: Option<String>,
        base_url: Option<String>,
    ) -> Self {
        Self {
            config: Arc::new(GoogleConfig {
                api_key: api_key.into(),
                model: model.unwrap_or_else(|| "gemini-2.0-flash".to_string()),
                base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            }),
            client,
        }
    }

    pub fn api_key(&self) -> &str {
        &self.config.api_key
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl ChatClient for Google {
    async fn converse(&self, history: &[ChatMessage], message: &str) -> Result<String, ChatError> {
        if self.config.api_key.is_empty() {
            return Err(ChatError::Auth("Missing Gemini API key".to_string()));
        }

        let mut contents: Vec<GeminiContent> = history
            .iter()
            .map(|m| GeminiContent {
                role: match m.role {
                    ChatRole::User => "user",
                    ChatRole::Model => "model",
                },
                parts: vec![GeminiPart { text: &m.content }],
            })
            .collect();
        contents.push(GeminiContent {
            role: "user",
            parts: vec![GeminiPart { text: message }],
        });

        let body = GeminiRequest { contents };

        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = serde_json::to_string(&body) {
                log::trace!("Gemini request payload: {json}");
            }
        }

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        );
        let resp = self.client.post(&url).json(&body).send().await?;

        log::debug!("Gemini HTTP status: {}", resp.status());

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            return Err(error_for_status(PROVIDER_NAME, status, error_text));
        }

        let raw = resp.text().await?;
        let parsed: GeminiResponse =
            serde_json::from_str(&raw).map_err(|err| ChatError::ResponseFormat {
                message: format!("Failed to decode Gemini response: {err}"),
                raw_response: raw.clone(),
            })?;

        // A 200 with no candidates is how safety-filtered prompts come back.
        parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or(ChatError::ProviderRejected {
                provider: PROVIDER_NAME,
                status: status.as_u16(),
                body: raw,
            })
    }
}
