//! OpenAI API client.
//!
//! Targets the chat-completions endpoint. The internal `Model` role is
//! rewritten to OpenAI's `assistant` role on the wire.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::chat::{ChatClient, ChatMessage, ChatRole};
use crate::error::ChatError;

use super::error_for_status;

const PROVIDER_NAME: &str = "OpenAI";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for the OpenAI client.
#[derive(Debug)]
pub struct OpenAIConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// API root, overridable for tests.
    pub base_url: String,
}

/// Client for the OpenAI API, bound to one credential and one model.
///
/// Uses `Arc` internally for configuration, making cloning cheap.
#[derive(Debug, Clone)]
pub struct OpenAI {
    pub config: Arc<OpenAIConfig>,
    pub client: Client,
}

#[derive(Serialize)]
struct OpenAIChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct OpenAIChatRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIChatMessage<'a>>,
}

#[derive(Deserialize, Debug)]
struct OpenAIChatResponse {
    #[serde(default)]
    choices: Vec<OpenAIChatChoice>,
}

#[derive(Deserialize, Debug)]
struct OpenAIChatChoice {
    message: OpenAIChatMsg,
}

#[derive(Deserialize, Debug)]
struct OpenAIChatMsg {
    #[serde(default)]
    content: String,
}

impl OpenAI {
    pub fn new(
        api_key: impl Into<String>,
        model: Option<String>,
        base_url: Option<String>,
    ) -> Self {
        Self::with_client(Client::new(), api_key, model, base_url)
    }

    /// Creates a new OpenAI client with a custom HTTP client.
    pub fn with_client(
        client: Client,
        api_key: impl Into<String>,
        model: Option<String>,
        base_url: Option<String>,
    ) -> Self {
        Self {
            config: Arc::new(OpenAIConfig {
                api_key: api_key.into(),
                model: model.unwrap_or_else(|| "gpt-4o-mini".to_string()),
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
impl ChatClient for OpenAI {
    async fn converse(&self, history: &[ChatMessage], message: &str) -> Result<String, ChatError> {
        if self.config.api_key.is_empty() {
            return Err(ChatError::Auth("Missing OpenAI API key".to_string()));
        }

        let mut messages: Vec<OpenAIChatMessage> = history
            .iter()
            .map(|m| OpenAIChatMessage {
                role: match m.role {
                    ChatRole::User => "user",
                    ChatRole::Model => "assistant",
                },
                content: &m.content,
            })
            .collect();
        messages.push(OpenAIChatMessage {
            role: "user",
            content: message,
        });

        let body = OpenAIChatRequest {
            model: &self.config.model,
            messages,
        };

        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = serde_json::to_string(&body) {
                log::trace!("OpenAI request payload: {json}");
            }
        }

        let url = format!("{}/chat/completions", self.config.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        log::debug!("OpenAI HTTP status: {}", resp.status());

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            return Err(error_for_status(PROVIDER_NAME, status, error_text));
        }

        let raw = resp.text().await?;
        let parsed: OpenAIChatResponse =
            serde_json::from_str(&raw).map_err(|err| ChatError::ResponseFormat {
                message: format!("Failed to decode OpenAI response: {err}"),
                raw_response: raw.clone(),
            })?;

        parsed
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .filter(|content| !content.is_empty())
            .ok_or(ChatError::ProviderRejected {
                provider: PROVIDER_NAME,
                status: status.as_u16(),
                body: raw,
            })
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn client(server: &mockito::ServerGuard) -> OpenAI {
        OpenAI::new("sk-test", Some("gpt-4o".into()), Some(server.url()))
    }

    #[tokio::test]
    async fn rewrites_model_role_to_assistant() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::Json(json!({
                "model": "gpt-4o",
                "messages": [
                    {"role": "user", "content": "earlier question"},
                    {"role": "assistant", "content": "earlier answer"},
                    {"role": "user", "content": "hi"}
                ]
            })))
            .with_body(
                json!({
                    "choices": [
                        {"message": {"role": "assistant", "content": "hello back"}}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let history = vec![
            ChatMessage::user().content("earlier question").build(),
            ChatMessage::model().content("earlier answer").build(),
        ];
        let reply = client(&server).converse(&history, "hi").await.unwrap();
        assert_eq!(reply, "hello back");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn single_user_message_when_history_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::Json(json!({
                "model": "gpt-4o",
                "messages": [{"role": "user", "content": "hi"}]
            })))
            .with_body(
                json!({"choices": [{"message": {"role": "assistant", "content": "ok"}}]})
                    .to_string(),
            )
            .create_async()
            .await;

        let reply = client(&server).converse(&[], "hi").await.unwrap();
        assert_eq!(reply, "ok");
    }

    #[tokio::test]
    async fn unauthorized_status_maps_to_auth_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body("Incorrect API key provided")
            .create_async()
            .await;

        let err = client(&server).converse(&[], "hi").await.unwrap_err();
        assert!(matches!(err, ChatError::Auth(_)));
    }

    #[tokio::test]
    async fn choice_less_reply_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_body(json!({"choices": []}).to_string())
            .create_async()
            .await;

        let err = client(&server).converse(&[], "hi").await.unwrap_err();
        assert!(matches!(err, ChatError::ProviderRejected { .. }));
    }
}
