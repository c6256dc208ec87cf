use async_trait::async_trait;

use crate::error::ChatError;

use super::message::ChatMessage;

/// Capability implemented by every provider client.
///
/// A client is bound to one credential and one model at construction time.
/// `converse` translates `history` into the provider's message-list shape,
/// appends `message` as the final user turn, performs one remote call, and
/// returns the first completion's text. No retries are attempted at this
/// layer.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn converse(&self, history: &[ChatMessage], message: &str) -> Result<String, ChatError>;
}
