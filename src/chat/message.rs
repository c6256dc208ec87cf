/// Role of a participant in a chat conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    /// The user/human participant in the conversation
    User,
    /// The replying model. Each backend maps this onto its own wire-level
    /// role name (`"model"` for Gemini, `"assistant"` for OpenAI).
    Model,
}

/// A single message in a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// The role of who sent this message (user or model)
    pub role: ChatRole,
    /// The text content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a new builder for a user message
    pub fn user() -> ChatMessageBuilder {
        ChatMessageBuilder::new(ChatRole::User)
    }

    /// Create a new builder for a model message
    pub fn model() -> ChatMessageBuilder {
        ChatMessageBuilder::new(ChatRole::Model)
    }
}

/// Builder for ChatMessage
#[derive(Debug)]
pub struct ChatMessageBuilder {
    role: ChatRole,
    content: String,
}

impl ChatMessageBuilder {
    /// Create a new ChatMessageBuilder with specified role
    pub fn new(role: ChatRole) -> Self {
        Self {
            role,
            content: String::new(),
        }
    }

    /// Set the message content
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Build the ChatMessage
    pub fn build(self) -> ChatMessage {
        ChatMessage {
            role: self.role,
            content: self.content,
        }
    }
}

/// The scripted turn pair a fresh transcript opens with.
///
/// This is display seed material for the UI shell. Nothing in this crate
/// sends it on its own; a request contains exactly the history the caller
/// passes to [`ChatGateway::send`](crate::gateway::ChatGateway::send).
pub fn seed_history() -> Vec<ChatMessage> {
    vec![
        ChatMessage::user()
            .content("Hello, I need help with some questions.")
            .build(),
        ChatMessage::model()
            .content("Welcome to Latent Chat! How can I assist you?")
            .build(),
    ]
}
