mod message;
mod traits;

pub use message::{seed_history, ChatMessage, ChatMessageBuilder, ChatRole};
pub use traits::ChatClient;
