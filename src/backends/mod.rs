//! Provider API clients.

mod google;
mod openai;

pub use google::Google;
pub use openai::OpenAI;

use reqwest::StatusCode;

use crate::error::ChatError;

/// Map a non-success provider response onto the error taxonomy.
pub(crate) fn error_for_status(
    provider: &'static str,
    status: StatusCode,
    body: String,
) -> ChatError {
    match status.as_u16() {
        401 | 403 => ChatError::Auth(format!("{provider} rejected the API key: {body}")),
        _ => ChatError::ProviderRejected {
            provider,
            status: status.as_u16(),
            body,
        },
    }
}
