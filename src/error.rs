use thiserror::Error;

/// Error types that can occur when loading configuration or talking to a
/// chat provider.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Invalid or missing API key
    #[error("Auth error: {0}")]
    Auth(String),
    /// Transport-level failure (DNS, TLS, timeout, connection reset)
    #[error("Network error: {0}")]
    Network(String),
    /// Non-success response from the provider, including safety-filtered
    /// replies that carry no usable completion
    #[error("{provider} rejected the request (HTTP {status}): {body}")]
    ProviderRejected {
        provider: &'static str,
        status: u16,
        body: String,
    },
    /// Successful status but an undecodable response body
    #[error("Response format error: {message}. Raw response: {raw_response}")]
    ResponseFormat {
        message: String,
        raw_response: String,
    },
    /// No credential is stored for the active provider
    #[error("No API key is set for the active provider")]
    NotConfigured,
    /// Writing the configuration file failed
    #[error("Could not save configuration: {0}")]
    ConfigWrite(String),
    /// Provider identifier outside the supported set
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
}

/// Converts reqwest transport errors into ChatErrors
impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::Network(err.to_string())
    }
}
