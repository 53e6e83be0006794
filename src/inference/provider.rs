use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during provider operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProviderError {
    /// Provider misconfigured (missing or placeholder API key).
    #[error("config error: {0}")]
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    #[error("network error: {0}")]
    Network(String),
    /// API returned an error response (quota, bad key, unknown model).
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
    /// Failed to parse the provider's response.
    #[error("parse error: {0}")]
    Parse(String),
    /// The response parsed but carried no usable text (blocked or empty).
    #[error("empty response: {0}")]
    EmptyResponse(String),
}

/// Everything a provider needs to produce one reply.
pub struct GenerationRequest<'a> {
    pub prompt: &'a str,
    pub model: &'a str,
}

/// The narrow contract the chat core depends on: prompt in, text out.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Whether the provider has a usable credential. Checked before any submission.
    fn is_configured(&self) -> bool;

    /// Generates a single reply for the assembled prompt.
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, ProviderError>;
}
