use std::fmt;

use async_trait::async_trait;

use super::types::{SearchAnswer, SearchRequest};

/// Errors that can occur during provider operations.
#[derive(Debug)]
pub enum ProviderError {
    /// Provider misconfigured (missing API key, bad URL).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// API returned an error response.
    Api { status: u16, message: String },
    /// Failed to parse the provider's response.
    Parse(String),
    /// The model answered with no text at all.
    EmptyResponse,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
            ProviderError::Network(msg) => write!(f, "network error: {msg}"),
            ProviderError::Api { message, .. } => write!(f, "{message}"),
            ProviderError::Parse(msg) => write!(f, "parse error: {msg}"),
            ProviderError::EmptyResponse => write!(f, "Empty response from Gemini server."),
        }
    }
}

impl std::error::Error for ProviderError {}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Answers a semantic search question.
    async fn search(&self, request: &SearchRequest) -> Result<SearchAnswer, ProviderError>;
}
