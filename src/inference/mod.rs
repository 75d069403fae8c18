pub mod provider;
pub mod providers;
pub mod types;

use std::sync::Arc;

use crate::SearchBackend;
use crate::core::config::ResolvedConfig;

pub use provider::{ProviderError, SearchProvider};
pub use providers::{GeminiProvider, RemoteSearchProvider};
pub use types::{SearchAnswer, SearchRequest};

/// Build the provider the resolved config asks for. `None` when the Gemini
/// backend is selected but no API key is configured.
pub fn build_provider(config: &ResolvedConfig) -> Option<Arc<dyn SearchProvider>> {
    match config.search_backend {
        SearchBackend::Remote => Some(Arc::new(RemoteSearchProvider::new(
            config.search_endpoint.clone(),
        ))),
        SearchBackend::Gemini => build_gemini(config),
    }
}

/// Gemini provider from the resolved config, if an API key is set.
pub fn build_gemini(config: &ResolvedConfig) -> Option<Arc<dyn SearchProvider>> {
    let api_key = config.gemini_api_key.clone()?;
    Some(Arc::new(GeminiProvider::new(
        api_key,
        Some(config.gemini_base_url.clone()),
        Some(config.gemini_model.clone()),
    )))
}
