//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::library::Library;
use crate::core::preferences::Theme;
use crate::core::selection::Selection;
use crate::core::state::App;
use crate::core::text::TokenId;
use crate::inference::{ProviderError, SearchAnswer, SearchProvider, SearchRequest};

/// A provider that returns a canned answer, or fails with an API error.
pub struct StubProvider {
    pub answer: Option<SearchAnswer>,
}

impl StubProvider {
    pub fn answering(explanation: &str, verse_ids: Vec<u32>) -> Self {
        Self {
            answer: Some(SearchAnswer {
                explanation: explanation.to_string(),
                verse_ids,
            }),
        }
    }

    pub fn failing() -> Self {
        Self { answer: None }
    }
}

#[async_trait]
impl SearchProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn search(&self, _request: &SearchRequest) -> Result<SearchAnswer, ProviderError> {
        self.answer.clone().ok_or(ProviderError::Api {
            status: 503,
            message: "stub unavailable".to_string(),
        })
    }
}

pub fn test_library() -> Arc<Library> {
    Arc::new(Library::embedded().expect("embedded data parses"))
}

/// Creates a test App over the bundled psalm with a StubProvider.
pub fn test_app() -> App {
    App::new(
        test_library(),
        Some(Arc::new(StubProvider::answering("Вірш 3", vec![3]))),
        Theme::Dark,
    )
}

pub fn test_app_without_provider() -> App {
    App::new(test_library(), None, Theme::Dark)
}

/// Word selection for a token of the bundled psalm, without coordinates.
pub fn word_selection(app: &App, id: TokenId) -> Selection {
    let token = app.psalm().token(id).expect("token exists");
    Selection::Word {
        id,
        text: token.text.clone(),
        anchor_key: token.anchor_key.clone(),
        coordinates: None,
    }
}
