//! Psalter library exports for testing

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod core;
pub mod inference;
pub mod server;
pub mod tools;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Where semantic search questions are sent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchBackend {
    /// Call the Gemini API directly.
    #[default]
    Gemini,
    /// POST to a running `psalter serve` endpoint.
    Remote,
}

impl SearchBackend {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Some(SearchBackend::Gemini),
            "remote" => Some(SearchBackend::Remote),
            _ => None,
        }
    }
}
