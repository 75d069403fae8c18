use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A semantic search question plus the text it should be answered from.
///
/// This is also the wire format of `POST /api/search`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub context: String,
}

/// The model's answer: which verses relate to the question, and why.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchAnswer {
    /// A brief explanation of where the idea is found.
    #[serde(default)]
    pub explanation: String,
    /// List of verse numbers that match.
    #[serde(rename = "verseIds", default)]
    pub verse_ids: Vec<u32>,
}

/// Prompt sent to the model for a semantic search.
pub fn build_prompt(request: &SearchRequest) -> String {
    format!(
        "Context (Psalm 1):\n{}\n\nUser Question: \"{}\"\n\nTask: Find the verses in the provided text that answer the question or relate to the idea. Explain why briefly.",
        request.context, request.query
    )
}

/// JSON schema for `SearchAnswer`, trimmed to the keywords the structured
/// output endpoint accepts.
pub fn answer_schema() -> serde_json::Value {
    let mut schema = serde_json::to_value(schemars::schema_for!(SearchAnswer))
        .unwrap_or_else(|_| serde_json::json!({ "type": "object" }));
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
        obj.remove("title");
    }
    schema
}

/// Strip a surrounding markdown code fence (```json ... ```) from model output.
pub fn strip_json_fence(raw: &str) -> &str {
    let mut s = raw.trim();
    if let Some(rest) = s.strip_prefix("```json") {
        s = rest;
    } else if let Some(rest) = s.strip_prefix("```") {
        s = rest;
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest;
    }
    s.trim()
}
