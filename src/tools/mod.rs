//! # Data Tools
//!
//! One-shot subcommands that prepare or inspect data outside the reader.
//!
//! - [`scrape`]: fetches Ukrainian texts for the English cross references
//! - [`colors`]: counts hex colour literals on a web page

use std::fmt;
use std::path::PathBuf;

pub mod colors;
pub mod scrape;

/// Errors shared by the data tools.
#[derive(Debug)]
pub enum ToolError {
    Io { path: PathBuf, source: std::io::Error },
    Json(serde_json::Error),
    Http(reqwest::Error),
    Status { url: String, status: u16 },
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            ToolError::Json(e) => write!(f, "invalid JSON: {e}"),
            ToolError::Http(e) => write!(f, "request failed: {e}"),
            ToolError::Status { url, status } => write!(f, "{url} answered {status}"),
        }
    }
}

impl std::error::Error for ToolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ToolError::Io { source, .. } => Some(source),
            ToolError::Json(e) => Some(e),
            ToolError::Http(e) => Some(e),
            ToolError::Status { .. } => None,
        }
    }
}

impl From<reqwest::Error> for ToolError {
    fn from(e: reqwest::Error) -> Self {
        ToolError::Http(e)
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(e: serde_json::Error) -> Self {
        ToolError::Json(e)
    }
}
