//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.psalter/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::SearchBackend;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PsalterConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub data_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SearchConfig {
    pub backend: Option<SearchBackend>,
    pub endpoint: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_SEARCH_ENDPOINT: &str = "http://127.0.0.1:3000/api/search";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub search_backend: SearchBackend,
    pub search_endpoint: String,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub bind: String,
    pub data_dir: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.psalter`.
pub fn psalter_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".psalter"))
}

/// Returns the path to `~/.psalter/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    psalter_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.psalter/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `PsalterConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<PsalterConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(PsalterConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(PsalterConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: PsalterConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# Psalter Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# data_dir = "/path/to/data"          # Load study tables from disk instead of the built-in copy

# [search]
# backend = "gemini"                   # "gemini" (direct) or "remote" (POST to endpoint)
# endpoint = "http://127.0.0.1:3000/api/search"

# [gemini]
# api_key = "..."                      # Or set GEMINI_API_KEY env var
# base_url = "https://generativelanguage.googleapis.com/v1beta"
# model = "gemini-3-flash-preview"

# [server]
# bind = "127.0.0.1:3000"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_backend` and `cli_bind` come from CLI flags (None = not specified).
pub fn resolve(
    config: &PsalterConfig,
    cli_backend: Option<SearchBackend>,
    cli_bind: Option<&str>,
) -> ResolvedConfig {
    // Backend: CLI → env → config → default
    let search_backend = cli_backend
        .or_else(|| {
            std::env::var("PSALTER_SEARCH_BACKEND")
                .ok()
                .and_then(|s| SearchBackend::parse(&s))
        })
        .or(config.search.backend)
        .unwrap_or_default();

    let search_endpoint = std::env::var("PSALTER_SEARCH_ENDPOINT")
        .ok()
        .or_else(|| config.search.endpoint.clone())
        .unwrap_or_else(|| DEFAULT_SEARCH_ENDPOINT.to_string());

    // API key: env → config
    let gemini_api_key = std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
        .or_else(|| config.gemini.api_key.clone());

    let gemini_base_url = std::env::var("GEMINI_BASE_URL")
        .ok()
        .or_else(|| config.gemini.base_url.clone())
        .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());

    let gemini_model = std::env::var("GEMINI_MODEL")
        .ok()
        .or_else(|| config.gemini.model.clone())
        .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

    // Bind: CLI → env → config → default
    let bind = cli_bind
        .map(str::to_string)
        .or_else(|| std::env::var("PSALTER_BIND").ok())
        .or_else(|| config.server.bind.clone())
        .unwrap_or_else(|| DEFAULT_BIND.to_string());

    let data_dir = std::env::var("PSALTER_DATA_DIR")
        .ok()
        .or_else(|| config.general.data_dir.clone())
        .map(PathBuf::from);

    ResolvedConfig {
        search_backend,
        search_endpoint,
        gemini_api_key,
        gemini_base_url,
        gemini_model,
        bind,
        data_dir,
    }
}
