//! # Preferences
//!
//! Appearance settings chosen in the Settings tab, persisted to
//! `~/.psalter/preferences.json`. Writes use atomic rename (write `.tmp`,
//! then `rename()`).

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::config::psalter_dir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Світла",
            Theme::Dark => "Темна",
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
}

pub fn preferences_path() -> Option<PathBuf> {
    psalter_dir().map(|d| d.join("preferences.json"))
}

/// Load preferences, falling back to defaults when the file is missing or
/// unreadable.
pub fn load_preferences() -> Preferences {
    match preferences_path() {
        Some(path) => load_from(&path),
        None => Preferences::default(),
    }
}

pub fn load_from(path: &Path) -> Preferences {
    match fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!("Ignoring malformed preferences {}: {}", path.display(), e);
            Preferences::default()
        }),
        Err(e) => {
            debug!("No preferences at {}: {}", path.display(), e);
            Preferences::default()
        }
    }
}

pub fn save_preferences(prefs: &Preferences) -> io::Result<()> {
    let path = preferences_path()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    save_to(&path, prefs)
}

/// Atomically write preferences as JSON (via `.tmp` + rename).
pub fn save_to(path: &Path, prefs: &Preferences) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(prefs)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("psalter-prefs-{}-{}", std::process::id(), name))
            .join("preferences.json")
    }

    #[test]
    fn default_theme_is_dark() {
        assert_eq!(Preferences::default().theme, Theme::Dark);
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("roundtrip");
        let prefs = Preferences { theme: Theme::Light };
        save_to(&path, &prefs).unwrap();
        assert_eq!(load_from(&path), prefs);
        assert!(!path.with_extension("tmp").exists());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn malformed_file_falls_back_to_default() {
        let path = temp_path("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();
        assert_eq!(load_from(&path), Preferences::default());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn theme_serializes_lowercase() {
        let json = serde_json::to_string(&Preferences { theme: Theme::Light }).unwrap();
        assert_eq!(json, r#"{"theme":"light"}"#);
    }
}
