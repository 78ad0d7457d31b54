//! Theme preference: the one piece of state that survives a restart.
//!
//! Stored as a small JSON document (`{"theme":"dark"}`) at `PREFERENCES_PATH`.

pub mod handlers;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
}

/// File-backed preference store. Reads once at startup; every change rewrites the file.
#[derive(Clone)]
pub struct PreferenceStore {
    path: PathBuf,
    current: Arc<Mutex<Preferences>>,
}

impl PreferenceStore {
    /// Loads preferences from `path`. A missing or unreadable file yields defaults.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let preferences = match read_preferences(&path).await {
            Ok(Some(p)) => {
                info!(path = %path.display(), theme = ?p.theme, "preferences loaded");
                p
            }
            Ok(None) => Preferences::default(),
            Err(e) => {
                warn!(path = %path.display(), "ignoring unreadable preferences: {e:#}");
                Preferences::default()
            }
        };
        Self {
            path,
            current: Arc::new(Mutex::new(preferences)),
        }
    }

    pub async fn theme(&self) -> Theme {
        self.current.lock().await.theme
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<Theme> {
        let mut current = self.current.lock().await;
        let updated = Preferences { theme };
        write_preferences(&self.path, &updated).await?;
        *current = updated;
        Ok(theme)
    }

    pub async fn toggle_theme(&self) -> Result<Theme> {
        let mut current = self.current.lock().await;
        let updated = Preferences {
            theme: current.theme.toggled(),
        };
        write_preferences(&self.path, &updated).await?;
        *current = updated;
        Ok(updated.theme)
    }
}

async fn read_preferences(path: &Path) -> Result<Option<Preferences>> {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).context("failed to read preferences file"),
    };
    let preferences = serde_json::from_slice(&raw).context("preferences file is not valid JSON")?;
    Ok(Some(preferences))
}

async fn write_preferences(path: &Path, preferences: &Preferences) -> Result<()> {
    let body = serde_json::to_vec_pretty(preferences)?;
    tokio::fs::write(path, body)
        .await
        .with_context(|| format!("failed to write preferences to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_defaults_to_light() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::load(dir.path().join("prefs.json")).await;
        assert_eq!(store.theme().await, Theme::Light);
    }

    #[tokio::test]
    async fn test_theme_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let store = PreferenceStore::load(&path).await;
        store.set_theme(Theme::Dark).await.unwrap();

        let reloaded = PreferenceStore::load(&path).await;
        assert_eq!(reloaded.theme().await, Theme::Dark);
    }

    #[tokio::test]
    async fn test_toggle_flips_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let store = PreferenceStore::load(&path).await;

        assert_eq!(store.toggle_theme().await.unwrap(), Theme::Dark);
        assert_eq!(store.toggle_theme().await.unwrap(), Theme::Light);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"light\""));
    }

    #[tokio::test]
    async fn test_corrupt_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = PreferenceStore::load(&path).await;
        assert_eq!(store.theme().await, Theme::Light);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_theme() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("prefs.json");
        let store = PreferenceStore::load(&path).await;

        assert!(store.set_theme(Theme::Dark).await.is_err());
        assert_eq!(store.theme().await, Theme::Light);
    }
}
