//! Application settings persistence
//!
//! Stores user preferences in the platform-specific config folder:
//! - Linux: ~/.config/s3-navigator/settings.json
//! - Windows: %APPDATA%/s3-navigator/config/settings.json
//! - macOS: ~/Library/Application Support/org.s3-navigator.s3-navigator/settings.json

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::bookmarks::Bookmarks;

pub const DEFAULT_SIDEBAR_WIDTH: u32 = 250;
pub const MIN_SIDEBAR_WIDTH: u32 = 150;
pub const MAX_SIDEBAR_WIDTH: u32 = 600;

pub const DEFAULT_MAX_TABS: usize = 10;
pub const MAX_TABS_LIMIT: usize = 50;

/// Preferences that persist between sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Bookmarks sidebar width in pixels
    pub sidebar_width: u32,

    /// Tab limit applied to each pane
    pub max_tabs_per_pane: usize,

    pub bookmarks: Bookmarks,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sidebar_width: DEFAULT_SIDEBAR_WIDTH,
            max_tabs_per_pane: DEFAULT_MAX_TABS,
            bookmarks: Bookmarks::default(),
        }
    }
}

impl Settings {
    /// Load settings from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_path()?)
    }

    /// Load settings from `path`, returning defaults if the file doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("Settings file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;

        let mut settings: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings from {:?}", path))?;
        settings.clamp();

        tracing::info!(
            "Loaded settings: sidebar_width={}, max_tabs={}, bookmarks={}",
            settings.sidebar_width,
            settings.max_tabs_per_pane,
            settings.bookmarks.len()
        );

        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;

        fs::write(path, contents).with_context(|| format!("Failed to write settings to {:?}", path))?;

        tracing::debug!("Saved settings to {:?}", path);

        Ok(())
    }

    /// Get the path to the settings file
    pub fn settings_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "s3-navigator", "s3-navigator")
            .context("Failed to determine settings directory")?;

        Ok(proj_dirs.config_dir().join("settings.json"))
    }

    pub fn set_sidebar_width(&mut self, width: u32) {
        self.sidebar_width = width.clamp(MIN_SIDEBAR_WIDTH, MAX_SIDEBAR_WIDTH);
    }

    pub fn set_max_tabs(&mut self, max_tabs: usize) {
        self.max_tabs_per_pane = max_tabs.clamp(1, MAX_TABS_LIMIT);
    }

    /// Pull hand-edited values back into range
    fn clamp(&mut self) {
        self.set_sidebar_width(self.sidebar_width);
        self.set_max_tabs(self.max_tabs_per_pane);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.sidebar_width, 250);
        assert_eq!(settings.max_tabs_per_pane, 10);
        assert!(settings.bookmarks.is_empty());
    }

    #[test]
    fn test_setters_clamp() {
        let mut settings = Settings::default();
        settings.set_sidebar_width(20);
        assert_eq!(settings.sidebar_width, 150);
        settings.set_sidebar_width(9000);
        assert_eq!(settings.sidebar_width, 600);

        settings.set_max_tabs(0);
        assert_eq!(settings.max_tabs_per_pane, 1);
        settings.set_max_tabs(500);
        assert_eq!(settings.max_tabs_per_pane, 50);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = Settings::default();
        settings.set_sidebar_width(320);
        settings.bookmarks.add("data-bucket", "exports/");
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = Settings::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(Settings::load_from(&path).is_err());
    }

    #[test]
    fn test_partial_file_fills_defaults_and_clamps() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"max_tabs_per_pane": 999}"#).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.max_tabs_per_pane, 50);
        assert_eq!(loaded.sidebar_width, 250);
    }

    #[test]
    fn test_empty_json() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_legacy_bookmarks_in_file() {
        let json = r#"{"bookmarks": [{"name": "legacy", "addedAt": "2023-05-01T10:00:00Z"}]}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert!(settings.bookmarks.contains("legacy", ""));
    }
}
