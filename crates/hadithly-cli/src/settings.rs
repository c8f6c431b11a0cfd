//! Display settings
//!
//! Presentation preferences persisted as TOML beside the config file.
//! The core never reads these: saved hadiths always keep every language
//! variant, and what to show is decided here at display time.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use hadithly_core::Language;

/// User-facing display settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Translation language shown alongside the Arabic text
    #[serde(default = "default_language")]
    pub language: Language,

    /// Save fetched hadiths automatically when viewing them
    #[serde(default = "default_true")]
    pub auto_save: bool,

    /// Show the Arabic text
    #[serde(default = "default_true")]
    pub show_arabic: bool,

    /// Show only the Arabic text, hiding translations
    #[serde(default)]
    pub pure_arabic: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: default_language(),
            auto_save: true,
            show_arabic: true,
            pure_arabic: false,
        }
    }
}

impl Settings {
    /// Load settings from the default location
    ///
    /// A missing file yields defaults.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::settings_file_path())
    }

    /// Load settings from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {:?}", path))
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::settings_file_path())
    }

    /// Save settings to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory: {:?}", parent))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings file: {:?}", path))?;
        Ok(())
    }

    /// Get the settings file path
    ///
    /// Can be overridden with the HADITHLY_SETTINGS environment variable
    pub fn settings_file_path() -> PathBuf {
        if let Ok(path) = std::env::var("HADITHLY_SETTINGS") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hadithly")
            .join("settings.toml")
    }
}

fn default_language() -> Language {
    Language::English
}

fn default_true() -> bool {
    true
}
