//! Application configuration
//!
//! Defaults, overlaid by the config file, overlaid by environment. The file
//! lives at `~/.config/hadithly/config.toml` unless `HADITHLY_CONFIG` points
//! elsewhere; `HADITHLY_DATA_DIR` and `HADITHLY_API_BASE_URL` override
//! individual values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default base URL for remote hadith editions
pub const DEFAULT_API_BASE_URL: &str =
    "https://cdn.jsdelivr.net/gh/fawazahmed0/hadith-api@1/editions";

const ENV_CONFIG: &str = "HADITHLY_CONFIG";
const ENV_DATA_DIR: &str = "HADITHLY_DATA_DIR";
const ENV_API_BASE_URL: &str = "HADITHLY_API_BASE_URL";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the SQLite database
    pub data_dir: PathBuf,
    /// Base URL of the remote hadith editions API
    pub api_base_url: String,
}

/// What the config file may specify; anything absent keeps its default
#[derive(Debug, Default, Deserialize)]
struct Overlay {
    data_dir: Option<PathBuf>,
    api_base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hadithly");
        Self {
            data_dir,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration: defaults, then the config file, then environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific file, still honoring environment
    ///
    /// A missing file is not an error; the defaults apply.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let overlay = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("could not read config file {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("could not parse config file {}", path.display()))?
        } else {
            Overlay::default()
        };

        let mut config = Self::default().merged(overlay);
        config.apply_env();
        Ok(config)
    }

    /// Parse configuration from a TOML string, still honoring environment
    pub fn load_from_str(content: &str) -> Result<Self> {
        let overlay: Overlay = toml::from_str(content).context("could not parse config TOML")?;
        let mut config = Self::default().merged(overlay);
        config.apply_env();
        Ok(config)
    }

    fn merged(mut self, overlay: Overlay) -> Self {
        if let Some(data_dir) = overlay.data_dir {
            self.data_dir = data_dir;
        }
        if let Some(api_base_url) = overlay.api_base_url {
            self.api_base_url = api_base_url;
        }
        self
    }

    fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
            if !dir.is_empty() {
                self.data_dir = PathBuf::from(dir);
            }
        }
        if let Ok(url) = std::env::var(ENV_API_BASE_URL) {
            if !url.is_empty() {
                self.api_base_url = url;
            }
        }
    }

    /// Write this configuration to the config file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("could not create config directory {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("could not serialize config")?;
        std::fs::write(&path, content)
            .with_context(|| format!("could not write config file {}", path.display()))
    }

    /// Path of the config file, `HADITHLY_CONFIG` taking precedence
    pub fn config_file_path() -> PathBuf {
        match std::env::var(ENV_CONFIG) {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("hadithly")
                .join("config.toml"),
        }
    }

    /// Path of the SQLite database inside the data directory
    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join("hadithly.db")
    }
}
