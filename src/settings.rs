use crate::feed::DEFAULT_FEED_URL;
use crate::quake::Field;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub feed: FeedSettings,
    #[serde(default)]
    pub view: ViewSettings,
    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Deserialize)]
pub struct FeedSettings {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Deserialize)]
pub struct ViewSettings {
    #[serde(default = "default_x")]
    pub x_axis: Field,
    #[serde(default = "default_y")]
    pub y_axis: Field,
    #[serde(default = "default_scheme")]
    pub color_scheme: u8, // see colors::ColorState, 7 = mono
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            x_axis: default_x(),
            y_axis: default_y(),
            color_scheme: default_scheme(),
        }
    }
}

fn default_x() -> Field {
    Field::Magnitude
}

fn default_y() -> Field {
    Field::Depth
}

fn default_scheme() -> u8 {
    7
}

#[derive(Debug, Default, Deserialize)]
pub struct LogSettings {
    pub file: Option<PathBuf>,
}

impl Settings {
    /// Load from the user config dir. A missing file means defaults.
    pub fn load() -> Result<Self, SettingsError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quakeview")
            .join("config.toml")
    }

    pub fn default_log_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quakeview")
            .join("quakeview.log")
    }
}
