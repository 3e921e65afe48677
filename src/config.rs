/// Client configuration
///
/// Stored as JSON in the user's config directory:
/// - Linux: ~/.config/photo-report/client.json
/// - macOS: ~/Library/Application Support/photo-report/client.json
/// - Windows: %APPDATA%\photo-report\client.json
///
/// `PHOTO_REPORT_SERVER` overrides the server URL for one run.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::state::data::SettingsForm;

const SERVER_ENV: &str = "PHOTO_REPORT_SERVER";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no config directory available")]
    NoConfigDir,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the report server
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Upper bound for a single request; unbounded when absent
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Last settings sent to the server, used to prefill the form
    #[serde(default)]
    pub settings: SettingsForm,
}

fn default_server_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            request_timeout_secs: None,
            settings: SettingsForm::default(),
        }
    }
}

impl ClientConfig {
    /// Where the config file lives on this platform
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("photo-report");
        path.push("client.json");
        Some(path)
    }

    /// Read a config file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the user's config, falling back to defaults on any problem
    pub fn load() -> Self {
        let config = match Self::default_path() {
            Some(path) => Self::load_from(&path).unwrap_or_else(|err| {
                tracing::warn!("using default config: {err}");
                Self::default()
            }),
            None => Self::default(),
        };
        config.with_server_override(std::env::var(SERVER_ENV).ok())
    }

    fn with_server_override(mut self, server: Option<String>) -> Self {
        if let Some(url) = server.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
            self.server_url = url;
        }
        self
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write to the user's config file
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }
}
