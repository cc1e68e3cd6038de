//! Application configuration
//!
//! Loaded once at startup from `config.json` in the user's config directory:
//! - Linux: ~/.config/guest-gallery/config.json
//! - macOS: ~/Library/Application Support/guest-gallery/config.json
//! - Windows: %APPDATA%\guest-gallery\config.json
//!
//! Every field has a default, so a missing file (or a partial one) is fine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{GalleryError, Result};
use crate::widget::WidgetConfig;

/// Environment variable that overrides `service.public_key`
pub const PUBLIC_KEY_ENV: &str = "GUEST_GALLERY_PUBLIC_KEY";

/// Connection details for the hosted file service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Public project key, sent with every listing and upload request
    pub public_key: String,
    /// REST API base used for the file listing
    pub api_base: String,
    /// Upload API base
    pub upload_base: String,
    /// CDN host serving the uploaded files
    pub cdn_host: String,
    /// Scheme used in the `Authorization` header
    pub auth_scheme: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            public_key: "demopublickey".to_string(),
            api_base: "https://api.uploadcare.com".to_string(),
            upload_base: "https://upload.uploadcare.com".to_string(),
            cdn_host: "ucarecdn.com".to_string(),
            auth_scheme: "Uploadcare.Simple".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    /// Generic uploader (file picker + drag-drop)
    pub uploader: WidgetConfig,
    /// Camera-only entry
    pub camera: WidgetConfig,
    /// One of `error`, `warn`, `info`, `debug`, `trace`
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            uploader: WidgetConfig::uploader(),
            camera: WidgetConfig::camera(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults when it does not exist.
    /// The public key environment override is applied afterwards.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        let config = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            Self::from_json(&raw)?
        } else {
            Self::default()
        };

        Ok(config.with_env_overrides())
    }

    /// Apply environment overrides on top of this config
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(PUBLIC_KEY_ENV) {
            self.apply_public_key(&key);
        }
        self
    }

    /// Parse a config document
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| GalleryError::Config(format!("invalid config.json: {}", e)))
    }

    /// Override the public key, ignoring blank values
    pub fn apply_public_key(&mut self, key: &str) {
        let key = key.trim();
        if !key.is_empty() {
            self.service.public_key = key.to_string();
        }
    }

    /// Where the config file lives
    pub fn path() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| GalleryError::Config("could not determine config directory".into()))?;

        path.push("guest-gallery");
        path.push("config.json");
        Ok(path)
    }

    /// The configured log level, `Info` when unrecognised
    pub fn log_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
