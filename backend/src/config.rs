//! Service configuration.
//!
//! Built once at startup and handed to whatever needs it. Two sources:
//! - `ENVIRONMENT=DEV`: `config.toml` in the working directory, which must exist
//! - otherwise: the `APP_PORT` and `STORE_URL` environment variables
//!
//! Unset values fall back to [`AppConfig::default`].

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config file read in the DEV run mode, relative to the working directory
pub const CONFIG_FILE: &str = "config.toml";

/// Value of `ENVIRONMENT` selecting the config file
pub const DEV_ENVIRONMENT: &str = "DEV";

pub const DEFAULT_PORT: u16 = 8001;
pub const DEFAULT_STORE_URL: &str = "sqlite:accounts.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {0} not found")]
    MissingFile(PathBuf),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] figment::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listen port
    pub app_port: u16,
    /// Connection string of the account store
    pub store_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_port: DEFAULT_PORT,
            store_url: DEFAULT_STORE_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load the configuration for the run mode named by `ENVIRONMENT`
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("ENVIRONMENT").ok();
        Self::load_for(run_mode.as_deref(), Path::new(CONFIG_FILE))
    }

    pub fn load_for(run_mode: Option<&str>, config_file: &Path) -> Result<Self, ConfigError> {
        let figment = Figment::from(Serialized::defaults(AppConfig::default()));

        let figment = if run_mode == Some(DEV_ENVIRONMENT) {
            if !config_file.is_file() {
                return Err(ConfigError::MissingFile(config_file.to_path_buf()));
            }
            figment.merge(Toml::file(config_file))
        } else {
            // Env keys come through lowercased, matching the field names
            figment.merge(Env::raw().only(&["APP_PORT", "STORE_URL"]))
        };

        Ok(figment.extract()?)
    }
}
