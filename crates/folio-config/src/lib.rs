//! # folio-config
//!
//! Layered configuration loading for Folio using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`FOLIO_*` prefix, `__` as separator)
//! 2. Project-level `.folio/config.toml`
//! 3. User-level `~/.config/folio/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `FOLIO_BACKEND__BASE_URL` -> `backend.base_url`,
//! `FOLIO_TIMEOUTS__CHAT_SECS` -> `timeouts.chat_secs`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use folio_config::FolioConfig;
//!
//! let config = FolioConfig::load_with_dotenv().expect("config");
//! println!("backend: {}", config.backend.base_url);
//! ```

mod backend;
mod error;
mod session;
mod timeouts;
mod upload;

pub use backend::BackendConfig;
pub use error::ConfigError;
pub use session::SessionConfig;
pub use timeouts::TimeoutConfig;
pub use upload::UploadConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FolioConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl FolioConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` support.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv()?;
        Self::load()
    }

    /// Export variables from the nearest `.env` file, if there is one.
    ///
    /// A missing file is fine; an unreadable or malformed one is an error.
    pub fn load_dotenv() -> Result<(), ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(()),
            Err(error) if error.not_found() => Ok(()),
            Err(error) => Err(error.into()),
        }
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests and the CLI can layer additional providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".folio/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("FOLIO_").split("__"))
    }

    /// Reject values no client could work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.base_url.trim().is_empty() {
            return Err(ConfigError::invalid("backend.base_url", "must not be empty"));
        }
        if !self.backend.has_http_scheme() {
            return Err(ConfigError::invalid(
                "backend.base_url",
                format!("'{}' is not an http(s) URL", self.backend.base_url),
            ));
        }
        for (field, secs) in [
            ("timeouts.upload_secs", self.timeouts.upload_secs),
            ("timeouts.chat_secs", self.timeouts.chat_secs),
            ("timeouts.probe_secs", self.timeouts.probe_secs),
            ("backend.connect_timeout_secs", self.backend.connect_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::invalid(field, "must be greater than zero"));
            }
        }
        if self.upload.max_bytes == 0 {
            return Err(ConfigError::invalid(
                "upload.max_bytes",
                "must be greater than zero",
            ));
        }
        if self.upload.accepted_extensions.is_empty() {
            return Err(ConfigError::invalid(
                "upload.accepted_extensions",
                "must list at least one extension",
            ));
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("folio").join("config.toml"))
    }
}
