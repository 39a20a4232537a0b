use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::cache::DEFAULT_TTL_SECS;
use crate::overpass::{DEFAULT_ENDPOINTS, DEFAULT_QUERY_TIMEOUT_SECS};

pub const DEFAULT_RADIUS_M: u32 = 3000;
/// Nearby results older than a day are never worth serving.
pub const MAX_CACHE_TTL_SECS: u64 = 24 * 60 * 60;
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read or write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not valid settings JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid settings: {0}")]
    Invalid(&'static str),
}

/// Everything tunable about nearby lookups. Missing fields take defaults, so
/// a settings file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Overpass mirrors in the order they are tried.
    pub endpoints: Vec<String>,
    pub attempt_timeout_secs: u64,
    pub query_timeout_secs: u32,
    pub cache_ttl_secs: u64,
    pub default_radius_m: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            endpoints: DEFAULT_ENDPOINTS.iter().map(|url| url.to_string()).collect(),
            attempt_timeout_secs: 10,
            query_timeout_secs: DEFAULT_QUERY_TIMEOUT_SECS,
            cache_ttl_secs: DEFAULT_TTL_SECS,
            default_radius_m: DEFAULT_RADIUS_M,
        }
    }
}

impl Settings {
    /// `settings.json` in the platform config directory, if there is one.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "estate-nearby").map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    /// Reads the default settings file, or returns defaults when it is absent.
    pub fn load() -> Result<Self, SettingsError> {
        match Settings::default_path() {
            Some(path) if path.exists() => Settings::from_path(&path),
            _ => {
                debug!("no settings file, using defaults");
                Ok(Settings::default())
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, text).map_err(io_err)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.endpoints.is_empty() {
            return Err(SettingsError::Invalid("at least one overpass endpoint is required"));
        }
        if self.attempt_timeout_secs == 0 {
            return Err(SettingsError::Invalid("attempt_timeout_secs must be positive"));
        }
        if self.cache_ttl_secs == 0 {
            return Err(SettingsError::Invalid("cache_ttl_secs must be positive"));
        }
        if self.cache_ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(SettingsError::Invalid("cache_ttl_secs must be at most one day"));
        }
        Ok(())
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }

    /// Values past [`MAX_CACHE_TTL_SECS`] are clamped to it.
    pub fn cache_ttl(&self) -> chrono::Duration {
        let secs = self.cache_ttl_secs.min(MAX_CACHE_TTL_SECS);
        i64::try_from(secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or_else(|| chrono::Duration::seconds(DEFAULT_TTL_SECS as i64))
    }
}
