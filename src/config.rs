//! Persistent application configuration backed by `config.toml` under the
//! `.mammodesk` directory.
//!
//! The bearer token is never written here; it lives in the session token
//! store. The config keeps the non-secret half of the session so the app can
//! restore a signed-in profile on launch.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::{app_dirs, session::Profile};

/// Default filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Errors raised while loading or saving the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No suitable config directory available")]
    NoConfigDir,
    #[error("Failed to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config for {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
}

/// Where the backend lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Where exported archives are saved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Target directory for dataset archives; `None` means the platform
    /// Downloads folder.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
}

impl ExportSettings {
    /// Directory exports are written to, resolving the platform default
    /// when none is configured.
    pub fn resolved_download_dir(&self) -> Result<PathBuf, app_dirs::AppDirError> {
        match &self.download_dir {
            Some(dir) => Ok(dir.clone()),
            None => app_dirs::default_download_dir(),
        }
    }
}

/// Aggregate application configuration persisted as TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub export: ExportSettings,
    /// Profile of the last signed-in account, restored on launch when the
    /// token store still holds a matching token.
    #[serde(default)]
    pub profile: Option<Profile>,
}

impl AppConfig {
    /// Clamp loaded values into a usable shape: an unparsable base URL falls
    /// back to the default, trailing slashes are trimmed so route joining
    /// stays predictable.
    pub fn normalized(mut self) -> Self {
        let trimmed = self.backend.base_url.trim().trim_end_matches('/');
        self.backend.base_url = if trimmed.is_empty() || Url::parse(trimmed).is_err() {
            default_base_url()
        } else {
            trimmed.to_string()
        };
        self
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load configuration from disk, returning defaults if missing.
pub fn load_or_default() -> Result<AppConfig, ConfigError> {
    let path = config_path()?;
    load_from(&path)
}

fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text)
        .map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
        .map(AppConfig::normalized)
}

/// Persist configuration to disk, overwriting any previous contents.
pub fn save(config: &AppConfig) -> Result<(), ConfigError> {
    let path = config_path()?;
    save_to_path(config, &path)
}

/// Save configuration to a specific path, creating parent directories as needed.
pub fn save_to_path(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = toml::to_string_pretty(config).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, data).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn map_app_dir_error(error: app_dirs::AppDirError) -> ConfigError {
    match error {
        app_dirs::AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => ConfigError::CreateDir { path, source },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::UserRole;
    use tempfile::tempdir;

    fn with_config_home<T>(dir: &Path, f: impl FnOnce() -> T) -> T {
        let _guard = crate::app_dirs::ConfigBaseGuard::set(dir.to_path_buf());
        f()
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        with_config_home(dir.path(), || {
            let cfg = load_or_default().unwrap();
            assert_eq!(cfg.backend.base_url, DEFAULT_BASE_URL);
            assert_eq!(cfg.export.download_dir, None);
            assert!(cfg.profile.is_none());
        });
    }

    #[test]
    fn round_trips_profile_and_paths() {
        let dir = tempdir().unwrap();
        with_config_home(dir.path(), || {
            let cfg = AppConfig {
                backend: BackendSettings {
                    base_url: "https://api.clinic.test/v1".into(),
                },
                export: ExportSettings {
                    download_dir: Some(PathBuf::from("exports")),
                },
                profile: Some(Profile {
                    user_id: "u-7".into(),
                    name: "Ada".into(),
                    email: "ada@clinic.test".into(),
                    role: UserRole::Admin,
                }),
            };
            save(&cfg).unwrap();
            let loaded = load_or_default().unwrap();
            assert_eq!(loaded, cfg);
        });
    }

    #[test]
    fn trailing_slash_is_trimmed_on_load() {
        let dir = tempdir().unwrap();
        with_config_home(dir.path(), || {
            let path = config_path().unwrap();
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, "[backend]\nbase_url = \"https://api.clinic.test/v1/\"\n")
                .unwrap();
            let loaded = load_or_default().unwrap();
            assert_eq!(loaded.backend.base_url, "https://api.clinic.test/v1");
        });
    }

    #[test]
    fn invalid_base_url_falls_back_to_default() {
        let dir = tempdir().unwrap();
        with_config_home(dir.path(), || {
            let path = config_path().unwrap();
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, "[backend]\nbase_url = \"not a url\"\n").unwrap();
            let loaded = load_or_default().unwrap();
            assert_eq!(loaded.backend.base_url, DEFAULT_BASE_URL);
        });
    }

    #[test]
    fn configured_download_dir_wins_over_platform_default() {
        let settings = ExportSettings {
            download_dir: Some(PathBuf::from("/tmp/exports")),
        };
        assert_eq!(
            settings.resolved_download_dir().unwrap(),
            PathBuf::from("/tmp/exports")
        );
    }
}
