use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use access_core::{AccessibilityMode, ParseModeError, SignLookup, DEFAULT_SIGN_LOOKUP};
use access_engine::{AtomicFileWriter, PersistError, ServiceSettings, DEFAULT_ENDPOINT};
use client_logging::{client_info, client_warn};
use serde::{Deserialize, Serialize};

use super::cli::Cli;

pub const SETTINGS_FILENAME: &str = "access_client.ron";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings from {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("failed to serialize settings: {0}")]
    Serialize(String),
    #[error("failed to write settings: {0}")]
    Write(#[from] PersistError),
    #[error(transparent)]
    Mode(#[from] ParseModeError),
    #[error("{field} must be at least one second")]
    ZeroTimeout { field: &'static str },
    #[error("invalid sign lookup base '{base}': {source}")]
    SignLookup {
        base: String,
        source: access_core::SignLookupError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub endpoint: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_bundle_mib: u64,
    pub sign_lookup: String,
    pub bundle_dir: PathBuf,
    pub mode: String,
}

impl Default for Settings {
    fn default() -> Self {
        let service = ServiceSettings::default();
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: service.request_timeout.as_secs(),
            connect_timeout_secs: service.connect_timeout.as_secs(),
            max_bundle_mib: service.max_bundle_bytes / (1024 * 1024),
            sign_lookup: DEFAULT_SIGN_LOOKUP.to_string(),
            bundle_dir: PathBuf::from("bundles"),
            mode: AccessibilityMode::Default.name().to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from `explicit` when given (it must exist), otherwise from
    /// `./access_client.ron` when present. A broken default file falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        match explicit {
            Some(path) => Self::read(path),
            None => {
                let path = PathBuf::from(SETTINGS_FILENAME);
                if !path.exists() {
                    return Ok(Self::default());
                }
                match Self::read(&path) {
                    Ok(settings) => Ok(settings),
                    Err(err) => {
                        client_warn!("Ignoring settings file: {}", err);
                        Ok(Self::default())
                    }
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = ron::from_str(&content).map_err(|err| SettingsError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        client_info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<PathBuf, SettingsError> {
        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(self, pretty)
            .map_err(|err| SettingsError::Serialize(err.to_string()))?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(SETTINGS_FILENAME);
        Ok(AtomicFileWriter::new(dir).write(filename, content.as_bytes())?)
    }

    /// Command-line flags win over the file.
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(endpoint) = &cli.endpoint {
            self.endpoint = endpoint.clone();
        }
        if let Some(secs) = cli.timeout_secs {
            self.request_timeout_secs = secs;
        }
        if let Some(dir) = &cli.bundle_dir {
            self.bundle_dir = dir.clone();
        }
        if let Some(mode) = cli.mode {
            self.mode = mode.name().to_string();
        }
    }

    /// A zero timeout would fail every request at once, so it is refused.
    pub fn service_settings(&self) -> Result<ServiceSettings, SettingsError> {
        if self.request_timeout_secs == 0 {
            return Err(SettingsError::ZeroTimeout {
                field: "request_timeout_secs",
            });
        }
        if self.connect_timeout_secs == 0 {
            return Err(SettingsError::ZeroTimeout {
                field: "connect_timeout_secs",
            });
        }
        Ok(ServiceSettings {
            endpoint: self.endpoint.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bundle_bytes: self.max_bundle_mib.saturating_mul(1024 * 1024),
        })
    }

    pub fn accessibility_mode(&self) -> Result<AccessibilityMode, SettingsError> {
        Ok(self.mode.parse()?)
    }

    pub fn sign_lookup(&self) -> Result<SignLookup, SettingsError> {
        SignLookup::new(&self.sign_lookup).map_err(|source| SettingsError::SignLookup {
            base: self.sign_lookup.clone(),
            source,
        })
    }
}
