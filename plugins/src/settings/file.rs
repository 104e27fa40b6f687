// plugins/src/settings/file.rs
//! JSON-file settings store, `~/.repodock/settings.json` by default.

use std::fs;
use std::path::{Path, PathBuf};

use repodock_core::errors::SettingsError;
use repodock_core::settings::{ServiceConfig, SettingsStore};

pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at an explicit path; `~` is expanded.
    pub fn at(path: &str) -> Self {
        Self::new(shellexpand::tilde(path).into_owned())
    }

    /// Store at the default location under the home directory.
    pub fn default_location() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(home.join(".repodock").join("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> SettingsError {
        SettingsError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<ServiceConfig, SettingsError> {
        if !self.path.exists() {
            return Ok(ServiceConfig::default());
        }
        let data = fs::read_to_string(&self.path).map_err(|e| self.io_err(e))?;
        serde_json::from_str(&data).map_err(|e| SettingsError::Parse {
            path: self.path.display().to_string(),
            source: e.into(),
        })
    }

    fn save(&self, config: &ServiceConfig) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        let data = serde_json::to_string_pretty(config).map_err(|e| SettingsError::Parse {
            path: self.path.display().to_string(),
            source: e.into(),
        })?;
        fs::write(&self.path, data).map_err(|e| self.io_err(e))
    }
}
