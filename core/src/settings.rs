// core/src/settings.rs
use serde::{Deserialize, Serialize};

use crate::errors::SettingsError;
use crate::types::PathMapping;

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:9527";
pub const DEFAULT_IDE: &str = "code";

/// Persisted settings. Owned by the host's store; the core reads a fresh
/// snapshot at action time so edits take effect without reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(rename = "serviceUrl", default = "default_service_url")]
    pub service_url: String,

    #[serde(default = "default_ide")]
    pub ide: String,

    /// Matched against repository identifiers in order; first match wins.
    /// Ordering must survive every edit.
    #[serde(rename = "pathMappings", default)]
    pub path_mappings: Vec<PathMapping>,
}

fn default_service_url() -> String {
    DEFAULT_SERVICE_URL.to_string()
}

fn default_ide() -> String {
    DEFAULT_IDE.to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            ide: default_ide(),
            path_mappings: Vec::new(),
        }
    }
}

/// Host-supplied persistence for [`ServiceConfig`].
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<ServiceConfig, SettingsError>;
    fn save(&self, config: &ServiceConfig) -> Result<(), SettingsError>;
}
