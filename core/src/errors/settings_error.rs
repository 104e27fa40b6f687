// core/src/errors/settings_error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings io error: {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("settings parse error: {path}")]
    Parse {
        path: String,
        #[source]
        source: anyhow::Error,
    },
}
