// core/src/errors/service_error.rs
use thiserror::Error;

/// Fallback detail when a rejection body carries no parseable `message`.
pub const GENERIC_REJECTION: &str = "Failed to open repository";

/// Errors from talking to the companion service.
///
/// `Transport` means the service is not reachable at all (start the service);
/// `Rejected` means it answered non-2xx (fix the request). Callers rely on
/// the distinction for user guidance, so never collapse the two.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("service unreachable at {url}")]
    Transport {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("decode/serde error")]
    Decode(#[source] anyhow::Error),
}

impl ServiceError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ServiceError::Transport { .. })
    }
}
