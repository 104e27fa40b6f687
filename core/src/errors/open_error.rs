// core/src/errors/open_error.rs
use thiserror::Error;

use super::service_error::ServiceError;

/// Errors for a single explicit open action. None are retried.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("not a GitHub URL: {0}")]
    Validation(String),

    #[error("not a repository, directory, file, or pull request page: {0}")]
    UnknownPage(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}
