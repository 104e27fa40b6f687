// cli/src/notify.rs
//! Terminal rendering sink for action outcomes.

use repodock_core::errors::{OpenError, ServiceError};
use repodock_core::types::Status;

pub fn render(status: Status, message: &str) {
    match status {
        Status::Info => eprintln!("{message}"),
        Status::Success => println!("✅ {message}"),
        Status::Error => eprintln!("❌ {message}"),
    }
}

/// User guidance depends on what failed: a transport error means the
/// service is not running, a rejection means the request was bad.
pub fn render_open_error(error: &OpenError) {
    match error {
        OpenError::Service(ServiceError::Transport { url, .. }) => {
            render(
                Status::Error,
                &format!("Cannot connect to the repodock service at {url}."),
            );
            eprintln!("   Start it first, then rerun the command.");
        }
        OpenError::Validation(detail) => {
            render(Status::Error, &format!("Not a GitHub URL: {detail}"));
        }
        OpenError::UnknownPage(path) => {
            render(
                Status::Error,
                &format!("Unsupported GitHub page: {path} (expected a repository, file, directory, or pull request)"),
            );
        }
        other => render(Status::Error, &format!("Failed to open: {other}")),
    }
}
