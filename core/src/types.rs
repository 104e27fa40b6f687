// core/src/types.rs
use serde::{Deserialize, Serialize};

/// Semantic classification of a GitHub URL path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageKind {
    Repository,
    Directory,
    File,
    PullRequest,
    Unknown,
}

/// Body of `POST /open`. Built fresh per invocation, never persisted.
///
/// Field names follow the companion service's wire format.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpenRequest {
    pub url: String,
    pub ide: String,
    #[serde(rename = "filePath", skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl OpenRequest {
    pub fn new(url: impl Into<String>, ide: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ide: ide.into(),
            file_path: None,
            line: None,
        }
    }
}

/// 2xx body of `POST /open`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct OpenResult {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

/// 2xx body of `GET /health`.
#[derive(Clone, Debug, Deserialize)]
pub struct HealthInfo {
    pub version: String,
}

/// One ordered rule translating a repository identifier pattern
/// ("owner", "owner/repo" or "*") to a local directory.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathMapping {
    pub pattern: String,
    #[serde(rename = "localPath")]
    pub local_path: String,
}

/// Outcome level rendered by a host (toast class, status bar color, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Info,
    Success,
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Info => "info",
            Status::Success => "success",
            Status::Error => "error",
        }
    }
}
