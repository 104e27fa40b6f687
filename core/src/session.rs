// core/src/session.rs
//! Host-facing orchestration for explicit open actions.

use std::sync::Arc;

use url::Url;
use uuid::Uuid;

use crate::classify::{is_github_host, page_kind_of_url};
use crate::errors::OpenError;
use crate::service::OpenTransport;
use crate::settings::{ServiceConfig, SettingsStore};
use crate::types::{OpenRequest, OpenResult, PageKind};

pub struct Session {
    settings: Arc<dyn SettingsStore>,
    transport: Arc<dyn OpenTransport>,
}

impl Session {
    pub fn new(settings: Arc<dyn SettingsStore>, transport: Arc<dyn OpenTransport>) -> Self {
        Self {
            settings,
            transport,
        }
    }

    /// Settings snapshot for this action. A failed read degrades to
    /// defaults rather than blocking the action.
    pub fn settings_snapshot(&self) -> ServiceConfig {
        match self.settings.load() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("settings load failed: {}, using defaults", e);
                ServiceConfig::default()
            }
        }
    }

    /// Parse and validate before any network call.
    pub fn validate_github_url(raw: &str) -> Result<Url, OpenError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(OpenError::Validation("empty input".to_string()));
        }
        // scheme-less paste like "github.com/acme/widgets" is accepted
        let url = match Url::parse(trimmed) {
            Ok(url) => url,
            Err(_) => Url::parse(&format!("https://{trimmed}"))
                .map_err(|_| OpenError::Validation(trimmed.to_string()))?,
        };
        if !is_github_host(&url) {
            return Err(OpenError::Validation(trimmed.to_string()));
        }
        Ok(url)
    }

    /// Open a GitHub URL in the configured IDE.
    pub async fn open_url(&self, raw: &str) -> Result<OpenResult, OpenError> {
        self.open_url_at(raw, None).await
    }

    /// Like [`open_url`](Self::open_url) with an optional line number hint.
    pub async fn open_url_at(
        &self,
        raw: &str,
        line: Option<u32>,
    ) -> Result<OpenResult, OpenError> {
        let url = Self::validate_github_url(raw)?;
        let kind = page_kind_of_url(&url);
        if kind == PageKind::Unknown {
            return Err(OpenError::UnknownPage(url.path().to_string()));
        }

        let cfg = self.settings_snapshot();
        let mut request = OpenRequest::new(url.to_string(), cfg.ide);
        request.line = line;

        let action_id = Uuid::new_v4();
        tracing::info!(%action_id, url = %request.url, kind = ?kind, "opening in IDE");
        let result = self.transport.perform_open(request).await;
        match &result {
            Ok(res) => tracing::info!(%action_id, path = ?res.path, "open succeeded"),
            Err(e) => tracing::warn!(%action_id, "open failed: {}", e),
        }
        Ok(result?)
    }

    /// Open from pasted or clipboard text.
    pub async fn open_from_clipboard(&self, text: &str) -> Result<OpenResult, OpenError> {
        if text.trim().is_empty() {
            return Err(OpenError::Validation("clipboard is empty".to_string()));
        }
        self.open_url(text).await
    }

    /// Open a pull request by `owner/repo` and number.
    pub async fn open_pull_request(
        &self,
        repo: &str,
        number: u32,
    ) -> Result<OpenResult, OpenError> {
        let repo = repo.trim().trim_matches('/');
        let mut parts = repo.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
                let url = format!("https://github.com/{owner}/{name}/pull/{number}");
                self.open_url(&url).await
            }
            _ => Err(OpenError::Validation(format!(
                "expected owner/repo, got {repo:?}"
            ))),
        }
    }

    pub fn transport(&self) -> Arc<dyn OpenTransport> {
        self.transport.clone()
    }
}
