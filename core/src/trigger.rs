// core/src/trigger.rs
//! Trigger control lifecycle: creation, idempotent re-injection and the
//! activation flow with its transient status notification.

use std::time::Duration;

use url::Url;

use crate::anchor;
use crate::classify::classify;
use crate::dom::{Dom, ElementSpec, NodeId};
use crate::errors::{OpenError, ServiceError};
use crate::session::Session;
use crate::types::{OpenResult, PageKind, Status};

/// Unique marker class; at most one control carrying it may exist.
pub const CONTROL_MARKER: &str = "repodock-open-btn";
/// Extra class for the fixed-position overlay fallback.
pub const CONTROL_FIXED: &str = "repodock-open-btn-fixed";
pub const NOTIFICATION_MARKER: &str = "repodock-notification";
/// Added to a notification when its dismissal fade starts.
pub const NOTIFICATION_FADING: &str = "repodock-notification-fading";

pub const CONTROL_LABEL: &str = "Open in IDE";
pub const CONTROL_TOOLTIP: &str = "Open in local IDE with repodock";
pub const CONTROL_ICON: &str = "octicon-code";

/// Notifications auto-dismiss after this interval, with a short fade.
pub const NOTIFY_DISMISS: Duration = Duration::from_secs(3);
pub const NOTIFY_FADE: Duration = Duration::from_millis(300);

/// What an injection pass did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InjectOutcome {
    /// Page kind is `Unknown`; nothing to do.
    Skipped,
    /// A control with the marker already exists.
    AlreadyPresent,
    /// Inserted at a resolved anchor.
    Anchored,
    /// No anchor matched; inserted as a fixed overlay.
    Fallback,
}

pub struct TriggerController {
    session: Session,
}

impl TriggerController {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Run one injection pass for the current page; accepts a full URL or
    /// a bare path. Safe to call repeatedly; the marker check keeps the
    /// control single-instance.
    pub fn ensure_injected(&self, dom: &mut dyn Dom, location: &str) -> InjectOutcome {
        let path = match Url::parse(location) {
            Ok(url) => url.path().to_string(),
            Err(_) => location.to_string(),
        };
        let kind = classify(&path);
        if kind == PageKind::Unknown {
            return InjectOutcome::Skipped;
        }
        if dom.contains_class(CONTROL_MARKER) {
            return InjectOutcome::AlreadyPresent;
        }

        match anchor::resolve(dom, kind) {
            Some(point) => {
                dom.insert(point, control_spec());
                tracing::debug!(kind = ?kind, "trigger control anchored");
                InjectOutcome::Anchored
            }
            None => {
                dom.append_body(control_spec().class(CONTROL_FIXED));
                tracing::debug!(kind = ?kind, "no anchor matched, using fixed fallback");
                InjectOutcome::Fallback
            }
        }
    }

    /// Activation: open `url` and render the outcome as a notification.
    /// Used by both the control's click handler and the keyboard shortcut,
    /// so it works even when injection never succeeded.
    pub async fn activate(&self, dom: &mut dyn Dom, url: &str) -> Result<OpenResult, OpenError> {
        show_notification(dom, Status::Info, "Opening in IDE...");
        match self.session.open_url(url).await {
            Ok(result) => {
                show_notification(dom, Status::Success, "Opened successfully!");
                Ok(result)
            }
            Err(e) => {
                show_notification(dom, Status::Error, &activation_message(&e));
                Err(e)
            }
        }
    }

    /// Like [`activate`](Self::activate), then drives the outcome
    /// notification through its fade and removal before returning.
    pub async fn activate_and_dismiss(
        &self,
        dom: &mut dyn Dom,
        url: &str,
    ) -> Result<OpenResult, OpenError> {
        let result = self.activate(dom, url).await;
        if let Some(node) = dom.query(&format!(".{NOTIFICATION_MARKER}")) {
            dismiss_after(dom, node).await;
        }
        result
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

/// `Shift+O` opens the current page regardless of injection state.
pub fn matches_shortcut(shift: bool, key: &str) -> bool {
    shift && key == "O"
}

fn control_spec() -> ElementSpec {
    ElementSpec::new("button")
        .class("btn")
        .class("btn-sm")
        .class(CONTROL_MARKER)
        .text(CONTROL_LABEL)
        .title(CONTROL_TOOLTIP)
        .icon(CONTROL_ICON)
}

/// Replace any prior notification, then insert the new one. The visible
/// status is last-write-wins; in-flight requests still run to completion.
/// The returned handle feeds [`dismiss_after`].
pub fn show_notification(dom: &mut dyn Dom, status: Status, message: &str) -> NodeId {
    dom.remove_all(NOTIFICATION_MARKER);
    dom.append_body(
        ElementSpec::new("div")
            .class(NOTIFICATION_MARKER)
            .class(format!("{}-{}", NOTIFICATION_MARKER, status.as_str()))
            .text(message),
    )
}

/// Drive one notification through its dismissal: apply
/// [`NOTIFICATION_FADING`] after [`NOTIFY_DISMISS`], detach the node after
/// [`NOTIFY_FADE`]. A handle made stale by a replacing notification is
/// left alone.
pub async fn dismiss_after(dom: &mut dyn Dom, node: NodeId) {
    tokio::time::sleep(NOTIFY_DISMISS).await;
    if !dom.is_attached(node) {
        return;
    }
    dom.add_class(node, NOTIFICATION_FADING);
    tokio::time::sleep(NOTIFY_FADE).await;
    if dom.is_attached(node) {
        dom.remove(node);
    }
}

fn activation_message(error: &OpenError) -> String {
    match error {
        OpenError::Service(ServiceError::Transport { url, .. }) => format!(
            "Cannot connect to the repodock service at {url}. Make sure it is running."
        ),
        other => format!("Error: {other}"),
    }
}
