// core/src/watcher.rs
//! Single-page-app navigation detection.
//!
//! The host observes DOM mutation batches and feeds the current URL here;
//! actual URL comparison and debounce scheduling live in this module so the
//! behavior is testable without a page.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant};

/// Settle delay after the first paint, which may still be streaming in.
pub const INITIAL_SETTLE: Duration = Duration::from_millis(1000);
/// Settle delay after an in-page navigation.
pub const NAVIGATION_SETTLE: Duration = Duration::from_millis(500);

/// Scoped last-URL state, one instance per page context.
pub struct NavigationWatcher {
    last_url: String,
}

impl NavigationWatcher {
    pub fn new(initial_url: impl Into<String>) -> Self {
        Self {
            last_url: initial_url.into(),
        }
    }

    /// Called on every observed mutation batch. Returns the debounce delay
    /// to wait before re-injecting, or `None` when the URL is unchanged.
    pub fn on_mutation(&mut self, current_url: &str) -> Option<Duration> {
        if current_url == self.last_url {
            return None;
        }
        self.last_url = current_url.to_string();
        tracing::debug!(url = %current_url, "navigation detected");
        Some(NAVIGATION_SETTLE)
    }

    pub fn last_url(&self) -> &str {
        &self.last_url
    }
}

/// Drive injection passes from a stream of mutation-batch URLs.
///
/// Runs one pass after the initial settle, then debounces: rapid
/// navigations within the settle window coalesce into a single pass
/// evaluated against the last URL seen. Redundant passes are harmless
/// either way; the trigger controller keeps the control single-instance.
pub async fn drive(
    mut watcher: NavigationWatcher,
    mut mutations: mpsc::Receiver<String>,
    mut inject: impl FnMut(&str),
) {
    time::sleep(INITIAL_SETTLE).await;
    let initial = watcher.last_url().to_string();
    inject(&initial);

    let mut pending: Option<(String, Instant)> = None;
    loop {
        match pending.take() {
            Some((url, deadline)) => {
                tokio::select! {
                    received = mutations.recv() => match received {
                        Some(current) => {
                            pending = match watcher.on_mutation(&current) {
                                Some(delay) => Some((current, Instant::now() + delay)),
                                None => Some((url, deadline)),
                            };
                        }
                        None => {
                            // flush the pending pass before shutting down
                            time::sleep_until(deadline).await;
                            inject(&url);
                            return;
                        }
                    },
                    _ = time::sleep_until(deadline) => inject(&url),
                }
            }
            None => match mutations.recv().await {
                Some(current) => {
                    if let Some(delay) = watcher.on_mutation(&current) {
                        pending = Some((current, Instant::now() + delay));
                    }
                }
                None => return,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    #[test]
    fn unchanged_url_schedules_nothing() {
        let mut watcher = NavigationWatcher::new("https://github.com/acme/widgets");
        assert_eq!(watcher.on_mutation("https://github.com/acme/widgets"), None);
    }

    #[test]
    fn url_change_schedules_a_debounced_pass() {
        let mut watcher = NavigationWatcher::new("https://github.com/a/b");
        assert_eq!(
            watcher.on_mutation("https://github.com/a/b/pull/1"),
            Some(NAVIGATION_SETTLE)
        );
        assert_eq!(watcher.last_url(), "https://github.com/a/b/pull/1");
        // repeated mutation batches on the settled page are quiet
        assert_eq!(watcher.on_mutation("https://github.com/a/b/pull/1"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_navigations_coalesce_into_one_final_pass() {
        let passes: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = passes.clone();
        let (tx, rx) = mpsc::channel(8);

        let handle = tokio::spawn(drive(
            NavigationWatcher::new("https://github.com/a/b"),
            rx,
            move |url| sink.lock().unwrap().push(url.to_string()),
        ));

        // let the initial pass run
        time::sleep(INITIAL_SETTLE + Duration::from_millis(10)).await;

        // A -> B -> A inside the debounce window
        tx.send("https://github.com/x/y".to_string()).await.unwrap();
        time::sleep(Duration::from_millis(50)).await;
        tx.send("https://github.com/a/b".to_string()).await.unwrap();
        drop(tx);
        handle.await.unwrap();

        let seen = passes.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                "https://github.com/a/b".to_string(),
                "https://github.com/a/b".to_string(),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn separated_navigations_each_get_a_pass() {
        let passes: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = passes.clone();
        let (tx, rx) = mpsc::channel(8);

        let handle = tokio::spawn(drive(
            NavigationWatcher::new("https://github.com/a/b"),
            rx,
            move |url| sink.lock().unwrap().push(url.to_string()),
        ));

        time::sleep(INITIAL_SETTLE + Duration::from_millis(10)).await;

        tx.send("https://github.com/x/y".to_string()).await.unwrap();
        time::sleep(NAVIGATION_SETTLE + Duration::from_millis(50)).await;
        tx.send("https://github.com/a/b".to_string()).await.unwrap();
        drop(tx);
        handle.await.unwrap();

        let seen = passes.lock().unwrap().clone();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[1], "https://github.com/x/y");
        assert_eq!(seen[2], "https://github.com/a/b");
    }
}
