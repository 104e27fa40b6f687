// plugins/src/relay.rs
//! Transport boundary implementations.
//!
//! `DirectTransport` is for hosts that may call the service straight away
//! (editor, popup). `RelayTransport` models the page-context hop: content
//! code hands the request to a background task over a channel because the
//! page itself may be barred from cross-origin requests. Both forward the
//! request/result/error shapes unchanged.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use repodock_core::errors::ServiceError;
use repodock_core::service::{OpenService, OpenTransport};
use repodock_core::types::{OpenRequest, OpenResult};

pub struct DirectTransport {
    service: Arc<dyn OpenService>,
}

impl DirectTransport {
    pub fn new(service: Arc<dyn OpenService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl OpenTransport for DirectTransport {
    async fn perform_open(&self, request: OpenRequest) -> Result<OpenResult, ServiceError> {
        self.service.open(request).await
    }
}

struct RelayJob {
    request: OpenRequest,
    reply: oneshot::Sender<Result<OpenResult, ServiceError>>,
}

pub struct RelayTransport {
    tx: mpsc::Sender<RelayJob>,
    service_url: String,
}

impl RelayTransport {
    /// Spawn the background side of the relay and return the in-page side.
    pub fn spawn(service: Arc<dyn OpenService>, service_url: impl Into<String>) -> Self {
        let (tx, mut rx) = mpsc::channel::<RelayJob>(16);
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let result = service.open(job.request).await;
                // receiver may already have navigated away
                let _ = job.reply.send(result);
            }
        });
        Self {
            tx,
            service_url: service_url.into(),
        }
    }

    fn relay_gone(&self) -> ServiceError {
        ServiceError::Transport {
            url: self.service_url.clone(),
            source: anyhow::anyhow!("background relay is gone"),
        }
    }
}

#[async_trait]
impl OpenTransport for RelayTransport {
    async fn perform_open(&self, request: OpenRequest) -> Result<OpenResult, ServiceError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(RelayJob { request, reply })
            .await
            .map_err(|_| self.relay_gone())?;
        response.await.map_err(|_| self.relay_gone())?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repodock_core::types::HealthInfo;
    use serde_json::Value;
    use std::sync::Mutex;

    struct RecordingService {
        seen: Mutex<Vec<OpenRequest>>,
    }

    #[async_trait]
    impl OpenService for RecordingService {
        async fn open(&self, request: OpenRequest) -> Result<OpenResult, ServiceError> {
            self.seen.lock().unwrap().push(request);
            Ok(OpenResult {
                status: Some("ok".into()),
                message: None,
                path: Some("/home/u/widgets".into()),
            })
        }
        async fn health(&self) -> Result<HealthInfo, ServiceError> {
            Ok(HealthInfo {
                version: "test".into(),
            })
        }
        async fn get_config(&self) -> Result<Value, ServiceError> {
            Ok(Value::Null)
        }
        async fn put_config(&self, _config: Value) -> Result<(), ServiceError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn relay_forwards_the_request_unchanged() {
        let service = Arc::new(RecordingService {
            seen: Mutex::new(Vec::new()),
        });
        let relay = RelayTransport::spawn(service.clone(), "http://localhost:9527");

        let request = OpenRequest::new("https://github.com/acme/widgets", "code");
        let result = relay.perform_open(request.clone()).await.unwrap();

        assert_eq!(result.path.as_deref(), Some("/home/u/widgets"));
        let seen = service.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], request);
    }
}
