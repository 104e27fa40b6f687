// core/src/service/trait.rs
use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ServiceError;
use crate::types::{HealthInfo, OpenRequest, OpenResult};

/// The companion service's HTTP surface. One attempt per call, no retries;
/// rerunning a failed action is the operator's job.
#[async_trait]
pub trait OpenService: Send + Sync {
    /// `POST /open`.
    async fn open(&self, request: OpenRequest) -> Result<OpenResult, ServiceError>;

    /// `GET /health`, with a short timeout so it can gate UI actions.
    async fn health(&self) -> Result<HealthInfo, ServiceError>;

    /// `GET /config`: whatever object the service currently holds.
    async fn get_config(&self) -> Result<Value, ServiceError>;

    /// `PUT /config`: replace the service-side object.
    async fn put_config(&self, config: Value) -> Result<(), ServiceError>;
}

/// Transport boundary for the open action.
///
/// A page context may be barred from cross-origin requests and has to relay
/// through a background process; callers stay oblivious, the relay forwards
/// request, result and error shapes unchanged.
#[async_trait]
pub trait OpenTransport: Send + Sync {
    async fn perform_open(&self, request: OpenRequest) -> Result<OpenResult, ServiceError>;
}
