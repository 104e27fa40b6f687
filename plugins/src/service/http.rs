// plugins/src/service/http.rs
//! reqwest implementation of the companion service contract.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use repodock_core::errors::{ServiceError, GENERIC_REJECTION};
use repodock_core::service::OpenService;
use repodock_core::types::{HealthInfo, OpenRequest, OpenResult, PathMapping};

/// Health probes gate UI actions, keep them snappy.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);
/// A cold open may clone a repository behind the scenes.
const OPEN_TIMEOUT: Duration = Duration::from_secs(60);
const CONFIG_TIMEOUT: Duration = Duration::from_secs(5);

pub struct HttpOpenService {
    base_url: String,
    http: reqwest::Client,
}

impl HttpOpenService {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ServiceError> {
        let base_url = base_url.into();
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ServiceError::Transport {
                url: base_url.clone(),
                source: e.into(),
            })?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn transport(&self, source: reqwest::Error) -> ServiceError {
        ServiceError::Transport {
            url: self.base_url.clone(),
            source: source.into(),
        }
    }

    /// Merge an updated mapping list into the service-side config
    /// (read-modify-write). A concurrent writer between the GET and the PUT
    /// loses its edits; accepted for a local single-user service.
    pub async fn push_path_mappings(
        &self,
        mappings: &[PathMapping],
    ) -> Result<(), ServiceError> {
        let mut config = self.get_config().await?;
        let mappings = serde_json::to_value(mappings).map_err(|e| ServiceError::Decode(e.into()))?;
        match config.as_object_mut() {
            Some(object) => {
                object.insert("pathMappings".to_string(), mappings);
            }
            None => {
                config = serde_json::json!({ "pathMappings": mappings });
            }
        }
        self.put_config(config).await
    }
}

/// Extract the rejection detail from a non-2xx body, falling back to the
/// generic message when the body is not parseable JSON.
fn rejection_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| GENERIC_REJECTION.to_string())
}

#[async_trait]
impl OpenService for HttpOpenService {
    async fn open(&self, request: OpenRequest) -> Result<OpenResult, ServiceError> {
        tracing::debug!(url = %request.url, ide = %request.ide, "POST /open");
        let response = self
            .http
            .post(self.endpoint("/open"))
            .timeout(OPEN_TIMEOUT)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Rejected {
                status: status.as_u16(),
                message: rejection_message(&body),
            });
        }
        response
            .json::<OpenResult>()
            .await
            .map_err(|e| ServiceError::Decode(e.into()))
    }

    async fn health(&self) -> Result<HealthInfo, ServiceError> {
        let response = self
            .http
            .get(self.endpoint("/health"))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(|e| self.transport(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Rejected {
                status: status.as_u16(),
                message: "Service returned error".to_string(),
            });
        }
        response
            .json::<HealthInfo>()
            .await
            .map_err(|e| ServiceError::Decode(e.into()))
    }

    async fn get_config(&self) -> Result<Value, ServiceError> {
        let response = self
            .http
            .get(self.endpoint("/config"))
            .timeout(CONFIG_TIMEOUT)
            .send()
            .await
            .map_err(|e| self.transport(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Rejected {
                status: status.as_u16(),
                message: "Service returned error".to_string(),
            });
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| ServiceError::Decode(e.into()))
    }

    async fn put_config(&self, config: Value) -> Result<(), ServiceError> {
        let response = self
            .http
            .put(self.endpoint("/config"))
            .timeout(CONFIG_TIMEOUT)
            .json(&config)
            .send()
            .await
            .map_err(|e| self.transport(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Rejected {
                status: status.as_u16(),
                message: "Service returned error".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn open_success_returns_the_resolved_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/open")
            .match_body(Matcher::PartialJson(json!({
                "url": "https://github.com/acme/widgets/pull/42",
                "ide": "code",
            })))
            .with_status(200)
            .with_body(r#"{"status":"ok","message":"opened","path":"/home/u/widgets"}"#)
            .create_async()
            .await;

        let service = HttpOpenService::new(server.url()).unwrap();
        let result = service
            .open(OpenRequest::new(
                "https://github.com/acme/widgets/pull/42",
                "code",
            ))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.path.as_deref(), Some("/home/u/widgets"));
    }

    #[tokio::test]
    async fn rejection_surfaces_the_embedded_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/open")
            .with_status(500)
            .with_body(r#"{"message":"bad ide"}"#)
            .create_async()
            .await;

        let service = HttpOpenService::new(server.url()).unwrap();
        let err = service
            .open(OpenRequest::new("https://github.com/a/b", "code"))
            .await
            .unwrap_err();

        match err {
            ServiceError::Rejected { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "bad ide");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparseable_rejection_body_falls_back_to_the_generic_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/open")
            .with_status(500)
            .with_body("<html>Internal Server Error</html>")
            .create_async()
            .await;

        let service = HttpOpenService::new(server.url()).unwrap();
        let err = service
            .open(OpenRequest::new("https://github.com/a/b", "code"))
            .await
            .unwrap_err();

        match err {
            ServiceError::Rejected { message, .. } => assert_eq!(message, GENERIC_REJECTION),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_error_naming_the_service_url() {
        // nothing listens on port 1
        let service = HttpOpenService::new("http://127.0.0.1:1").unwrap();
        let err = service
            .open(OpenRequest::new("https://github.com/a/b", "code"))
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert!(err.to_string().contains("http://127.0.0.1:1"));
    }

    #[tokio::test]
    async fn health_reports_the_service_version() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(r#"{"status":"ok","version":"1.0.0"}"#)
            .create_async()
            .await;

        let service = HttpOpenService::new(server.url()).unwrap();
        let health = service.health().await.unwrap();
        assert_eq!(health.version, "1.0.0");
    }

    #[tokio::test]
    async fn push_path_mappings_preserves_unrelated_config_fields() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/config")
            .with_status(200)
            .with_body(r#"{"port":9527,"defaultIDE":"code","cacheDir":"/tmp/repos"}"#)
            .create_async()
            .await;
        let put = server
            .mock("PUT", "/config")
            .match_body(Matcher::PartialJson(json!({
                "port": 9527,
                "defaultIDE": "code",
                "cacheDir": "/tmp/repos",
                "pathMappings": [
                    {"pattern": "acme", "localPath": "~/src/acme"},
                    {"pattern": "*", "localPath": "~/src"},
                ],
            })))
            .with_status(200)
            .create_async()
            .await;

        let service = HttpOpenService::new(server.url()).unwrap();
        service
            .push_path_mappings(&[
                PathMapping {
                    pattern: "acme".into(),
                    local_path: "~/src/acme".into(),
                },
                PathMapping {
                    pattern: "*".into(),
                    local_path: "~/src".into(),
                },
            ])
            .await
            .unwrap();

        put.assert_async().await;
    }
}
