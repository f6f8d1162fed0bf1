use serde::de::DeserializeOwned;
use tracing::debug;
use tritan_core::engine::{WorkflowEngine, WorkflowPayload};
use tritan_core::errors::EngineError;
use tritan_core::execution::ExecutionResult;
use tritan_core::validation::ValidationResult;

use crate::config::{ConfigError, EngineConfig};

/// [`WorkflowEngine`] over the engine's JSON HTTP API.
pub struct HttpEngine {
    client: reqwest::Client,
    config: EngineConfig,
}

impl HttpEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Creates an engine client using `TRITAN_API_URL` / `TRITAN_API_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(EngineConfig::from_env()?)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, EngineError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown status").to_string()
            } else {
                body
            };
            return Err(EngineError::status(status.as_u16(), message));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| EngineError::transport(format!("failed to read response body: {e}")))?;
        serde_json::from_slice(&bytes).map_err(|e| EngineError::decode(e.to_string()))
    }

    async fn post<T: DeserializeOwned>(
        &self,
        url: String,
        payload: &WorkflowPayload,
    ) -> Result<T, EngineError> {
        debug!(
            event = "engine.request",
            domain = "engine",
            url = %url,
            workflow_id = %payload.id,
            node_count = payload.nodes.len() as u64
        );
        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| EngineError::transport(format!("POST {url} failed: {e}")))?;
        self.read_json(response).await
    }
}

#[async_trait::async_trait]
impl WorkflowEngine for HttpEngine {
    fn name(&self) -> String {
        self.config.base_url.clone()
    }

    async fn validate(&self, payload: &WorkflowPayload) -> Result<ValidationResult, EngineError> {
        self.post(self.config.validate_url(), payload).await
    }

    async fn execute(&self, payload: &WorkflowPayload) -> Result<ExecutionResult, EngineError> {
        self.post(self.config.execute_url(), payload).await
    }

    async fn health(&self) -> Result<serde_json::Value, EngineError> {
        let url = self.config.health_url();
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| EngineError::transport(format!("GET {url} failed: {e}")))?;
        self.read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tritan_core::{Editor, ExecutionStatus, NodeKind, Position};

    use super::*;

    /// Serves one canned response and hands back the raw request line and body.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<(String, String)>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            let header_end = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "client closed before sending headers");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
            let length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())?
                })
                .unwrap_or(0);
            while buf.len() < header_end + length {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "client closed before sending the full body");
                buf.extend_from_slice(&chunk[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            let request_line = head.lines().next().unwrap_or_default().to_string();
            let request_body = String::from_utf8_lossy(&buf[header_end..]).to_string();
            (request_line, request_body)
        });
        (base, handle)
    }

    fn engine_at(base: &str) -> HttpEngine {
        HttpEngine::new(EngineConfig::new(base).timeout(Duration::from_secs(5))).unwrap()
    }

    fn payload() -> WorkflowPayload {
        let mut store = tritan_core::WorkflowStore::new();
        store.add_node(NodeKind::Trigger, Position::default());
        WorkflowPayload::for_execution(&store)
    }

    #[tokio::test]
    async fn execute_posts_payload_and_parses_result() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"status":"completed","total_duration_ms":3.5,"node_results":[]}"#,
        )
        .await;
        let result = engine_at(&base).execute(&payload()).await.unwrap();
        assert_eq!(result.status, ExecutionStatus::Completed);

        let (request_line, body) = server.await.unwrap();
        assert!(request_line.starts_with("POST /api/execute/ "));
        let sent: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(sent["nodes"][0]["type"], "trigger");
    }

    #[tokio::test]
    async fn validate_hits_validation_route() {
        let (base, server) = serve_once("200 OK", r#"{"valid":true}"#).await;
        let result = engine_at(&base).validate(&payload()).await.unwrap();
        assert!(result.valid);
        let (request_line, _) = server.await.unwrap();
        assert!(request_line.starts_with("POST /api/workflows/validate "));
    }

    #[tokio::test]
    async fn non_success_status_becomes_status_error() {
        let (base, _server) = serve_once("502 Bad Gateway", "").await;
        let err = engine_at(&base).execute(&payload()).await.unwrap_err();
        assert_eq!(err.status_code(), Some(502));
        assert_eq!(err.message(), "Bad Gateway");
    }

    #[tokio::test]
    async fn unexpected_body_is_a_decode_error() {
        let (base, _server) = serve_once("200 OK", r#"{"unexpected":true}"#).await;
        let err = engine_at(&base).execute(&payload()).await.unwrap_err();
        assert!(matches!(err, EngineError::Decode { .. }));
    }

    #[tokio::test]
    async fn health_returns_engine_json() {
        let (base, server) = serve_once("200 OK", r#"{"status":"healthy"}"#).await;
        let value = engine_at(&base).health().await.unwrap();
        assert_eq!(value["status"], "healthy");
        let (request_line, _) = server.await.unwrap();
        assert!(request_line.starts_with("GET /health "));
    }

    #[tokio::test]
    async fn unreachable_engine_drives_local_fallback_and_failed_execution() {
        let editor = Editor::new(Arc::new(engine_at("http://127.0.0.1:1")));
        editor.add_node(NodeKind::Trigger, Position::default());

        let validation = editor.validate().await;
        assert!(validation.valid);

        let err = editor.execute().await.unwrap_err();
        assert!(matches!(err, EngineError::Transport { .. }));
        let stored = editor.execution_result().unwrap();
        assert_eq!(stored.status, ExecutionStatus::Failed);
        assert!(!editor.is_executing());
    }
}
