//! HTTP surface: `GET /transcript/{video_id}` and a liveness check.

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::transcript::TranscriptService;

/// Shared state accessible from handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TranscriptService>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub source: &'static str,
}

/// The transcript HTTP server, built once at startup and consumed by `serve`
pub struct TranscriptServer {
    config: ServerConfig,
    service: Arc<TranscriptService>,
}

impl TranscriptServer {
    pub fn new(config: ServerConfig, service: TranscriptService) -> Self {
        Self {
            config,
            service: Arc::new(service),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        let state = AppState {
            service: self.service.clone(),
        };

        Router::new()
            .route("/transcript/{video_id}", get(transcript_handler))
            .route("/transcript/", get(empty_id_handler))
            .route("/health", get(health_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Bind the configured address and serve until ctrl-c
    pub async fn serve(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        self.serve_with_listener(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve_with_listener<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener.local_addr()?;
        tracing::info!(
            addr = %local_addr,
            source = self.service.source_name(),
            "Transcript server listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .context("Server error")?;

        tracing::info!("Transcript server stopped");
        Ok(())
    }
}

/// Look up a transcript and produce the response pair. Always 200.
pub async fn handle(service: &TranscriptService, video_id: &str) -> (StatusCode, Vec<String>) {
    let lines = service.lookup(video_id).await.into_lines();
    (StatusCode::OK, lines)
}

/// GET /transcript/{video_id}
async fn transcript_handler(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> (StatusCode, Json<Vec<String>>) {
    let (status, lines) = handle(&state.service, &video_id).await;
    (status, Json(lines))
}

/// GET /transcript/ with an empty id
async fn empty_id_handler(State(state): State<AppState>) -> (StatusCode, Json<Vec<String>>) {
    let (status, lines) = handle(&state.service, "").await;
    (status, Json(lines))
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        source: state.service.source_name(),
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::{FetchError, MockTranscriptFetcher, TranscriptRecord};
    use axum::body::Body;
    use axum::http::{header, Request};
    use std::time::Duration;
    use tower::ServiceExt;

    fn make_server() -> TranscriptServer {
        let mut mock = MockTranscriptFetcher::new();
        mock.expect_fetch_transcript().returning(|video_id| match video_id {
            "abc123" => Ok(vec![
                TranscriptRecord::new("Hello", 0.0, 1.5),
                TranscriptRecord::new("world", 1.5, 1.0),
            ]),
            "no-captions" => Err(FetchError::NoTranscriptFound {
                video_id: video_id.to_string(),
                requested: vec!["en".into()],
            }),
            "deleted-video" => Err(FetchError::VideoUnavailable {
                video_id: video_id.to_string(),
                reason: "This video is unavailable".into(),
            }),
            _ => Err(FetchError::Upstream {
                video_id: video_id.to_string(),
                message: "unexpected response".into(),
            }),
        });
        mock.expect_source_name().return_const("mock");

        let service = TranscriptService::new(Arc::new(mock), Duration::from_secs(5));
        TranscriptServer::new(ServerConfig::default(), service)
    }

    async fn get_json(uri: &str) -> (StatusCode, Option<String>, serde_json::Value) {
        let app = make_server().router();
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();

        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());

        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        let parsed = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, content_type, parsed)
    }

    #[tokio::test]
    async fn transcript_lines_in_order() {
        let (status, content_type, body) = get_json("/transcript/abc123").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(body, serde_json::json!(["Hello", "world"]));
    }

    #[tokio::test]
    async fn missing_transcript_is_empty_array() {
        let (status, _, body) = get_json("/transcript/no-captions").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn unreachable_video_is_empty_array() {
        let (status, _, body) = get_json("/transcript/deleted-video").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn unexpected_failure_is_empty_array() {
        let (status, _, body) = get_json("/transcript/flaky").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn empty_and_malformed_ids_are_empty_arrays() {
        for uri in ["/transcript/", "/transcript/%20%3F%3F", "/transcript/not%2Fan%2Fid"] {
            let (status, _, body) = get_json(uri).await;
            assert_eq!(status, StatusCode::OK, "status for {}", uri);
            assert_eq!(body, serde_json::json!([]), "body for {}", uri);
        }
    }

    #[tokio::test]
    async fn handle_returns_ok_pair() {
        let server = make_server();
        let (status, lines) = handle(&server.service, "abc123").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(lines, vec!["Hello".to_string(), "world".to_string()]);
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let (status, _, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["source"], "mock");
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let (status, _, _) = get_json("/nonexistent").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn server_keeps_config() {
        let server = make_server();
        assert_eq!(server.config().port, 5000);
    }

    #[tokio::test]
    async fn serves_over_tcp_until_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let server = make_server();
        let server_task = tokio::spawn(server.serve_with_listener(listener, async move {
            let _ = rx.await;
        }));

        let body: Vec<String> = reqwest::get(format!("http://{}/transcript/abc123", addr))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body, vec!["Hello".to_string(), "world".to_string()]);

        tx.send(()).unwrap();
        server_task.await.unwrap().unwrap();
    }
}
