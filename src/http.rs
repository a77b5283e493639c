//! HTTP API with Axum
//!
//! Read-only companion to the WebSocket protocol: health check, history
//! snapshot and optional static files.

use std::path::PathBuf;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::error;

use crate::hub::HubHandle;
use crate::store::ChatMessage;

/// Body of `GET /api/messages`
#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<ChatMessage>,
}

/// Create the Axum router
///
/// Unmatched paths fall back to `public_dir` when one is given.
pub fn create_router(hub: HubHandle, public_dir: Option<PathBuf>) -> Router {
    // The chat page may be served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .route("/health", get(health_check))
        .route("/api/messages", get(get_messages))
        .with_state(hub);

    let router = match public_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.layer(cors)
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// History snapshot endpoint
async fn get_messages(State(hub): State<HubHandle>) -> impl IntoResponse {
    match hub.history().await {
        Ok(messages) => (StatusCode::OK, Json(MessagesResponse { messages })).into_response(),
        Err(e) => {
            error!("History request failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::HubCommand;
    use crate::registry::ConnectionRegistry;
    use crate::store::MessageStore;
    use crate::types::ClientId;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tokio::sync::mpsc;
    use tower::util::ServiceExt;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let app = create_router(HubHandle::new(tx), None);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(body_json(response).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_get_messages() {
        let (hub, handle) = HubHandle::create(MessageStore::new(10), ConnectionRegistry::new(), 8);
        tokio::spawn(hub.run());

        let client_id = ClientId::new();
        let (sender, _rx) = mpsc::unbounded_channel();
        handle
            .send(HubCommand::Connect { client_id, sender })
            .await
            .unwrap();
        handle
            .send(HubCommand::Send {
                client_id,
                author: "Ann".to_string(),
                text: "Hi".to_string(),
                request_id: None,
            })
            .await
            .unwrap();

        let app = create_router(handle, None);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/messages")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = body_json(response).await;
        assert_eq!(body["messages"].as_array().map(|m| m.len()), Some(1));
        assert_eq!(body["messages"][0]["id"], 1);
        assert_eq!(body["messages"][0]["author"], "Ann");
        assert_eq!(body["messages"][0]["text"], "Hi");
    }

    #[tokio::test]
    async fn test_get_messages_without_hub() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let app = create_router(HubHandle::new(tx), None);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/messages")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
