//! HTTP layer - binds the orchestrator to network I/O

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::agent::TodoAgent;
use crate::tools::ToolCallReport;

/// Shared server state
pub struct AppState {
    /// The agent orchestrator
    pub agent: TodoAgent,
}

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/{user_id}/chat", post(chat_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Chat request body
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub conversation_id: Option<i64>,
    pub message: String,
}

/// Chat response body
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub conversation_id: i64,
    pub response: String,
    pub tool_calls: Vec<ToolCallReport>,
}

/// Error response body - detail is always a sanitized, user-friendly string
#[derive(Debug, Serialize)]
struct ErrorResponse {
    detail: String,
}

/// Health check endpoint
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Chat endpoint - processes one user message through the agent
async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Response {
    if request.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                detail: "Message cannot be empty".to_string(),
            }),
        )
            .into_response();
    }

    match state
        .agent
        .process_turn(&user_id, request.conversation_id, &request.message)
        .await
    {
        Ok(outcome) if outcome.is_errored() => {
            // The outcome's response text is already the sanitized apology;
            // raw provider detail was logged by the agent.
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    detail: outcome.response,
                }),
            )
                .into_response()
        }
        Ok(outcome) => Json(ChatResponse {
            conversation_id: outcome.conversation_id,
            response: outcome.response,
            tool_calls: outcome.tool_calls,
        })
        .into_response(),
        Err(e) => {
            error!(%user_id, error = %e, "Turn failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    detail: "I encountered an error processing your request. Please try again.".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;
    use todostore::TodoStore;

    fn state() -> Arc<AppState> {
        let store = TodoStore::open_in_memory().unwrap();
        store.create_tables().unwrap();
        Arc::new(AppState {
            agent: TodoAgent::degraded(store, LlmConfig::default()),
        })
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_message() {
        let request = ChatRequest {
            conversation_id: None,
            message: "   ".to_string(),
        };

        let response = chat_handler(State(state()), Path("u1".to_string()), Json(request)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_degraded_mode_succeeds() {
        let request = ChatRequest {
            conversation_id: None,
            message: "hello".to_string(),
        };

        let response = chat_handler(State(state()), Path("u1".to_string()), Json(request)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
