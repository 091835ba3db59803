//! End-to-end tests for the chat API
//!
//! These spin the real axum server on a random port with a scripted LLM
//! client and drive it over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use todoagent::agent::TodoAgent;
use todoagent::config::LlmConfig;
use todoagent::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, TokenUsage, ToolCall};
use todoagent::server::{AppState, build_router};
use todostore::{StatusFilter, TodoStore};

// =============================================================================
// Scripted LLM client
// =============================================================================

/// Returns pre-scripted responses in order
struct ScriptedLlm {
    responses: Vec<Script>,
    call_count: AtomicUsize,
}

enum Script {
    Text(String),
    Tools(Vec<ToolCall>),
    Error { status: u16, message: String },
}

impl ScriptedLlm {
    fn new(responses: Vec<Script>) -> Self {
        Self {
            responses,
            call_count: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
        match self.responses.get(idx) {
            Some(Script::Text(text)) => Ok(CompletionResponse {
                content: Some(text.clone()),
                tool_calls: vec![],
                usage: TokenUsage::default(),
            }),
            Some(Script::Tools(calls)) => Ok(CompletionResponse {
                content: None,
                tool_calls: calls.clone(),
                usage: TokenUsage::default(),
            }),
            Some(Script::Error { status, message }) => Err(LlmError::ApiError {
                status: *status,
                message: message.clone(),
            }),
            None => Err(LlmError::InvalidResponse("No more scripted responses".to_string())),
        }
    }
}

// =============================================================================
// Server harness
// =============================================================================

/// Start a server with the scripted responses. Returns its address and a
/// handle to the backing store.
async fn start_server(responses: Vec<Script>) -> (SocketAddr, TodoStore) {
    let store = TodoStore::open_in_memory().expect("open store");
    store.create_tables().expect("create tables");

    let agent = TodoAgent::new(
        Arc::new(ScriptedLlm::new(responses)),
        store.clone(),
        LlmConfig::default(),
    );

    let app = build_router(Arc::new(AppState { agent }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    (addr, store)
}

async fn post_chat(addr: SocketAddr, user_id: &str, body: Value) -> (u16, Value) {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/api/{user_id}/chat"))
        .json(&body)
        .send()
        .await
        .expect("request");

    let status = response.status().as_u16();
    let body: Value = response.json().await.expect("json body");
    (status, body)
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (addr, _store) = start_server(vec![]).await;

    let response = reqwest::get(format!("http://{addr}/api/health")).await.expect("request");
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.expect("json");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_add_task_end_to_end() {
    let (addr, store) = start_server(vec![Script::Tools(vec![ToolCall {
        name: "add_task".to_string(),
        arguments: json!({"title": "buy milk"}),
    }])])
    .await;

    let (status, body) = post_chat(addr, "u1", json!({"message": "add task buy milk"})).await;

    assert_eq!(status, 200);
    let response_text = body["response"].as_str().unwrap();
    assert!(response_text.contains("buy milk"));
    assert!(response_text.contains("added"));

    let tool_calls = body["tool_calls"].as_array().unwrap();
    assert_eq!(tool_calls.len(), 1);
    assert_eq!(tool_calls[0]["name"], "add_task");
    assert_eq!(tool_calls[0]["result"]["status"], "created");

    // The row exists for u1
    let tasks = store.list_tasks("u1", StatusFilter::All).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "buy milk");
    assert!(!tasks[0].completed);
}

#[tokio::test]
async fn test_empty_message_is_rejected_with_no_rows() {
    let (addr, store) = start_server(vec![]).await;

    let (status, body) = post_chat(addr, "u1", json!({"message": "   "})).await;

    assert_eq!(status, 400);
    assert_eq!(body["detail"], "Message cannot be empty");

    // Nothing was written
    assert!(store.list_conversations("u1").unwrap().is_empty());
    assert!(store.list_messages("u1").unwrap().is_empty());
    assert!(store.list_tasks("u1", StatusFilter::All).unwrap().is_empty());
}

#[tokio::test]
async fn test_quota_error_returns_500_and_keeps_user_message() {
    let (addr, store) = start_server(vec![Script::Error {
        status: 429,
        message: "insufficient_quota: quota exceeded".to_string(),
    }])
    .await;

    let (status, body) = post_chat(addr, "u1", json!({"message": "add task x"})).await;

    assert_eq!(status, 500);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("high demand"));
    // Raw provider detail never reaches the caller
    assert!(!detail.contains("insufficient_quota"));

    // The user message survived the failed turn
    let conversations = store.list_conversations("u1").unwrap();
    assert_eq!(conversations.len(), 1);
    let messages = store
        .get_messages_by_conversation("u1", conversations[0].id)
        .unwrap();
    assert!(!messages.is_empty());
    assert_eq!(messages[0].content, "add task x");
}

#[tokio::test]
async fn test_conversation_continues_across_turns() {
    let (addr, store) = start_server(vec![
        Script::Text("first reply".to_string()),
        Script::Text("second reply".to_string()),
    ])
    .await;

    let (status, body) = post_chat(addr, "u1", json!({"message": "hello"})).await;
    assert_eq!(status, 200);
    let conversation_id = body["conversation_id"].as_i64().unwrap();

    let (status, body) = post_chat(
        addr,
        "u1",
        json!({"conversation_id": conversation_id, "message": "and again"}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["conversation_id"].as_i64().unwrap(), conversation_id);

    // Two full turns persisted in order
    let messages = store.get_messages_by_conversation("u1", conversation_id).unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0].content, "hello");
    assert_eq!(messages[1].content, "first reply");
    assert_eq!(messages[2].content, "and again");
    assert_eq!(messages[3].content, "second reply");
}

#[tokio::test]
async fn test_stale_conversation_id_starts_fresh() {
    let (addr, _store) = start_server(vec![Script::Text("ok".to_string())]).await;

    let (status, body) = post_chat(addr, "u1", json!({"conversation_id": 424242, "message": "hi"})).await;

    assert_eq!(status, 200);
    assert_ne!(body["conversation_id"].as_i64().unwrap(), 424242);
}

#[tokio::test]
async fn test_unknown_tool_does_not_fail_the_turn() {
    let (addr, store) = start_server(vec![Script::Tools(vec![
        ToolCall {
            name: "send_email".to_string(),
            arguments: json!({"to": "someone"}),
        },
        ToolCall {
            name: "add_task".to_string(),
            arguments: json!({"title": "real work"}),
        },
    ])])
    .await;

    let (status, body) = post_chat(addr, "u1", json!({"message": "do stuff"})).await;

    assert_eq!(status, 200);
    let tool_calls = body["tool_calls"].as_array().unwrap();
    assert_eq!(tool_calls.len(), 2);
    assert_eq!(tool_calls[0]["result"]["status"], "error");
    assert_eq!(tool_calls[1]["result"]["status"], "created");

    let tasks = store.list_tasks("u1", StatusFilter::All).unwrap();
    assert_eq!(tasks.len(), 1);
}

#[tokio::test]
async fn test_list_tasks_flow() {
    let (addr, store) = start_server(vec![Script::Tools(vec![ToolCall {
        name: "list_tasks".to_string(),
        arguments: json!({"status": "pending"}),
    }])])
    .await;

    store.create_task("u1", "alpha", None).unwrap();
    store.create_task("u1", "beta", None).unwrap();
    // Another user's task must not appear
    store.create_task("u2", "hidden", None).unwrap();

    let (status, body) = post_chat(addr, "u1", json!({"message": "show my tasks"})).await;

    assert_eq!(status, 200);
    let response_text = body["response"].as_str().unwrap();
    assert!(response_text.contains("alpha"));
    assert!(response_text.contains("beta"));
    assert!(!response_text.contains("hidden"));
}
