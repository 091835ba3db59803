//! TodoAgent - natural-language todo manager
//!
//! A thin HTTP backend that stores tasks, conversations, and messages in
//! SQLite (via [`todostore`]) and delegates intent parsing to an external
//! LLM configured with function-calling tools. One chat turn becomes
//! zero-or-more tool invocations plus a synthesized natural-language reply.
//!
//! # Modules
//!
//! - [`llm`] - LLM client trait and Anthropic implementation
//! - [`tools`] - Tool schema and executor over the store
//! - [`agent`] - The per-turn orchestrator
//! - [`server`] - HTTP layer (axum)
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod agent;
pub mod cli;
pub mod config;
pub mod llm;
pub mod server;
pub mod tools;

// Re-export commonly used types
pub use agent::{TodoAgent, TurnOutcome};
pub use config::{Config, LlmConfig, ServerConfig, StorageConfig};
pub use llm::{AnthropicClient, CompletionRequest, CompletionResponse, LlmClient, LlmError};
pub use server::{AppState, build_router};
pub use tools::{ToolCallReport, ToolExecutor, ToolKind};
