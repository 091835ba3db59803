//! TodoAgent - the per-turn orchestrator
//!
//! One chat turn: load-or-create the conversation, persist the user
//! message, ask the model for a response with tools enabled, execute any
//! requested tool calls against the store, synthesize the reply, persist
//! it, and refresh the conversation timestamp.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use todostore::{Role, StoreError, TodoStore};

use crate::config::LlmConfig;
use crate::llm::{CompletionRequest, LlmClient, Message};
use crate::tools::{self, ToolCallReport, ToolExecutor};

use super::SYSTEM_PROMPT;
use super::fallback::fallback_response;
use super::synthesize::{GENERIC_ACK, provider_apology, synthesize_tool_response};

/// Result of one chat turn
#[derive(Debug)]
pub struct TurnOutcome {
    /// The conversation this turn was appended to
    pub conversation_id: i64,

    /// The synthesized natural-language reply
    pub response: String,

    /// Executed tool calls, in call order
    pub tool_calls: Vec<ToolCallReport>,

    /// Internal marker set when the provider failed; the response text is
    /// already the sanitized apology
    pub error: Option<String>,
}

impl TurnOutcome {
    /// Whether the turn ended in the errored state
    pub fn is_errored(&self) -> bool {
        self.error.is_some()
    }
}

/// The agent orchestrator
///
/// The LLM capability is injected at construction. When it is absent
/// (missing credential), turns run in a degraded keyword-matched mode with
/// no tool calls.
pub struct TodoAgent {
    llm: Option<Arc<dyn LlmClient>>,
    store: TodoStore,
    executor: ToolExecutor,
    llm_config: LlmConfig,
}

impl TodoAgent {
    /// Create an agent with an LLM capability
    pub fn new(llm: Arc<dyn LlmClient>, store: TodoStore, llm_config: LlmConfig) -> Self {
        Self {
            llm: Some(llm),
            executor: ToolExecutor::new(store.clone()),
            store,
            llm_config,
        }
    }

    /// Create an agent without an LLM capability (degraded mode)
    pub fn degraded(store: TodoStore, llm_config: LlmConfig) -> Self {
        warn!("Agent constructed without LLM capability; running in degraded mode");
        Self {
            llm: None,
            executor: ToolExecutor::new(store.clone()),
            store,
            llm_config,
        }
    }

    /// Whether this agent has an LLM capability
    pub fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    /// Process one chat turn for the user
    ///
    /// A given conversation_id is loaded scoped to the user; a miss silently
    /// starts a new conversation. The user message is persisted before the
    /// model call, so history is durable even if the provider fails.
    pub async fn process_turn(
        &self,
        user_id: &str,
        conversation_id: Option<i64>,
        user_input: &str,
    ) -> Result<TurnOutcome, StoreError> {
        let conversation = match conversation_id {
            Some(id) => match self.store.get_conversation_by_id(user_id, id)? {
                Some(conversation) => conversation,
                None => {
                    debug!(%user_id, requested = id, "Conversation not found, starting a new one");
                    self.store.create_conversation(user_id)?
                }
            },
            None => self.store.create_conversation(user_id)?,
        };

        self.store
            .create_message(user_id, conversation.id, Role::User, user_input)?;

        // History excludes the message just added; the current text goes in
        // as the final user message of the request.
        let history = self.load_history(user_id, conversation.id)?;

        let (response, tool_calls, turn_error) = match &self.llm {
            Some(llm) => self.run_model_turn(llm, user_id, user_input, history).await,
            None => (fallback_response(user_input), Vec::new(), None),
        };

        self.store
            .create_message(user_id, conversation.id, Role::Assistant, &response)?;
        self.store.touch_conversation(user_id, conversation.id)?;

        info!(
            %user_id,
            conversation_id = conversation.id,
            tool_count = tool_calls.len(),
            errored = turn_error.is_some(),
            "Turn complete"
        );

        Ok(TurnOutcome {
            conversation_id: conversation.id,
            response,
            tool_calls,
            error: turn_error,
        })
    }

    /// Load prior turns as model messages, excluding the newest message
    fn load_history(&self, user_id: &str, conversation_id: i64) -> Result<Vec<Message>, StoreError> {
        let mut messages = self.store.get_messages_by_conversation(user_id, conversation_id)?;
        messages.pop();

        Ok(messages
            .into_iter()
            .map(|msg| match msg.role {
                Role::User => Message::user(msg.content),
                Role::Assistant => Message::assistant(msg.content),
            })
            .collect())
    }

    /// Call the model and turn its output into a reply
    async fn run_model_turn(
        &self,
        llm: &Arc<dyn LlmClient>,
        user_id: &str,
        user_input: &str,
        mut history: Vec<Message>,
    ) -> (String, Vec<ToolCallReport>, Option<String>) {
        history.push(Message::user(user_input));

        let request = CompletionRequest {
            system_prompt: SYSTEM_PROMPT.to_string(),
            messages: history,
            tools: tools::definitions(),
            max_tokens: self.llm_config.max_tokens,
            temperature: self.llm_config.temperature,
        };

        let response = match llm.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                // Raw provider detail stays server-side; the user sees only
                // the classified apology.
                error!(%user_id, error = %e, "Provider error during model call");
                return (provider_apology(&e).to_string(), Vec::new(), Some(e.to_string()));
            }
        };

        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            tool_calls = response.tool_calls.len(),
            "Model response received"
        );

        // Tool outputs are never sent back to the model for a second pass;
        // the reply is synthesized deterministically from the results.
        let reports = self.executor.execute_all(&response.tool_calls, user_id);

        let text = if reports.is_empty() {
            match response.content {
                Some(content) if !content.trim().is_empty() => content,
                _ => GENERIC_ACK.to_string(),
            }
        } else {
            synthesize_tool_response(&reports)
        };

        (text, reports, None)
    }
}
