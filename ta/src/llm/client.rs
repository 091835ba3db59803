//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call is independent
///
/// This is the core abstraction for interacting with language models. The
/// orchestrator receives an `Arc<dyn LlmClient>` at construction; nothing in
/// the crate reaches for a global client. Conversation state lives in the
/// store, not in the client: every request carries its full history.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request (blocking until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock LLM client for unit tests
    pub struct MockLlmClient {
        responses: Vec<Result<CompletionResponse, LlmError>>,
        call_count: AtomicUsize,
    }

    impl MockLlmClient {
        pub fn new(responses: Vec<Result<CompletionResponse, LlmError>>) -> Self {
            Self {
                responses,
                call_count: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            match self.responses.get(idx) {
                Some(Ok(response)) => Ok(response.clone()),
                Some(Err(err)) => Err(clone_error(err)),
                None => Err(LlmError::InvalidResponse("No more mock responses".to_string())),
            }
        }
    }

    // LlmError is not Clone (reqwest::Error), so rebuild the clonable variants
    fn clone_error(err: &LlmError) -> LlmError {
        match err {
            LlmError::RateLimited { retry_after } => LlmError::RateLimited {
                retry_after: *retry_after,
            },
            LlmError::ApiError { status, message } => LlmError::ApiError {
                status: *status,
                message: message.clone(),
            },
            other => LlmError::InvalidResponse(other.to_string()),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::llm::TokenUsage;

        fn text_response(text: &str) -> CompletionResponse {
            CompletionResponse {
                content: Some(text.to_string()),
                tool_calls: vec![],
                usage: TokenUsage::default(),
            }
        }

        fn request() -> CompletionRequest {
            CompletionRequest {
                system_prompt: "Test".to_string(),
                messages: vec![],
                tools: vec![],
                max_tokens: 1000,
                temperature: 0.7,
            }
        }

        #[tokio::test]
        async fn test_mock_client_returns_responses_in_order() {
            let client = MockLlmClient::new(vec![Ok(text_response("Response 1")), Ok(text_response("Response 2"))]);

            let resp1 = client.complete(request()).await.unwrap();
            assert_eq!(resp1.content, Some("Response 1".to_string()));

            let resp2 = client.complete(request()).await.unwrap();
            assert_eq!(resp2.content, Some("Response 2".to_string()));

            assert_eq!(client.call_count(), 2);
        }

        #[tokio::test]
        async fn test_mock_client_errors_when_exhausted() {
            let client = MockLlmClient::new(vec![]);
            let result = client.complete(request()).await;
            assert!(result.is_err());
        }
    }
}
