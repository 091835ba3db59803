//! Store error types

use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} with ID {id} not found for user {user_id}")]
    NotFound {
        entity: &'static str,
        id: i64,
        user_id: String,
    },

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl StoreError {
    /// NotFound for a task
    pub fn task_not_found(user_id: impl Into<String>, id: i64) -> Self {
        StoreError::NotFound {
            entity: "Task",
            id,
            user_id: user_id.into(),
        }
    }

    /// NotFound for a conversation
    pub fn conversation_not_found(user_id: impl Into<String>, id: i64) -> Self {
        StoreError::NotFound {
            entity: "Conversation",
            id,
            user_id: user_id.into(),
        }
    }

    /// NotFound for a message
    pub fn message_not_found(user_id: impl Into<String>, id: i64) -> Self {
        StoreError::NotFound {
            entity: "Message",
            id,
            user_id: user_id.into(),
        }
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }
}
