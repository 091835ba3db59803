//! Row types for the three tables
//!
//! Task, Conversation, and Message are plain serde structs; role and status
//! filtering are closed enums so callers never handle free-form strings.

use serde::{Deserialize, Serialize};

/// A user's todo item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Row ID (AUTOINCREMENT)
    pub id: i64,

    /// Owning user - all queries filter on this
    pub user_id: String,

    /// Task title (non-empty after trimming)
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Completion status
    pub completed: bool,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Last update timestamp (Unix milliseconds)
    pub updated_at: i64,
}

/// A container for an ordered sequence of messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub user_id: String,
    pub created_at: i64,
    /// Refreshed on every turn
    pub updated_at: i64,
}

/// A single message within a conversation. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub user_id: String,
    pub conversation_id: i64,
    pub role: Role,
    /// Message text (non-empty after trimming)
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Message role - restricted to the two-value enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Stable column representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Parse from the column representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status filter for listing tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl StatusFilter {
    /// Parse a filter from text. Unrecognized input behaves as All.
    pub fn parse(s: &str) -> Self {
        match s {
            "completed" => StatusFilter::Completed,
            "pending" => StatusFilter::Pending,
            _ => StatusFilter::All,
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Completed => write!(f, "completed"),
            StatusFilter::Pending => write!(f, "pending"),
        }
    }
}
