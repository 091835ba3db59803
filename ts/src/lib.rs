//! TodoStore - SQLite-backed store for tasks, conversations, and messages
//!
//! Owns the three tables behind the natural-language todo manager and the
//! per-table CRUD services. Every operation takes an explicit `user_id` and
//! returns only that user's rows.
//!
//! # Example
//!
//! ```ignore
//! use todostore::TodoStore;
//!
//! let store = TodoStore::open("todo.db")?;
//! store.create_tables()?;
//! let task = store.create_task("u1", "buy milk", None)?;
//! let tasks = store.list_tasks("u1", StatusFilter::Pending)?;
//! ```

pub mod cli;
pub mod config;
mod error;
mod models;
mod store;

pub use error::StoreError;
pub use models::{Conversation, Message, Role, StatusFilter, Task};
pub use store::TodoStore;

/// Current time as Unix milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Render a Unix-milliseconds timestamp as RFC 3339
pub fn ms_to_rfc3339(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_ms_is_recent() {
        let ms = now_ms();
        // Sometime after 2020-01-01
        assert!(ms > 1_577_836_800_000);
    }

    #[test]
    fn test_ms_to_rfc3339() {
        let rendered = ms_to_rfc3339(0);
        assert!(rendered.starts_with("1970-01-01"));
    }
}
