//! Core TodoStore implementation

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::{Conversation, Message, Role, StatusFilter, Task};
use crate::now_ms;

/// The relational store behind the todo manager
///
/// Wraps a single SQLite connection behind a mutex. Store calls are short,
/// synchronous, and transactional at the SQLite layer; every operation is
/// scoped by `user_id`.
#[derive(Clone)]
pub struct TodoStore {
    conn: Arc<Mutex<Connection>>,
}

impl TodoStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        debug!(path = %path.as_ref().display(), "Opened todo store");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory store (for tests)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create all tables if they do not exist
    pub fn create_tables(&self) -> Result<(), StoreError> {
        let conn = self.conn();
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tasks (
                 id          INTEGER PRIMARY KEY AUTOINCREMENT,
                 user_id     TEXT NOT NULL,
                 title       TEXT NOT NULL,
                 description TEXT,
                 completed   INTEGER NOT NULL DEFAULT 0,
                 created_at  INTEGER NOT NULL,
                 updated_at  INTEGER NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_tasks_user ON tasks(user_id);
             CREATE INDEX IF NOT EXISTS idx_tasks_completed ON tasks(user_id, completed);

             CREATE TABLE IF NOT EXISTS conversations (
                 id         INTEGER PRIMARY KEY AUTOINCREMENT,
                 user_id    TEXT NOT NULL,
                 created_at INTEGER NOT NULL,
                 updated_at INTEGER NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_conversations_user ON conversations(user_id);

             CREATE TABLE IF NOT EXISTS messages (
                 id              INTEGER PRIMARY KEY AUTOINCREMENT,
                 user_id         TEXT NOT NULL,
                 conversation_id INTEGER NOT NULL REFERENCES conversations(id),
                 role            TEXT NOT NULL CHECK (role IN ('user', 'assistant')),
                 content         TEXT NOT NULL,
                 created_at      INTEGER NOT NULL,
                 updated_at      INTEGER NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_messages_user ON messages(user_id);
             CREATE INDEX IF NOT EXISTS idx_messages_conversation ON messages(conversation_id);",
        )?;
        info!("Tables ready");
        Ok(())
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    /// Create a new task. Fails with Validation if the trimmed title is empty.
    pub fn create_task(
        &self,
        user_id: &str,
        title: &str,
        description: Option<&str>,
    ) -> Result<Task, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::Validation("Task title cannot be empty".to_string()));
        }

        let now = now_ms();
        let conn = self.conn();
        conn.execute(
            "INSERT INTO tasks (user_id, title, description, completed, created_at, updated_at)
             VALUES (?1, ?2, ?3, 0, ?4, ?4)",
            params![user_id, title, description, now],
        )?;
        let id = conn.last_insert_rowid();
        debug!(%user_id, id, "Created task");

        Ok(Task {
            id,
            user_id: user_id.to_string(),
            title: title.to_string(),
            description: description.map(|d| d.to_string()),
            completed: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a task by ID for the user. Returns None when absent.
    pub fn get_task_by_id(&self, user_id: &str, task_id: i64) -> Result<Option<Task>, StoreError> {
        let conn = self.conn();
        let task = conn
            .query_row(
                "SELECT id, user_id, title, description, completed, created_at, updated_at
                 FROM tasks WHERE user_id = ?1 AND id = ?2",
                params![user_id, task_id],
                task_from_row,
            )
            .optional()?;
        Ok(task)
    }

    /// List the user's tasks with optional status filtering
    pub fn list_tasks(&self, user_id: &str, status: StatusFilter) -> Result<Vec<Task>, StoreError> {
        let conn = self.conn();
        let sql = match status {
            StatusFilter::All => {
                "SELECT id, user_id, title, description, completed, created_at, updated_at
                 FROM tasks WHERE user_id = ?1 ORDER BY created_at, id"
            }
            StatusFilter::Completed => {
                "SELECT id, user_id, title, description, completed, created_at, updated_at
                 FROM tasks WHERE user_id = ?1 AND completed = 1 ORDER BY created_at, id"
            }
            StatusFilter::Pending => {
                "SELECT id, user_id, title, description, completed, created_at, updated_at
                 FROM tasks WHERE user_id = ?1 AND completed = 0 ORDER BY created_at, id"
            }
        };

        let mut stmt = conn.prepare(sql)?;
        let tasks = stmt
            .query_map(params![user_id], task_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        debug!(%user_id, %status, count = tasks.len(), "Listed tasks");
        Ok(tasks)
    }

    /// Update a task's title and/or description. NotFound when absent for the user.
    pub fn update_task(
        &self,
        user_id: &str,
        task_id: i64,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<Task, StoreError> {
        let mut task = self
            .get_task_by_id(user_id, task_id)?
            .ok_or_else(|| StoreError::task_not_found(user_id, task_id))?;

        if let Some(title) = title {
            let title = title.trim();
            if title.is_empty() {
                return Err(StoreError::Validation("Task title cannot be empty".to_string()));
            }
            task.title = title.to_string();
        }
        if let Some(description) = description {
            task.description = Some(description.to_string());
        }
        task.updated_at = now_ms();

        let conn = self.conn();
        conn.execute(
            "UPDATE tasks SET title = ?1, description = ?2, updated_at = ?3
             WHERE user_id = ?4 AND id = ?5",
            params![task.title, task.description, task.updated_at, user_id, task_id],
        )?;
        debug!(%user_id, task_id, "Updated task");
        Ok(task)
    }

    /// Mark a task as completed. NotFound when absent for the user.
    pub fn complete_task(&self, user_id: &str, task_id: i64) -> Result<Task, StoreError> {
        let mut task = self
            .get_task_by_id(user_id, task_id)?
            .ok_or_else(|| StoreError::task_not_found(user_id, task_id))?;

        task.completed = true;
        task.updated_at = now_ms();

        let conn = self.conn();
        conn.execute(
            "UPDATE tasks SET completed = 1, updated_at = ?1 WHERE user_id = ?2 AND id = ?3",
            params![task.updated_at, user_id, task_id],
        )?;
        debug!(%user_id, task_id, "Completed task");
        Ok(task)
    }

    /// Delete a task, returning it. NotFound when absent for the user.
    pub fn delete_task(&self, user_id: &str, task_id: i64) -> Result<Task, StoreError> {
        let task = self
            .get_task_by_id(user_id, task_id)?
            .ok_or_else(|| StoreError::task_not_found(user_id, task_id))?;

        let conn = self.conn();
        conn.execute(
            "DELETE FROM tasks WHERE user_id = ?1 AND id = ?2",
            params![user_id, task_id],
        )?;
        debug!(%user_id, task_id, "Deleted task");
        Ok(task)
    }

    // ------------------------------------------------------------------
    // Conversations
    // ------------------------------------------------------------------

    /// Create a new conversation for the user
    pub fn create_conversation(&self, user_id: &str) -> Result<Conversation, StoreError> {
        let now = now_ms();
        let conn = self.conn();
        conn.execute(
            "INSERT INTO conversations (user_id, created_at, updated_at) VALUES (?1, ?2, ?2)",
            params![user_id, now],
        )?;
        let id = conn.last_insert_rowid();
        debug!(%user_id, id, "Created conversation");

        Ok(Conversation {
            id,
            user_id: user_id.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a conversation by ID for the user. Returns None when absent.
    pub fn get_conversation_by_id(
        &self,
        user_id: &str,
        conversation_id: i64,
    ) -> Result<Option<Conversation>, StoreError> {
        let conn = self.conn();
        let conversation = conn
            .query_row(
                "SELECT id, user_id, created_at, updated_at
                 FROM conversations WHERE user_id = ?1 AND id = ?2",
                params![user_id, conversation_id],
                conversation_from_row,
            )
            .optional()?;
        Ok(conversation)
    }

    /// List all conversations for the user
    pub fn list_conversations(&self, user_id: &str) -> Result<Vec<Conversation>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, created_at, updated_at
             FROM conversations WHERE user_id = ?1 ORDER BY created_at, id",
        )?;
        let conversations = stmt
            .query_map(params![user_id], conversation_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(conversations)
    }

    /// Refresh a conversation's updated_at. NotFound when absent for the user.
    pub fn touch_conversation(
        &self,
        user_id: &str,
        conversation_id: i64,
    ) -> Result<Conversation, StoreError> {
        let now = now_ms();
        let conn = self.conn();
        let changed = conn.execute(
            "UPDATE conversations SET updated_at = ?1 WHERE user_id = ?2 AND id = ?3",
            params![now, user_id, conversation_id],
        )?;
        if changed == 0 {
            return Err(StoreError::conversation_not_found(user_id, conversation_id));
        }
        drop(conn);

        // Re-read so the caller sees the stored row
        self.get_conversation_by_id(user_id, conversation_id)?
            .ok_or_else(|| StoreError::conversation_not_found(user_id, conversation_id))
    }

    /// Delete a conversation. NotFound when absent for the user.
    pub fn delete_conversation(&self, user_id: &str, conversation_id: i64) -> Result<(), StoreError> {
        let conn = self.conn();
        let changed = conn.execute(
            "DELETE FROM conversations WHERE user_id = ?1 AND id = ?2",
            params![user_id, conversation_id],
        )?;
        if changed == 0 {
            return Err(StoreError::conversation_not_found(user_id, conversation_id));
        }
        debug!(%user_id, conversation_id, "Deleted conversation");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------

    /// Append a message to a conversation. Fails with Validation if the
    /// trimmed content is empty.
    pub fn create_message(
        &self,
        user_id: &str,
        conversation_id: i64,
        role: Role,
        content: &str,
    ) -> Result<Message, StoreError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(StoreError::Validation("Message content cannot be empty".to_string()));
        }

        let now = now_ms();
        let conn = self.conn();
        conn.execute(
            "INSERT INTO messages (user_id, conversation_id, role, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![user_id, conversation_id, role.as_str(), content, now],
        )?;
        let id = conn.last_insert_rowid();
        debug!(%user_id, conversation_id, %role, id, "Created message");

        Ok(Message {
            id,
            user_id: user_id.to_string(),
            conversation_id,
            role,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a message by ID for the user. Returns None when absent.
    pub fn get_message_by_id(&self, user_id: &str, message_id: i64) -> Result<Option<Message>, StoreError> {
        let conn = self.conn();
        let message = conn
            .query_row(
                "SELECT id, user_id, conversation_id, role, content, created_at, updated_at
                 FROM messages WHERE user_id = ?1 AND id = ?2",
                params![user_id, message_id],
                message_from_row,
            )
            .optional()?;
        Ok(message)
    }

    /// Get all messages in a conversation for the user, in history order
    pub fn get_messages_by_conversation(
        &self,
        user_id: &str,
        conversation_id: i64,
    ) -> Result<Vec<Message>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, conversation_id, role, content, created_at, updated_at
             FROM messages WHERE user_id = ?1 AND conversation_id = ?2
             ORDER BY created_at, id",
        )?;
        let messages = stmt
            .query_map(params![user_id, conversation_id], message_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(messages)
    }

    /// Get all messages for the user across conversations
    pub fn list_messages(&self, user_id: &str) -> Result<Vec<Message>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, conversation_id, role, content, created_at, updated_at
             FROM messages WHERE user_id = ?1 ORDER BY created_at, id",
        )?;
        let messages = stmt
            .query_map(params![user_id], message_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(messages)
    }

    /// Update a message's content. NotFound when absent for the user.
    pub fn update_message(
        &self,
        user_id: &str,
        message_id: i64,
        content: &str,
    ) -> Result<Message, StoreError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(StoreError::Validation("Message content cannot be empty".to_string()));
        }

        let mut message = self
            .get_message_by_id(user_id, message_id)?
            .ok_or_else(|| StoreError::message_not_found(user_id, message_id))?;

        message.content = content.to_string();
        message.updated_at = now_ms();

        let conn = self.conn();
        conn.execute(
            "UPDATE messages SET content = ?1, updated_at = ?2 WHERE user_id = ?3 AND id = ?4",
            params![message.content, message.updated_at, user_id, message_id],
        )?;
        Ok(message)
    }

    /// Delete a message. NotFound when absent for the user.
    pub fn delete_message(&self, user_id: &str, message_id: i64) -> Result<(), StoreError> {
        let conn = self.conn();
        let changed = conn.execute(
            "DELETE FROM messages WHERE user_id = ?1 AND id = ?2",
            params![user_id, message_id],
        )?;
        if changed == 0 {
            return Err(StoreError::message_not_found(user_id, message_id));
        }
        Ok(())
    }
}

fn task_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        completed: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn conversation_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Conversation> {
    Ok(Conversation {
        id: row.get(0)?,
        user_id: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

fn message_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    let role_str: String = row.get(3)?;
    let role = Role::parse(&role_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("invalid role: {role_str}").into(),
        )
    })?;

    Ok(Message {
        id: row.get(0)?,
        user_id: row.get(1)?,
        conversation_id: row.get(2)?,
        role,
        content: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
