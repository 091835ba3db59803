//! Tool schema - the closed set of operations exposed to the LLM
//!
//! Tool names and parameter names must match the store services exactly:
//! arguments are passed through to dispatch without renaming.

use serde_json::Value;

use crate::llm::ToolDefinition;

/// The known tool kinds
///
/// A closed enum instead of string dispatch; unknown names from the model
/// stay a runtime error path in the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    AddTask,
    ListTasks,
    CompleteTask,
    DeleteTask,
    UpdateTask,
}

impl ToolKind {
    /// Every known tool, in schema order
    pub const ALL: [ToolKind; 5] = [
        ToolKind::AddTask,
        ToolKind::ListTasks,
        ToolKind::CompleteTask,
        ToolKind::DeleteTask,
        ToolKind::UpdateTask,
    ];

    /// Resolve a wire name to a kind. None for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "add_task" => Some(ToolKind::AddTask),
            "list_tasks" => Some(ToolKind::ListTasks),
            "complete_task" => Some(ToolKind::CompleteTask),
            "delete_task" => Some(ToolKind::DeleteTask),
            "update_task" => Some(ToolKind::UpdateTask),
            _ => None,
        }
    }

    /// Tool name (matches the LLM tool_use name)
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::AddTask => "add_task",
            ToolKind::ListTasks => "list_tasks",
            ToolKind::CompleteTask => "complete_task",
            ToolKind::DeleteTask => "delete_task",
            ToolKind::UpdateTask => "update_task",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ToolKind::AddTask => "Add a new task for the user",
            ToolKind::ListTasks => "List tasks for the user with optional status filtering",
            ToolKind::CompleteTask => "Mark a task as completed",
            ToolKind::DeleteTask => "Delete a task",
            ToolKind::UpdateTask => "Update a task",
        }
    }

    /// JSON Schema for input parameters
    pub fn input_schema(&self) -> Value {
        match self {
            ToolKind::AddTask => serde_json::json!({
                "type": "object",
                "properties": {
                    "user_id": {
                        "type": "string",
                        "description": "The user's ID"
                    },
                    "title": {
                        "type": "string",
                        "description": "The task title"
                    },
                    "description": {
                        "type": "string",
                        "description": "Optional task description"
                    }
                },
                "required": ["user_id", "title"]
            }),
            ToolKind::ListTasks => serde_json::json!({
                "type": "object",
                "properties": {
                    "user_id": {
                        "type": "string",
                        "description": "The user's ID"
                    },
                    "status": {
                        "type": "string",
                        "description": "Filter by status: 'all', 'completed', or 'pending'",
                        "enum": ["all", "completed", "pending"]
                    }
                },
                "required": ["user_id"]
            }),
            ToolKind::CompleteTask => serde_json::json!({
                "type": "object",
                "properties": {
                    "user_id": {
                        "type": "string",
                        "description": "The user's ID"
                    },
                    "task_id": {
                        "type": "integer",
                        "description": "The ID of the task to complete"
                    }
                },
                "required": ["user_id", "task_id"]
            }),
            ToolKind::DeleteTask => serde_json::json!({
                "type": "object",
                "properties": {
                    "user_id": {
                        "type": "string",
                        "description": "The user's ID"
                    },
                    "task_id": {
                        "type": "integer",
                        "description": "The ID of the task to delete"
                    }
                },
                "required": ["user_id", "task_id"]
            }),
            ToolKind::UpdateTask => serde_json::json!({
                "type": "object",
                "properties": {
                    "user_id": {
                        "type": "string",
                        "description": "The user's ID"
                    },
                    "task_id": {
                        "type": "integer",
                        "description": "The ID of the task to update"
                    },
                    "title": {
                        "type": "string",
                        "description": "New title for the task (optional)"
                    },
                    "description": {
                        "type": "string",
                        "description": "New description for the task (optional)"
                    }
                },
                "required": ["user_id", "task_id"]
            }),
        }
    }
}

/// The tool list handed to the LLM for function-calling
pub fn definitions() -> Vec<ToolDefinition> {
    ToolKind::ALL
        .iter()
        .map(|kind| ToolDefinition::new(kind.name(), kind.description(), kind.input_schema()))
        .collect()
}
