//! ToolExecutor - dispatches model tool calls to the store

use serde_json::{Value, json};
use tracing::{debug, warn};

use todostore::{StatusFilter, StoreError, Task, TodoStore, ms_to_rfc3339};

use crate::llm::ToolCall;

use super::ToolKind;

/// A tool call and its result, as reported back to the HTTP caller
#[derive(Debug, Clone, serde::Serialize)]
pub struct ToolCallReport {
    pub name: String,
    pub arguments: Value,
    pub result: Value,
}

/// Executes tool calls against the store
///
/// One executor per agent; each call receives the authenticated user_id
/// from the turn, which always overwrites any user_id the model put in the
/// arguments.
#[derive(Clone)]
pub struct ToolExecutor {
    store: TodoStore,
}

impl ToolExecutor {
    /// Create an executor over the given store
    pub fn new(store: TodoStore) -> Self {
        Self { store }
    }

    /// Execute a single tool call
    ///
    /// Unknown tool names and per-tool failures produce an error result
    /// rather than an Err - the turn continues either way.
    pub fn execute(&self, call: &ToolCall, user_id: &str) -> ToolCallReport {
        // Normalize arguments to an object and enforce per-user scoping
        let mut arguments = match &call.arguments {
            Value::Object(map) => Value::Object(map.clone()),
            _ => json!({}),
        };
        arguments["user_id"] = json!(user_id);

        let result = match ToolKind::from_name(&call.name) {
            Some(kind) => self.dispatch(kind, user_id, &arguments),
            None => {
                warn!(name = %call.name, "Unknown tool requested by model");
                error_result(format!("Unknown tool: {}", call.name))
            }
        };

        debug!(name = %call.name, %user_id, "Executed tool call");

        ToolCallReport {
            name: call.name.clone(),
            arguments,
            result,
        }
    }

    /// Execute tool calls sequentially, in call order
    ///
    /// Later calls may logically depend on earlier ones, and synthesis
    /// assumes result order matches call order. Calls with empty names are
    /// skipped entirely (some providers emit them).
    pub fn execute_all(&self, calls: &[ToolCall], user_id: &str) -> Vec<ToolCallReport> {
        calls
            .iter()
            .filter(|call| !call.name.is_empty())
            .map(|call| self.execute(call, user_id))
            .collect()
    }

    fn dispatch(&self, kind: ToolKind, user_id: &str, args: &Value) -> Value {
        match kind {
            ToolKind::AddTask => self.add_task(user_id, args),
            ToolKind::ListTasks => self.list_tasks(user_id, args),
            ToolKind::CompleteTask => self.complete_task(user_id, args),
            ToolKind::DeleteTask => self.delete_task(user_id, args),
            ToolKind::UpdateTask => self.update_task(user_id, args),
        }
    }

    fn add_task(&self, user_id: &str, args: &Value) -> Value {
        let Some(title) = args["title"].as_str() else {
            return error_result("title is required");
        };
        let description = args["description"].as_str();

        match self.store.create_task(user_id, title, description) {
            Ok(task) => json!({
                "task_id": task.id,
                "status": "created",
                "title": task.title,
            }),
            Err(e) => store_error_result(e),
        }
    }

    fn list_tasks(&self, user_id: &str, args: &Value) -> Value {
        let status = StatusFilter::parse(args["status"].as_str().unwrap_or("all"));

        match self.store.list_tasks(user_id, status) {
            Ok(tasks) => json!({
                "tasks": tasks.iter().map(task_json).collect::<Vec<_>>(),
            }),
            Err(e) => store_error_result(e),
        }
    }

    fn complete_task(&self, user_id: &str, args: &Value) -> Value {
        let Some(task_id) = task_id_arg(args) else {
            return error_result("task_id is required");
        };

        match self.store.complete_task(user_id, task_id) {
            Ok(task) => json!({
                "status": "completed",
                "task_id": task.id,
                "title": task.title,
            }),
            Err(e) => store_error_result(e),
        }
    }

    fn delete_task(&self, user_id: &str, args: &Value) -> Value {
        let Some(task_id) = task_id_arg(args) else {
            return error_result("task_id is required");
        };

        match self.store.delete_task(user_id, task_id) {
            Ok(task) => json!({
                "status": "deleted",
                "task_id": task.id,
                "title": task.title,
            }),
            Err(e) => store_error_result(e),
        }
    }

    fn update_task(&self, user_id: &str, args: &Value) -> Value {
        let Some(task_id) = task_id_arg(args) else {
            return error_result("task_id is required");
        };
        let title = args["title"].as_str();
        let description = args["description"].as_str();

        match self.store.update_task(user_id, task_id, title, description) {
            Ok(task) => json!({
                "status": "updated",
                "task_id": task.id,
                "title": task.title,
            }),
            Err(e) => store_error_result(e),
        }
    }
}

/// Extract a task_id argument, tolerating a number or a numeric string
fn task_id_arg(args: &Value) -> Option<i64> {
    match &args["task_id"] {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn task_json(task: &Task) -> Value {
    json!({
        "id": task.id,
        "user_id": task.user_id,
        "title": task.title,
        "description": task.description,
        "completed": task.completed,
        "created_at": ms_to_rfc3339(task.created_at),
        "updated_at": ms_to_rfc3339(task.updated_at),
    })
}

fn error_result(message: impl Into<String>) -> Value {
    json!({
        "status": "error",
        "message": message.into(),
    })
}

fn store_error_result(err: StoreError) -> Value {
    // Validation and NotFound messages are user-presentable; database
    // errors are not, so log the detail and return a generic message.
    match err {
        StoreError::Database(e) => {
            warn!(error = %e, "Store error during tool execution");
            error_result("The task store is currently unavailable")
        }
        other => error_result(other.to_string()),
    }
}
