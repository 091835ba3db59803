//! Deterministic reply synthesis
//!
//! When a turn executed tool calls, the reply is built from templates over
//! the tool results - one sentence per tool, in call order - instead of
//! asking the model to narrate them (which would cost a second round-trip).
//! Provider failures map to a fixed set of user-facing apologies; raw
//! provider detail never leaves the server.

use crate::llm::LlmError;
use crate::tools::ToolCallReport;

/// Reply used when the model produced neither text nor tool calls
pub const GENERIC_ACK: &str = "I've processed your request. Is there anything else I can help you with?";

/// Build a natural-language reply from executed tool calls
pub fn synthesize_tool_response(reports: &[ToolCallReport]) -> String {
    if reports.is_empty() {
        return GENERIC_ACK.to_string();
    }

    let sentences: Vec<String> = reports.iter().map(sentence_for).collect();
    sentences.join(" ")
}

fn sentence_for(report: &ToolCallReport) -> String {
    let status = report.result["status"].as_str().unwrap_or("unknown");
    let message = report.result["message"].as_str().unwrap_or("Unknown error");

    match report.name.as_str() {
        "add_task" => {
            if status == "created" {
                let title = report.arguments["title"].as_str().unwrap_or("unknown task");
                format!("I've added the task '{}' for you!", title)
            } else {
                format!("I couldn't add that task. {}", message)
            }
        }
        "list_tasks" => match report.result["tasks"].as_array() {
            Some(tasks) if !tasks.is_empty() => {
                let titles: Vec<&str> = tasks
                    .iter()
                    .map(|t| t["title"].as_str().unwrap_or("unknown"))
                    .collect();
                if titles.len() == 1 {
                    format!("Here is your task: {}", titles[0])
                } else {
                    format!("Here are your tasks: {}", titles.join(", "))
                }
            }
            Some(_) => "You don't have any tasks at the moment.".to_string(),
            None => format!("I couldn't list your tasks. {}", message),
        },
        "complete_task" => {
            if status == "completed" {
                "I've marked that task as completed!".to_string()
            } else {
                format!("I couldn't complete that task. {}", message)
            }
        }
        "delete_task" => {
            if status == "deleted" {
                "I've deleted that task for you.".to_string()
            } else {
                format!("I couldn't delete that task. {}", message)
            }
        }
        "update_task" => {
            if status == "updated" {
                "I've updated that task for you.".to_string()
            } else {
                format!("I couldn't update that task. {}", message)
            }
        }
        _ => "I've processed your request.".to_string(),
    }
}

/// Map a provider error to a fixed user-facing apology
///
/// The raw error is logged by the caller; only these canned strings reach
/// the user.
pub fn provider_apology(err: &LlmError) -> &'static str {
    match err {
        LlmError::RateLimited { .. } => {
            "I'm currently experiencing high demand and need a moment to process your request. \
             Please wait a few seconds and try again."
        }
        LlmError::ApiError { status, message } => {
            let lower = message.to_lowercase();
            if lower.contains("quota") || lower.contains("exceeded") || lower.contains("insufficient") {
                "I'm currently experiencing high demand and need a moment to process your request. \
                 This is a temporary issue with the AI service. Please try again in a few minutes."
            } else if *status == 401 || *status == 403 || lower.contains("auth") || lower.contains("api key") || lower.contains("api_key") {
                "There seems to be an issue with my connection to the AI service. \
                 Please contact the administrator to check the API configuration."
            } else if *status == 404 || (lower.contains("model") && lower.contains("not found")) || lower.contains("not_found") {
                "I'm having trouble connecting to the AI service. \
                 Please contact the administrator to check if the correct model is configured."
            } else {
                "I encountered an error processing your request. Please try again."
            }
        }
        LlmError::InvalidResponse(_) | LlmError::Json(_) => {
            "I had trouble processing your request. Could you please rephrase it? \
             For example, instead of 'add task buy milk', you could say 'I want to add a task to buy milk'."
        }
        LlmError::Network(_) => "I encountered an error processing your request. Please try again.",
    }
}
