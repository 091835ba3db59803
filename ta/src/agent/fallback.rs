//! Degraded-mode canned responses
//!
//! Used when the agent was constructed without an LLM capability (missing
//! credential). Intent is keyword-matched; no tool calls are made.

/// Produce a canned response for the user's text
pub fn fallback_response(user_input: &str) -> String {
    let lower = user_input.to_lowercase();

    if ["hello", "hi", "hey"].iter().any(|w| lower.contains(w)) {
        return "Hello! I'm your Todo AI assistant. Unfortunately, I'm currently unable to connect \
                to the AI service. You can still manage your tasks manually through the UI."
            .to_string();
    }

    if ["add", "create", "new", "task"].iter().any(|w| lower.contains(w)) {
        return "I understand you'd like to add a task. Unfortunately, I'm currently unable to \
                connect to the AI service. You can still add tasks manually through the UI."
            .to_string();
    }

    if ["list", "show", "see", "view"].iter().any(|w| lower.contains(w)) {
        return "I understand you'd like to see your tasks. Unfortunately, I'm currently unable to \
                connect to the AI service. You can still view your tasks manually through the UI."
            .to_string();
    }

    "I'm currently unable to connect to the AI service. Please check the API configuration or try \
     again later. You can still manage your tasks manually through the UI."
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting() {
        let response = fallback_response("Hello there");
        assert!(response.starts_with("Hello!"));
    }

    #[test]
    fn test_add_intent() {
        let response = fallback_response("please add a reminder");
        assert!(response.contains("add a task"));
    }

    #[test]
    fn test_list_intent() {
        let response = fallback_response("view pending");
        assert!(response.contains("see your tasks"));
    }

    #[test]
    fn test_fallback() {
        let response = fallback_response("what's the weather");
        assert!(response.contains("unable to connect"));
    }
}
