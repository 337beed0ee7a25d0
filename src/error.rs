//! Failures of a single chat turn. Every variant ends up as a JSON error reply, never a crash.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("invalid request format")]
    InvalidRequest,

    #[error("empty prompt")]
    EmptyPrompt,

    #[error("credential command timed out after {timeout_secs}s")]
    CredentialTimeout { timeout_secs: u64 },

    #[error("credential command failed: {message}")]
    CredentialCommand { message: String },

    #[error("credential output malformed: {message}")]
    CredentialFormat { message: String },

    #[error("agent command timed out after {timeout_secs}s")]
    AgentTimeout { timeout_secs: u64 },

    #[error("agent command failed: {message}")]
    AgentCommand {
        message: String,
        stderr: Option<String>,
    },

    #[error("agent command produced no output")]
    EmptyAgentOutput,

    #[error("agent output could not be parsed")]
    Unparsable,

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl ChatError {
    /// Text shown in the chat window.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::InvalidRequest => "Invalid request format".to_string(),
            ChatError::EmptyPrompt => "Please provide a valid prompt".to_string(),
            ChatError::CredentialTimeout { .. } => "Timeout getting AWS credentials".to_string(),
            ChatError::CredentialCommand { message } => {
                format!("Failed to get AWS credentials: {message}")
            }
            ChatError::CredentialFormat { message } => {
                format!("Error getting AWS credentials: {message}")
            }
            ChatError::AgentTimeout { .. } => "Timeout waiting for agent response".to_string(),
            ChatError::AgentCommand { message, stderr } => {
                let mut out = format!("Agentcore command failed: {message}");
                if let Some(details) = stderr.as_deref().filter(|s| !s.trim().is_empty()) {
                    out.push_str("\nError details: ");
                    out.push_str(details.trim_end());
                }
                out
            }
            ChatError::EmptyAgentOutput => {
                "Agentcore returned no output. Please check agentcore logs or configuration."
                    .to_string()
            }
            ChatError::Unparsable => {
                "I'm having trouble processing the response right now. Please try again."
                    .to_string()
            }
            ChatError::Internal { message } => format!("Unexpected error: {message}"),
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Internal {
            message: err.to_string(),
        }
    }
}
