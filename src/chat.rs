use tracing::{info, warn};

use crate::agent::invoke_agent;
use crate::config::Config;
use crate::credentials::fetch_credentials;
use crate::error::ChatError;
use crate::extract::extract;
use crate::util::truncate_preview;

/// One chat turn: credentials, agent invocation, reply extraction. Holds no per-user state.
#[derive(Debug, Clone)]
pub struct ChatService {
    config: Config,
}

impl ChatService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn reply(&self, prompt: &str) -> Result<String, ChatError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ChatError::EmptyPrompt);
        }
        info!(prompt_len = prompt.len(), "processing prompt");

        let creds = fetch_credentials(&self.config.credentials).await?;
        let raw = invoke_agent(&self.config.agent, &creds, prompt).await?;

        match extract(&raw) {
            Some(reply) => {
                info!(reply_len = reply.len(), "agent reply ready");
                Ok(reply)
            }
            None => {
                warn!(
                    output_len = raw.len(),
                    preview = %truncate_preview(&raw, 200),
                    "could not parse agent output"
                );
                Err(ChatError::Unparsable)
            }
        }
    }
}
