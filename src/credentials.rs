use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::CredentialSettings;
use crate::error::ChatError;
use crate::process::{describe_exit, run_captured};
use crate::util::truncate_preview;

/// Short-lived AWS credentials as printed by the credential checkout command.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    #[serde(rename = "AccessKeyId")]
    pub access_key_id: String,
    #[serde(rename = "SecretAccessKey")]
    pub secret_access_key: String,
    #[serde(rename = "SessionToken")]
    pub session_token: String,
}

impl Credentials {
    /// Environment for a child process that needs these credentials.
    pub fn env_pairs(&self) -> [(&'static str, &str); 3] {
        [
            ("AWS_ACCESS_KEY_ID", self.access_key_id.as_str()),
            ("AWS_SECRET_ACCESS_KEY", self.secret_access_key.as_str()),
            ("AWS_SESSION_TOKEN", self.session_token.as_str()),
        ]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .finish()
    }
}

pub fn parse_credentials(text: &str) -> Result<Credentials, ChatError> {
    let creds: Credentials =
        serde_json::from_str(text.trim()).map_err(|e| ChatError::CredentialFormat {
            message: e.to_string(),
        })?;
    for (key, value) in creds.env_pairs() {
        if value.trim().is_empty() {
            return Err(ChatError::CredentialFormat {
                message: format!("{key} is empty"),
            });
        }
    }
    Ok(creds)
}

pub async fn fetch_credentials(settings: &CredentialSettings) -> Result<Credentials, ChatError> {
    let mut cmd = Command::new(&settings.program);
    cmd.args(&settings.args);

    debug!(program = %settings.program, "requesting credentials");
    let output = run_captured(cmd, Duration::from_secs(settings.timeout_secs))
        .await
        .map_err(|e| ChatError::CredentialCommand {
            message: format!("{}: {e}", settings.program),
        })?;
    let Some(output) = output else {
        warn!(timeout_secs = settings.timeout_secs, "credential command timed out");
        return Err(ChatError::CredentialTimeout {
            timeout_secs: settings.timeout_secs,
        });
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!(status = %output.status, "credential command failed");
        let mut message = describe_exit(output.status);
        if !stderr.trim().is_empty() {
            message.push_str(": ");
            message.push_str(&truncate_preview(stderr.trim(), 300));
        }
        return Err(ChatError::CredentialCommand { message });
    }

    let creds = parse_credentials(&String::from_utf8_lossy(&output.stdout))?;
    info!("credentials obtained");
    Ok(creds)
}
