use std::time::Duration;

use serde_json::json;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::AgentSettings;
use crate::credentials::Credentials;
use crate::error::ChatError;
use crate::process::{describe_exit, run_captured};
use crate::util::truncate_preview;

/// JSON payload passed to the agent CLI as its last argument.
pub fn prompt_payload(prompt: &str) -> Result<String, ChatError> {
    Ok(serde_json::to_string(&json!({ "prompt": prompt }))?)
}

/// Runs the agent CLI once and returns its stdout untouched.
///
/// Credentials only reach the child's environment; the server's own environment is left alone.
pub async fn invoke_agent(
    settings: &AgentSettings,
    creds: &Credentials,
    prompt: &str,
) -> Result<String, ChatError> {
    let payload = prompt_payload(prompt)?;
    let mut cmd = Command::new(&settings.program);
    cmd.args(&settings.args)
        .arg("--agent")
        .arg(&settings.name)
        .arg(&payload)
        .envs(creds.env_pairs());
    if let Some(region) = settings.region.as_deref() {
        cmd.env("AWS_REGION", region);
    }

    info!(agent = %settings.name, "invoking agent");
    debug!(payload = %truncate_preview(&payload, 200), "agent payload");
    let output = run_captured(cmd, Duration::from_secs(settings.timeout_secs))
        .await
        .map_err(|e| ChatError::AgentCommand {
            message: format!("{}: {e}", settings.program),
            stderr: None,
        })?;
    let Some(output) = output else {
        warn!(timeout_secs = settings.timeout_secs, "agent command timed out");
        return Err(ChatError::AgentTimeout {
            timeout_secs: settings.timeout_secs,
        });
    };

    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    if !output.status.success() {
        warn!(status = %output.status, stderr = %truncate_preview(&stderr, 200), "agent command failed");
        return Err(ChatError::AgentCommand {
            message: describe_exit(output.status),
            stderr: Some(stderr),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    debug!(len = stdout.len(), preview = %truncate_preview(&stdout, 200), "agent output");
    if stdout.trim().is_empty() {
        return Err(ChatError::EmptyAgentOutput);
    }
    Ok(stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials {
            access_key_id: "AKIAEXAMPLE".to_string(),
            secret_access_key: "secret".to_string(),
            session_token: "session-token-1".to_string(),
        }
    }

    #[test]
    fn payload_is_json_escaped() {
        assert_eq!(
            prompt_payload(r#"say "hi""#).unwrap(),
            r#"{"prompt":"say \"hi\""}"#
        );
    }

    /// `sh -c SCRIPT --agent NAME PAYLOAD` makes NAME `$1` and PAYLOAD `$2`.
    #[cfg(unix)]
    fn sh(script: &str, timeout_secs: u64) -> AgentSettings {
        AgentSettings {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            name: "test_agent".to_string(),
            timeout_secs,
            region: Some("eu-west-1".to_string()),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn passes_agent_name_payload_and_credentials() {
        let settings = sh(
            r#"printf '%s|%s|%s|%s' "$1" "$2" "$AWS_SESSION_TOKEN" "$AWS_REGION""#,
            5,
        );
        let out = invoke_agent(&settings, &creds(), "hello").await.unwrap();
        assert_eq!(
            out,
            r#"test_agent|{"prompt":"hello"}|session-token-1|eu-west-1"#
        );
        assert_ne!(
            std::env::var("AWS_SESSION_TOKEN").ok().as_deref(),
            Some("session-token-1")
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failure_carries_stderr() {
        let settings = sh("echo 'agent missing' >&2; exit 2", 5);
        match invoke_agent(&settings, &creds(), "hello").await {
            Err(ChatError::AgentCommand { message, stderr }) => {
                assert_eq!(message, "exit status 2");
                assert_eq!(stderr.as_deref(), Some("agent missing\n"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn blank_output_is_its_own_error() {
        let settings = sh("printf '  \\n'", 5);
        assert!(matches!(
            invoke_agent(&settings, &creds(), "hello").await,
            Err(ChatError::EmptyAgentOutput)
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_agent_times_out() {
        let settings = sh("sleep 5", 1);
        assert!(matches!(
            invoke_agent(&settings, &creds(), "hello").await,
            Err(ChatError::AgentTimeout { timeout_secs: 1 })
        ));
    }
}
