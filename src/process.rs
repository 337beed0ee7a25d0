use std::io;
use std::process::{ExitStatus, Output, Stdio};
use std::time::Duration;

use tokio::process::Command;

/// Runs `cmd` to completion with captured stdout/stderr.
///
/// Returns `Ok(None)` when the deadline passes; the child is killed when its future is dropped.
pub async fn run_captured(mut cmd: Command, timeout: Duration) -> io::Result<Option<Output>> {
    cmd.kill_on_drop(true)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(result) => result.map(Some),
        Err(_) => Ok(None),
    }
}

pub fn describe_exit(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}
