//! Process-backed device session.
//!
//! Each exchange spawns the configured transport program (typically `ssh`
//! with key-based auth) with the command appended as the final argument,
//! and reads the device output from stdout. A bounded timeout covers the
//! whole exchange; the child is killed on drop so an aborted evaluation
//! never leaves a hung process behind.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use vlanmig_common::{DeviceSession, SessionError, TransportConfig};

/// Command that persists running config to startup config.
const SAVE_CONFIG_CMD: &str = "write memory";

/// One-process-per-exchange session to a single switch.
pub struct ProcessSession {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ProcessSession {
    /// Builds a session for a host, substituting `{host}` / `{user}`
    /// placeholders in the configured arguments.
    pub fn connect(config: &TransportConfig, host: &str, timeout: Duration) -> Self {
        let args = config
            .args
            .iter()
            .map(|a| a.replace("{host}", host).replace("{user}", &config.username))
            .collect();
        Self {
            program: config.program.clone(),
            args,
            timeout,
        }
    }

    async fn exchange(&self, command: &str) -> Result<String, SessionError> {
        debug!(program = %self.program, command = %command, "Device exchange");

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Err(_) => {
                return Err(SessionError::Timeout {
                    command: command.to_string(),
                    timeout_secs: self.timeout.as_secs(),
                })
            }
            Ok(Err(e)) => {
                return Err(SessionError::connectivity(format!(
                    "cannot spawn {}: {}",
                    self.program, e
                )))
            }
            Ok(Ok(output)) => output,
        };

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if output.status.success() {
            Ok(stdout)
        } else {
            warn!(
                command = %command,
                code = output.status.code().unwrap_or(-1),
                stderr = %stderr,
                "Device exchange failed"
            );
            Err(SessionError::rejected(
                command,
                if stderr.is_empty() { stdout } else { stderr },
            ))
        }
    }
}

#[async_trait]
impl DeviceSession for ProcessSession {
    async fn send_command(&mut self, command: &str) -> Result<String, SessionError> {
        self.exchange(command).await
    }

    async fn send_config_set(&mut self, commands: &[String]) -> Result<(), SessionError> {
        let script = format!("configure terminal\n{}\nend", commands.join("\n"));
        self.exchange(&script).await.map(|_| ())
    }

    async fn save_config(&mut self) -> Result<(), SessionError> {
        self.exchange(SAVE_CONFIG_CMD).await.map(|_| ())
    }
}
