//! Scripted mock device session.
//!
//! A [`ScriptedSession`] answers `send_command` from a canned
//! command → response table and captures every config set and save for
//! later assertion. Failure injection covers the rejection and
//! connectivity paths.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use vlanmig_common::{DeviceSession, SessionError};

/// Shared capture log so tests can inspect a session after the engine
/// consumed it.
#[derive(Debug, Default)]
pub struct SessionLog {
    /// Exec-mode commands sent, in order.
    pub commands: Vec<String>,
    /// Config sets applied, in order.
    pub config_sets: Vec<Vec<String>>,
    /// Number of save-config calls.
    pub saves: usize,
}

/// Mock session answering from a canned response table.
#[derive(Debug, Default)]
pub struct ScriptedSession {
    responses: HashMap<String, String>,
    fallback: Option<String>,
    fail_config: bool,
    fail_connect: bool,
    latency: Option<Duration>,
    log: Arc<Mutex<SessionLog>>,
}

impl ScriptedSession {
    /// Creates an empty session; unknown commands yield empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the response for one exact command.
    pub fn with_response(mut self, command: impl Into<String>, output: impl Into<String>) -> Self {
        self.responses.insert(command.into(), output.into());
        self
    }

    /// Scripts a response returned for any unscripted command.
    pub fn with_fallback(mut self, output: impl Into<String>) -> Self {
        self.fallback = Some(output.into());
        self
    }

    /// Makes `send_config_set` fail with a command rejection.
    pub fn with_config_failure(mut self) -> Self {
        self.fail_config = true;
        self
    }

    /// Makes every exchange fail with a connectivity error.
    pub fn with_connectivity_failure(mut self) -> Self {
        self.fail_connect = true;
        self
    }

    /// Adds a fixed delay to every exchange, for overlapping-evaluation
    /// tests.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    /// Handle to the capture log, valid after the session is consumed.
    pub fn log(&self) -> Arc<Mutex<SessionLog>> {
        Arc::clone(&self.log)
    }
}

#[async_trait]
impl DeviceSession for ScriptedSession {
    async fn send_command(&mut self, command: &str) -> Result<String, SessionError> {
        if self.fail_connect {
            return Err(SessionError::connectivity("scripted connection loss"));
        }
        self.simulate_latency().await;
        self.log.lock().unwrap().commands.push(command.to_string());
        Ok(self
            .responses
            .get(command)
            .cloned()
            .or_else(|| self.fallback.clone())
            .unwrap_or_default())
    }

    async fn send_config_set(&mut self, commands: &[String]) -> Result<(), SessionError> {
        if self.fail_connect {
            return Err(SessionError::connectivity("scripted connection loss"));
        }
        if self.fail_config {
            return Err(SessionError::rejected(
                commands.first().cloned().unwrap_or_default(),
                "% scripted rejection",
            ));
        }
        self.simulate_latency().await;
        self.log.lock().unwrap().config_sets.push(commands.to_vec());
        Ok(())
    }

    async fn save_config(&mut self) -> Result<(), SessionError> {
        if self.fail_connect {
            return Err(SessionError::connectivity("scripted connection loss"));
        }
        self.log.lock().unwrap().saves += 1;
        Ok(())
    }
}
