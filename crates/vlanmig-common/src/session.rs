//! Device session abstraction.
//!
//! A [`DeviceSession`] is the remote command-execution collaborator: a
//! request/response channel to one switch. Implementations live outside
//! the core (a process-backed transport in the daemon, scripted mocks in
//! tests). Sessions are not shared between concurrent evaluations; every
//! method takes `&mut self` so exclusive use is enforced by the type
//! system for the duration of an exchange.

use async_trait::async_trait;

use crate::error::SessionError;

/// Request/response session to a single switch.
#[async_trait]
pub trait DeviceSession: Send {
    /// Sends one exec-mode command and returns the device's output.
    async fn send_command(&mut self, command: &str) -> Result<String, SessionError>;

    /// Sends an ordered configuration command sequence.
    ///
    /// The sequence is applied in order; the first rejected command fails
    /// the whole call and the device is left as the partial application
    /// left it (the caller surfaces this as a failed outcome).
    async fn send_config_set(&mut self, commands: &[String]) -> Result<(), SessionError>;

    /// Persists the running configuration to startup configuration.
    async fn save_config(&mut self) -> Result<(), SessionError>;
}
