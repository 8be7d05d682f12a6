//! Port safety inspector.
//!
//! Decides whether an interface is in an administrative mode safe for
//! automated change. The policy is fail-closed: only a byte-exact match
//! against the configured expected value ("Administrative Mode: static
//! access") counts as safe. Dynamic, trunk, monitor, tunnel, empty or
//! unparseable output all classify as unsafe, because a false positive
//! here causes an unwanted live configuration change.

use tracing::{debug, instrument};

use vlanmig_common::{DeviceSession, SessionError};

use crate::commands;

/// Inspects switchport administrative mode through a device session.
#[derive(Debug, Clone)]
pub struct PortSafetyInspector {
    expected_mode: String,
}

impl PortSafetyInspector {
    /// Creates an inspector for the configured expected-mode string.
    pub fn new(expected_mode: impl Into<String>) -> Self {
        Self {
            expected_mode: expected_mode.into(),
        }
    }

    /// Returns `Ok(true)` only for an exact administrative-mode match.
    ///
    /// Session faults propagate so the caller can classify them as a
    /// failed evaluation rather than a silent skip; every successful
    /// exchange with any other mode value is `Ok(false)`.
    #[instrument(skip(self, session), fields(interface = %interface))]
    pub async fn is_safe_for_automated_change<S>(
        &self,
        session: &mut S,
        interface: &str,
    ) -> Result<bool, SessionError>
    where
        S: DeviceSession + ?Sized,
    {
        let cmd = commands::show_switchport_mode(interface);
        let output = session.send_command(&cmd).await?;
        let mode = output.trim();

        let safe = mode == self.expected_mode;
        if !safe {
            debug!(mode = %mode, "Port mode is not the expected static access value");
        }
        Ok(safe)
    }
}
