//! Core domain types.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::mac::MacAddress;

/// Composite port identity: `(switch, interface)`.
///
/// This is the unit of idempotency. A port may see many devices over time,
/// so dedup tracks ports, never MACs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PortKey {
    /// Switch identity (management IP or hostname).
    pub switch: String,
    /// Interface name (e.g. "Gi1/0/14").
    pub interface: String,
}

impl PortKey {
    /// Creates a new port key.
    pub fn new(switch: impl Into<String>, interface: impl Into<String>) -> Self {
        Self {
            switch: switch.into(),
            interface: interface.into(),
        }
    }
}

impl fmt::Display for PortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.switch, self.interface)
    }
}

/// One entry learned from a MAC-address table, scoped to a switch.
///
/// Produced per scan cycle and discarded after evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacObservation {
    /// Switch the table was read from.
    pub switch: String,
    /// Interface the MAC was learned on.
    pub interface: String,
    /// VLAN the entry was learned in.
    pub vlan: String,
    /// The learned MAC, canonical form.
    pub mac: MacAddress,
}

impl MacObservation {
    /// The port key this observation maps to.
    pub fn port_key(&self) -> PortKey {
        PortKey::new(&self.switch, &self.interface)
    }
}

/// A completed migration. Immutable once written; append-only in the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRecord {
    /// The migrated port.
    pub port: PortKey,
    /// MAC that triggered the migration.
    pub mac: MacAddress,
    /// VLAN the port was on.
    pub from_vlan: String,
    /// VLAN the port was moved to.
    pub to_vlan: String,
    /// When the migration completed.
    pub timestamp: DateTime<Utc>,
}

impl MigrationRecord {
    /// Builds a record for an observation migrated to `to_vlan` now.
    pub fn for_observation(obs: &MacObservation, to_vlan: impl Into<String>) -> Self {
        Self {
            port: obs.port_key(),
            mac: obs.mac.clone(),
            from_vlan: obs.vlan.clone(),
            to_vlan: to_vlan.into(),
            timestamp: Utc::now(),
        }
    }
}
