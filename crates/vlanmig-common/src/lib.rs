//! Common infrastructure for the VLAN migration daemon.
//!
//! This crate provides the pieces shared between the daemon and its test
//! tooling:
//!
//! - [`mac`]: MAC address normalization and vendor OUI lookup
//! - [`types`]: port keys, observations, and migration records
//! - [`session`]: the [`DeviceSession`] trait, the remote command boundary
//! - [`ledger`]: the [`Ledger`] trait, the durable migration record boundary
//! - [`config`]: policy and daemon configuration
//! - [`error`]: error types for migration operations
//!
//! # Architecture
//!
//! The daemon evaluates candidate observations through a fixed pipeline:
//!
//! 1. Parse MAC-address-table output into observations
//! 2. Gate each observation (ledger dedup, port mode, vendor, VLAN)
//! 3. Apply the VLAN change through a device session
//! 4. Commit the outcome to a durable, replayable ledger

pub mod config;
pub mod error;
pub mod ledger;
pub mod mac;
pub mod session;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{defaults, MigrationPolicy, TransportConfig, VlanmigConfig};
pub use error::{MigrationError, MigrationResult, SessionError};
pub use ledger::Ledger;
pub use mac::{MacAddress, MacParseError, OuiPrefix, VendorRegistry};
pub use session::DeviceSession;
pub use types::{MacObservation, MigrationRecord, PortKey};
