//! Test infrastructure for the VLAN migration daemon
//!
//! Provides:
//! - Scripted mock device sessions with failure injection
//! - An in-memory ledger
//! - Canned MAC-address-table and switchport output fixtures

pub mod fixtures;
mod memory_ledger;
mod mock_session;

pub use fixtures::*;
pub use memory_ledger::MemoryLedger;
pub use mock_session::{ScriptedSession, SessionLog};
