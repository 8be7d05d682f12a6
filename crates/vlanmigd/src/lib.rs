//! vlanmigd - vendor-gated VLAN migration for access switches
//!
//! Inspects a switch's MAC-address table (whole source-VLAN slice or a
//! single interface), decides per port whether an automated VLAN change is
//! safe, applies it through a device session, and records the outcome in a
//! durable ledger so no port is ever auto-migrated twice.
//!
//! Modules:
//! - [`parser`]: MAC-address-table text → observations
//! - [`inspector`]: exact-match static-access safety gate
//! - [`ledger`]: file-backed replayable migration record
//! - [`engine`]: per-candidate state machine with per-port exclusion
//! - [`commands`]: IOS command builders
//! - [`transport`]: process-backed device session

pub mod commands;
pub mod engine;
pub mod inspector;
pub mod ledger;
pub mod parser;
pub mod transport;

pub use engine::{MigrationEngine, Outcome, SkipReason, TriggerRequest};
pub use inspector::PortSafetyInspector;
pub use ledger::FileLedger;
pub use transport::ProcessSession;
