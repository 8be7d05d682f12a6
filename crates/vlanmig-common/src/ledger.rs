//! Ledger abstraction.
//!
//! The ledger is the durable, restart-safe record of completed migrations,
//! keyed by [`PortKey`]. Storage mechanics live behind this trait; the
//! daemon ships a file-backed implementation, tests use an in-memory one.

use async_trait::async_trait;

use crate::error::MigrationResult;
use crate::types::{MigrationRecord, PortKey};

/// Durable record of ports already migrated.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Returns true if the port has already been migrated.
    ///
    /// Consulted before any migration attempt; O(1), may run concurrently
    /// with other reads.
    async fn contains(&self, port: &PortKey) -> bool;

    /// Durably appends a completed migration and updates membership.
    ///
    /// Membership for the port must not be observable until the durable
    /// write has completed; writes are serialized against each other.
    async fn record(&self, record: &MigrationRecord) -> MigrationResult<()>;
}
