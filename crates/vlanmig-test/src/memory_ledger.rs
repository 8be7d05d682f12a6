//! In-memory ledger for tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use vlanmig_common::{Ledger, MigrationRecord, MigrationResult, PortKey};

/// Ledger backed by a plain in-memory set. Not durable; tests that need
/// replay semantics use the daemon's file ledger with a temp file.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    migrated: Mutex<HashSet<PortKey>>,
    records: Mutex<Vec<MigrationRecord>>,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger pre-seeded with already-migrated ports.
    pub fn with_ports<I>(ports: I) -> Self
    where
        I: IntoIterator<Item = PortKey>,
    {
        Self {
            migrated: Mutex::new(ports.into_iter().collect()),
            records: Mutex::new(Vec::new()),
        }
    }

    /// Records written so far, in order.
    pub fn records(&self) -> Vec<MigrationRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn contains(&self, port: &PortKey) -> bool {
        self.migrated.lock().unwrap().contains(port)
    }

    async fn record(&self, record: &MigrationRecord) -> MigrationResult<()> {
        self.records.lock().unwrap().push(record.clone());
        self.migrated.lock().unwrap().insert(record.port.clone());
        Ok(())
    }
}
