//! File-backed migration ledger.
//!
//! The durable store is an append-only text file of whitespace-delimited
//! `KEY=value` tokens, one migration per line:
//!
//! ```text
//! TS=2026-08-29T12:00:00Z SWITCH=10.0.0.1 IFACE=Gi1/0/14 MAC=00:11:22:33:44:55 FROM=3 TO=3010
//! ```
//!
//! Replay is tag-driven, so lines with extra tags from a future version
//! still parse. Malformed lines are warned about and skipped; replay never
//! aborts startup. The in-memory membership set is only ever rebuilt by
//! replay or extended after a completed durable append, so it stays a
//! consistent projection of the log.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::SecondsFormat;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument, warn};

use vlanmig_common::{Ledger, MigrationError, MigrationRecord, MigrationResult, PortKey};

/// Append-only file ledger with replay-on-open.
pub struct FileLedger {
    path: PathBuf,
    migrated: RwLock<HashSet<PortKey>>,
    // Single-writer discipline for the durable append + membership update.
    write_lock: Mutex<()>,
}

impl FileLedger {
    /// Opens the ledger, replaying any existing records.
    ///
    /// A missing file means an empty ledger; the parent directory is
    /// created so the first append cannot fail on a missing path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> MigrationResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| MigrationError::ledger("create dir", e))?;
        }

        let migrated = match tokio::fs::read_to_string(&path).await {
            Ok(text) => Self::replay(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashSet::new(),
            Err(e) => return Err(MigrationError::ledger("replay", e)),
        };

        info!(ports = migrated.len(), "Loaded migration ledger");

        Ok(Self {
            path,
            migrated: RwLock::new(migrated),
            write_lock: Mutex::new(()),
        })
    }

    /// Rebuilds the membership set from log text.
    fn replay(text: &str) -> HashSet<PortKey> {
        let mut migrated = HashSet::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match Self::parse_line(line) {
                Some(key) => {
                    migrated.insert(key);
                }
                None => warn!(line = %line, "Skipping malformed ledger line"),
            }
        }
        migrated
    }

    /// Parses one record line into its port key.
    ///
    /// Token order is not significant and unknown tags are ignored, so the
    /// format stays forward-compatible with additional fields.
    fn parse_line(line: &str) -> Option<PortKey> {
        let mut switch = None;
        let mut interface = None;
        for token in line.split_whitespace() {
            match token.split_once('=') {
                Some(("SWITCH", value)) if !value.is_empty() => switch = Some(value),
                Some(("IFACE", value)) if !value.is_empty() => interface = Some(value),
                _ => {}
            }
        }
        Some(PortKey::new(switch?, interface?))
    }

    /// Formats a record as one durable line.
    fn format_record(record: &MigrationRecord) -> String {
        format!(
            "TS={} SWITCH={} IFACE={} MAC={} FROM={} TO={}",
            record
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            record.port.switch,
            record.port.interface,
            record.mac,
            record.from_vlan,
            record.to_vlan,
        )
    }

    /// Number of migrated ports currently known.
    pub async fn len(&self) -> usize {
        self.migrated.read().await.len()
    }

    /// Returns true if no migrations are recorded.
    pub async fn is_empty(&self) -> bool {
        self.migrated.read().await.is_empty()
    }
}

#[async_trait]
impl Ledger for FileLedger {
    async fn contains(&self, port: &PortKey) -> bool {
        self.migrated.read().await.contains(port)
    }

    #[instrument(skip(self, record), fields(port = %record.port))]
    async fn record(&self, record: &MigrationRecord) -> MigrationResult<()> {
        let _writer = self.write_lock.lock().await;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| MigrationError::ledger("open", e))?;

        let line = format!("{}\n", Self::format_record(record));
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| MigrationError::ledger("append", e))?;
        file.flush()
            .await
            .map_err(|e| MigrationError::ledger("flush", e))?;
        file.sync_all()
            .await
            .map_err(|e| MigrationError::ledger("sync", e))?;

        // Membership only becomes visible once the line is durable.
        self.migrated.write().await.insert(record.port.clone());

        info!(
            mac = %record.mac,
            from = %record.from_vlan,
            to = %record.to_vlan,
            "Recorded migration"
        );
        Ok(())
    }
}
