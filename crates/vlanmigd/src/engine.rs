//! Migration engine.
//!
//! Drives each candidate observation through a fixed gate order and
//! applies the VLAN change at most once per port:
//!
//! 1. ledger dedup (no device traffic for known ports)
//! 2. port administrative mode (fail closed)
//! 3. vendor OUI membership
//! 4. source-VLAN eligibility
//! 5. configuration sequence + save
//! 6. ledger commit
//!
//! Cheap local checks run before anything that issues device commands.
//! Every candidate resolves to exactly one terminal outcome; batch
//! processing evaluates candidates independently and never aborts on a
//! single failure.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use vlanmig_common::{
    DeviceSession, Ledger, MacObservation, MigrationPolicy, MigrationRecord, MigrationResult,
    PortKey, VendorRegistry,
};

use crate::commands;
use crate::inspector::PortSafetyInspector;
use crate::parser;

/// Why a candidate was skipped. Skips are normal terminal outcomes, not
/// errors; the port stays untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The port was migrated by an earlier run.
    AlreadyMigrated,
    /// The port is not a statically configured access port.
    UnsafePortMode,
    /// The observed MAC's OUI is not in the vendor registry.
    VendorNotRecognized,
    /// The observed VLAN is not the configured source VLAN.
    VlanNotEligible,
    /// Nothing is learned on the interface (targeted mode only).
    NoMacLearned,
}

impl SkipReason {
    /// Human-readable reason string, logged and returned to the caller.
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::AlreadyMigrated => "already migrated",
            SkipReason::UnsafePortMode => "unsafe port mode",
            SkipReason::VendorNotRecognized => "vendor not recognized",
            SkipReason::VlanNotEligible => "vlan not eligible",
            SkipReason::NoMacLearned => "no mac learned",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of one candidate evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Configuration applied and durably recorded.
    Committed(MigrationRecord),
    /// Not eligible; nothing changed on the device.
    Skipped(SkipReason),
    /// A device command or ledger write failed; the port remains
    /// unmigrated and eligible for a future pass (unless the failure was
    /// the ledger write after a successful configure, the documented
    /// at-risk window).
    Failed(String),
}

impl Outcome {
    /// Returns true for a committed migration.
    pub fn is_committed(&self) -> bool {
        matches!(self, Outcome::Committed(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Committed(record) => {
                write!(f, "committed: VLAN {} -> {}", record.from_vlan, record.to_vlan)
            }
            Outcome::Skipped(reason) => write!(f, "skipped: {}", reason),
            Outcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Inbound trigger: a switch, optionally narrowed to one interface.
#[derive(Debug, Clone)]
pub struct TriggerRequest {
    /// Switch identity.
    pub switch: String,
    /// Interface for targeted mode; `None` runs a bulk scan.
    pub interface: Option<String>,
}

/// Evaluates candidates and applies migrations at most once per port.
pub struct MigrationEngine {
    policy: MigrationPolicy,
    registry: VendorRegistry,
    inspector: PortSafetyInspector,
    ledger: Arc<dyn Ledger>,
    // Per-port exclusive sections spanning dedup check through commit.
    // Entries are reclaimed after the last evaluation for a port drops
    // its handle, so the map stays bounded by in-flight ports.
    port_locks: DashMap<PortKey, Arc<Mutex<()>>>,
}

impl MigrationEngine {
    /// Creates an engine for the given policy and ledger.
    pub fn new(policy: MigrationPolicy, ledger: Arc<dyn Ledger>) -> MigrationResult<Self> {
        let registry = policy.vendor_registry()?;
        let inspector = PortSafetyInspector::new(&policy.expected_port_mode);
        Ok(Self {
            policy,
            registry,
            inspector,
            ledger,
            port_locks: DashMap::new(),
        })
    }

    /// The policy this engine enforces.
    pub fn policy(&self) -> &MigrationPolicy {
        &self.policy
    }

    fn port_lock(&self, key: &PortKey) -> Arc<Mutex<()>> {
        self.port_locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    #[cfg(test)]
    fn port_lock_count(&self) -> usize {
        self.port_locks.len()
    }

    /// Uniform entry point for ingestion adapters.
    pub async fn handle_trigger<S>(
        &self,
        session: &mut S,
        request: &TriggerRequest,
    ) -> MigrationResult<Vec<(PortKey, Outcome)>>
    where
        S: DeviceSession,
    {
        match &request.interface {
            Some(interface) => {
                let key = PortKey::new(&request.switch, interface);
                let outcome = self
                    .evaluate_interface(session, &request.switch, interface)
                    .await?;
                Ok(vec![(key, outcome)])
            }
            None => self.scan_switch(session, &request.switch).await,
        }
    }

    /// Bulk mode: scan the source-VLAN slice of the MAC table and evaluate
    /// every entry independently. One bad entry never aborts the batch.
    #[instrument(skip(self, session), fields(switch = %switch))]
    pub async fn scan_switch<S>(
        &self,
        session: &mut S,
        switch: &str,
    ) -> MigrationResult<Vec<(PortKey, Outcome)>>
    where
        S: DeviceSession,
    {
        let cmd = commands::show_mac_table_vlan(&self.policy.source_vlan);
        let output = session.send_command(&cmd).await?;

        let observations = parser::parse_mac_table(switch, &output);
        if observations.is_empty() {
            info!("No MAC entries found on source VLAN");
            return Ok(Vec::new());
        }

        let mut results = Vec::with_capacity(observations.len());
        for obs in observations {
            let key = obs.port_key();
            let outcome = self.evaluate(session, &obs).await;
            results.push((key, outcome));
        }
        Ok(results)
    }

    /// Targeted mode: evaluate a single interface.
    ///
    /// The ledger dedup check runs before any device query, so re-triggers
    /// for migrated ports cost nothing on the wire.
    #[instrument(skip(self, session), fields(switch = %switch, interface = %interface))]
    pub async fn evaluate_interface<S>(
        &self,
        session: &mut S,
        switch: &str,
        interface: &str,
    ) -> MigrationResult<Outcome>
    where
        S: DeviceSession,
    {
        let key = PortKey::new(switch, interface);
        if self.ledger.contains(&key).await {
            info!(port = %key, "Skipped: {}", SkipReason::AlreadyMigrated);
            return Ok(Outcome::Skipped(SkipReason::AlreadyMigrated));
        }

        let cmd = commands::show_mac_table_interface(interface);
        let output = session.send_command(&cmd).await?;

        match parser::parse_interface_entry(switch, interface, &output) {
            Some(obs) => Ok(self.evaluate(session, &obs).await),
            None => {
                info!(port = %key, "No MAC learned on interface, likely nothing connected");
                Ok(Outcome::Skipped(SkipReason::NoMacLearned))
            }
        }
    }

    /// Runs one observation through the gate sequence to its terminal
    /// outcome, holding the per-port exclusive section throughout.
    #[instrument(skip(self, session, obs), fields(port = %obs.port_key(), mac = %obs.mac))]
    pub async fn evaluate<S>(&self, session: &mut S, obs: &MacObservation) -> Outcome
    where
        S: DeviceSession,
    {
        let key = obs.port_key();
        let lock = self.port_lock(&key);
        let outcome = {
            let _guard = lock.lock().await;
            self.evaluate_gated(session, obs, &key).await
        };

        // Drop the map entry once no other evaluation holds or awaits it.
        // The strong-count check runs under the shard lock, so it cannot
        // race a concurrent port_lock() clone.
        drop(lock);
        self.port_locks
            .remove_if(&key, |_, lock| Arc::strong_count(lock) == 1);

        outcome
    }

    /// Gate sequence body; caller holds the per-port lock.
    async fn evaluate_gated<S>(
        &self,
        session: &mut S,
        obs: &MacObservation,
        key: &PortKey,
    ) -> Outcome
    where
        S: DeviceSession,
    {
        // 1. Dedup: never touch a port migrated before.
        if self.ledger.contains(key).await {
            return self.skipped(key, SkipReason::AlreadyMigrated);
        }

        // 2. Port mode, fail closed.
        match self
            .inspector
            .is_safe_for_automated_change(session, &obs.interface)
            .await
        {
            Ok(true) => {}
            Ok(false) => return self.skipped(key, SkipReason::UnsafePortMode),
            Err(e) => return self.failed(key, format!("port mode query failed: {}", e)),
        }

        // 3. Vendor OUI.
        if !self.registry.is_recognized(&obs.mac) {
            return self.skipped(key, SkipReason::VendorNotRecognized);
        }

        // 4. Source VLAN.
        if obs.vlan != self.policy.source_vlan {
            return self.skipped(key, SkipReason::VlanNotEligible);
        }

        // 5. Apply the configuration sequence and persist it.
        info!(
            from = %obs.vlan,
            to = %self.policy.destination_vlan,
            "Migrating port"
        );
        let config = commands::migration_config_set(&obs.interface, &self.policy.destination_vlan);
        if let Err(e) = session.send_config_set(&config).await {
            return self.failed(key, format!("configuration error: {}", e));
        }
        if let Err(e) = session.save_config().await {
            return self.failed(key, format!("configuration error: save failed: {}", e));
        }

        // 6. Commit. A failure here leaves the device migrated but
        // unrecorded, the accepted bounded risk window; it is surfaced
        // loudly rather than swallowed.
        let record = MigrationRecord::for_observation(obs, &self.policy.destination_vlan);
        match self.ledger.record(&record).await {
            Ok(()) => {
                info!(port = %key, "Migration committed");
                Outcome::Committed(record)
            }
            Err(e) => {
                error!(
                    port = %key,
                    "Configuration applied but ledger write failed: {}", e
                );
                Outcome::Failed(format!("ledger write failed after configuration: {}", e))
            }
        }
    }

    fn skipped(&self, key: &PortKey, reason: SkipReason) -> Outcome {
        info!(port = %key, "Skipped: {}", reason);
        Outcome::Skipped(reason)
    }

    fn failed(&self, key: &PortKey, reason: String) -> Outcome {
        warn!(port = %key, "Failed: {}", reason);
        Outcome::Failed(reason)
    }
}
