//! End-to-end engine tests against the file-backed ledger.

use std::sync::Arc;
use std::time::Duration;

use vlanmig_common::{
    defaults, Ledger, MacAddress, MacObservation, MigrationPolicy, PortKey,
};
use vlanmigd::{commands, FileLedger, MigrationEngine, Outcome, SkipReason, TriggerRequest};
use vlanmig_test::{
    mac_table_interface, mac_table_vlan3, ScriptedSession, STATIC_ACCESS_MODE, UNSAFE_MODES,
};

fn dell_policy() -> MigrationPolicy {
    MigrationPolicy {
        source_vlan: "3".to_string(),
        destination_vlan: "3010".to_string(),
        vendor_ouis: vec!["00:11:22".to_string(), "00:06:5B".to_string()],
        expected_port_mode: defaults::EXPECTED_PORT_MODE.to_string(),
    }
}

async fn file_engine(dir: &tempfile::TempDir) -> (MigrationEngine, Arc<FileLedger>) {
    let ledger = Arc::new(
        FileLedger::open(dir.path().join("migrations.log"))
            .await
            .unwrap(),
    );
    let engine = MigrationEngine::new(dell_policy(), Arc::clone(&ledger) as Arc<dyn Ledger>)
        .expect("valid policy");
    (engine, ledger)
}

fn safe_mode_for(session: ScriptedSession, interface: &str) -> ScriptedSession {
    session.with_response(commands::show_switchport_mode(interface), STATIC_ACCESS_MODE)
}

/// Happy path: eligible observation reaches Committed and
/// the ledger durably holds the port.
#[tokio::test]
async fn end_to_end_commit() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, ledger) = file_engine(&dir).await;

    let session = ScriptedSession::new().with_response(
        commands::show_mac_table_interface("Gi1/0/14"),
        mac_table_interface("3", "0011.2233.4455", "Gi1/0/14"),
    );
    let mut session = safe_mode_for(session, "Gi1/0/14");
    let log = session.log();

    let request = TriggerRequest {
        switch: "10.0.0.1".to_string(),
        interface: Some("Gi1/0/14".to_string()),
    };
    let results = engine.handle_trigger(&mut session, &request).await.unwrap();

    assert_eq!(results.len(), 1);
    let (port, outcome) = &results[0];
    assert_eq!(*port, PortKey::new("10.0.0.1", "Gi1/0/14"));

    match outcome {
        Outcome::Committed(record) => {
            assert_eq!(record.from_vlan, "3");
            assert_eq!(record.to_vlan, "3010");
            assert_eq!(record.mac.as_str(), "00:11:22:33:44:55");
        }
        other => panic!("expected Committed, got {:?}", other),
    }

    assert!(ledger.contains(&PortKey::new("10.0.0.1", "Gi1/0/14")).await);

    let log = log.lock().unwrap();
    assert_eq!(log.config_sets.len(), 1);
    assert_eq!(log.saves, 1);
}

/// Idempotency: an already-migrated port always skips with zero
/// configuration commands, on re-trigger and on restart.
#[tokio::test]
async fn idempotency_across_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let (engine, _) = file_engine(&dir).await;
        let session = ScriptedSession::new().with_response(
            commands::show_mac_table_interface("Gi1/0/14"),
            mac_table_interface("3", "0011.2233.4455", "Gi1/0/14"),
        );
        let mut session = safe_mode_for(session, "Gi1/0/14");
        let outcome = engine
            .evaluate_interface(&mut session, "10.0.0.1", "Gi1/0/14")
            .await
            .unwrap();
        assert!(outcome.is_committed());
    }

    // Fresh engine, fresh ledger instance, same durable log.
    let (engine, _) = file_engine(&dir).await;
    let mut session = ScriptedSession::new();
    let log = session.log();
    let outcome = engine
        .evaluate_interface(&mut session, "10.0.0.1", "Gi1/0/14")
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Skipped(SkipReason::AlreadyMigrated));
    let log = log.lock().unwrap();
    assert!(log.commands.is_empty());
    assert!(log.config_sets.is_empty());
}

/// Two racing evaluations of the same port serialize: one commits, the
/// other observes the commit and skips, and only one configuration set
/// reaches the wire.
#[tokio::test]
async fn concurrent_evaluations_commit_once() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, ledger) = file_engine(&dir).await;
    let engine = Arc::new(engine);

    let obs = MacObservation {
        switch: "10.0.0.1".to_string(),
        interface: "Gi1/0/14".to_string(),
        vlan: "3".to_string(),
        mac: "0011.2233.4455".parse().unwrap(),
    };

    let mut handles = Vec::new();
    let mut logs = Vec::new();
    for _ in 0..2 {
        let mut session = safe_mode_for(ScriptedSession::new(), "Gi1/0/14")
            .with_latency(Duration::from_millis(50));
        logs.push(session.log());
        let engine = Arc::clone(&engine);
        let obs = obs.clone();
        handles.push(tokio::spawn(async move {
            engine.evaluate(&mut session, &obs).await
        }));
    }

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap());
    }

    let committed = outcomes.iter().filter(|o| o.is_committed()).count();
    assert_eq!(committed, 1, "outcomes: {:?}", outcomes);
    assert!(outcomes.contains(&Outcome::Skipped(SkipReason::AlreadyMigrated)));

    let config_sets: usize = logs
        .iter()
        .map(|log| log.lock().unwrap().config_sets.len())
        .sum();
    assert_eq!(config_sets, 1);
    assert!(ledger.contains(&obs.port_key()).await);
}

/// Fail-closed safety: every mode string other than the exact expected
/// value keeps the port untouched.
#[tokio::test]
async fn fail_closed_port_modes() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, ledger) = file_engine(&dir).await;

    let obs = MacObservation {
        switch: "10.0.0.1".to_string(),
        interface: "Gi1/0/14".to_string(),
        vlan: "3".to_string(),
        mac: "0011.2233.4455".parse().unwrap(),
    };

    for mode in UNSAFE_MODES {
        let mut session = ScriptedSession::new().with_fallback(*mode);
        let outcome = engine.evaluate(&mut session, &obs).await;
        assert_eq!(
            outcome,
            Outcome::Skipped(SkipReason::UnsafePortMode),
            "mode {:?} must skip",
            mode
        );
    }
    assert!(!ledger.contains(&obs.port_key()).await);
}

/// Canonical MAC equivalence across separator and case forms.
#[test]
fn canonical_mac_equivalence() {
    let forms = [
        "0011.2233.4455".to_string(),
        "00:11:22:33:44:55".to_string(),
        "00-11-22-33-44-55".to_string(),
        "0011.2233.4455".to_uppercase(),
        "00:11:22:33:44:55".to_uppercase(),
    ]
    .map(|f| f.parse::<MacAddress>().unwrap());

    for mac in &forms {
        assert_eq!(mac, &forms[0]);
        assert_eq!(mac.as_str(), "00:11:22:33:44:55");
    }
}

/// Batch isolation: a configuration error on one entry leaves the other
/// entries with their own correct terminal states.
#[tokio::test]
async fn batch_isolation() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, ledger) = file_engine(&dir).await;

    // Five entries on VLAN 3: two eligible vendor devices, one on a trunk
    // port, one unknown vendor, one eligible.
    let table = "\
   3    0011.2233.0001    DYNAMIC     Gi1/0/1
   3    0011.2233.0002    DYNAMIC     Gi1/0/2
   3    0011.2233.0003    DYNAMIC     Gi1/0/3
   3    aabb.ccdd.0004    DYNAMIC     Gi1/0/4
   3    0006.5b00.0005    DYNAMIC     Gi1/0/5
";

    // Gi1/0/3 is a trunk; everything else reports static access. The mock
    // rejects every config set, so eligible ports fail while the rest
    // still reach their skip states.
    let mut session = ScriptedSession::new()
        .with_response(commands::show_mac_table_vlan("3"), table)
        .with_response(
            commands::show_switchport_mode("Gi1/0/3"),
            "Administrative Mode: trunk",
        )
        .with_fallback(STATIC_ACCESS_MODE)
        .with_config_failure();

    let results = engine.scan_switch(&mut session, "10.0.0.1").await.unwrap();
    assert_eq!(results.len(), 5);

    let outcome_for = |iface: &str| {
        results
            .iter()
            .find(|(k, _)| k.interface == iface)
            .map(|(_, o)| o.clone())
            .unwrap()
    };

    assert!(matches!(outcome_for("Gi1/0/1"), Outcome::Failed(_)));
    assert!(matches!(outcome_for("Gi1/0/2"), Outcome::Failed(_)));
    assert_eq!(
        outcome_for("Gi1/0/3"),
        Outcome::Skipped(SkipReason::UnsafePortMode)
    );
    assert_eq!(
        outcome_for("Gi1/0/4"),
        Outcome::Skipped(SkipReason::VendorNotRecognized)
    );
    assert!(matches!(outcome_for("Gi1/0/5"), Outcome::Failed(_)));

    // Nothing committed, nothing recorded.
    assert!(ledger.is_empty().await);
}

/// Bulk scan commits eligible ports and records each exactly once.
#[tokio::test]
async fn bulk_scan_commits_eligible_ports() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, ledger) = file_engine(&dir).await;

    let table = "\
   3    0011.2233.0001    DYNAMIC     Gi1/0/1
   3    aabb.ccdd.0002    DYNAMIC     Gi1/0/2
   3    0011.2233.0003    DYNAMIC     Gi1/0/3
";
    let mut session = ScriptedSession::new()
        .with_response(commands::show_mac_table_vlan("3"), table)
        .with_fallback(STATIC_ACCESS_MODE);

    let results = engine.scan_switch(&mut session, "10.0.0.1").await.unwrap();
    let committed = results.iter().filter(|(_, o)| o.is_committed()).count();
    assert_eq!(committed, 2);
    assert_eq!(ledger.len().await, 2);
    assert!(ledger.contains(&PortKey::new("10.0.0.1", "Gi1/0/1")).await);
    assert!(ledger.contains(&PortKey::new("10.0.0.1", "Gi1/0/3")).await);
    assert!(!ledger.contains(&PortKey::new("10.0.0.1", "Gi1/0/2")).await);

    // A second scan of the same table is a pure no-op on the wire.
    let mut session = ScriptedSession::new()
        .with_response(commands::show_mac_table_vlan("3"), table)
        .with_fallback(STATIC_ACCESS_MODE);
    let log = session.log();
    let results = engine.scan_switch(&mut session, "10.0.0.1").await.unwrap();
    assert!(results
        .iter()
        .filter(|(k, _)| k.interface != "Gi1/0/2")
        .all(|(_, o)| *o == Outcome::Skipped(SkipReason::AlreadyMigrated)));
    assert!(log.lock().unwrap().config_sets.is_empty());
}

/// Vendor membership stays exact across a realistic Catalyst table: only
/// the registered-OUI entry migrates.
#[tokio::test]
async fn catalyst_table_vendor_gating() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, ledger) = file_engine(&dir).await;

    let mut session = ScriptedSession::new()
        .with_response(commands::show_mac_table_vlan("3"), mac_table_vlan3())
        .with_fallback(STATIC_ACCESS_MODE);

    let results = engine.scan_switch(&mut session, "10.0.0.1").await.unwrap();
    assert_eq!(results.len(), 3);
    // Only 0006.5b... carries a registered OUI; f8ca.b8 and aabb.cc do not.
    assert_eq!(ledger.len().await, 1);
    assert!(ledger.contains(&PortKey::new("10.0.0.1", "Gi1/0/14")).await);
}

/// Connectivity loss aborts the switch evaluation without touching the
/// ledger.
#[tokio::test]
async fn connectivity_error_aborts_scan() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, ledger) = file_engine(&dir).await;

    let mut session = ScriptedSession::new().with_connectivity_failure();
    assert!(engine.scan_switch(&mut session, "10.0.0.1").await.is_err());
    assert!(ledger.is_empty().await);
}
