//! vlanmigd - VLAN Migration Daemon
//!
//! Entry point: loads configuration, opens the ledger, and runs either a
//! bulk scan of a switch or a targeted single-interface evaluation.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use vlanmig_common::VlanmigConfig;
use vlanmigd::{FileLedger, MigrationEngine, ProcessSession, TriggerRequest};

#[derive(Parser)]
#[command(name = "vlanmigd", about = "Vendor-gated VLAN migration for access switches")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the whole source-VLAN MAC table of a switch.
    Scan {
        /// Switch management IP or hostname.
        switch: String,
    },
    /// Evaluate a single interface on a switch.
    Port {
        /// Switch management IP or hostname.
        switch: String,
        /// Interface name (e.g. Gi1/0/14).
        interface: String,
    },
}

/// Initializes tracing/logging subsystem
fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = VlanmigConfig::load(&cli.config)?;
    let ledger = Arc::new(FileLedger::open(&config.ledger_path).await?);
    let engine = MigrationEngine::new(config.policy.clone(), ledger)?;

    let request = match cli.command {
        Command::Scan { switch } => TriggerRequest {
            switch,
            interface: None,
        },
        Command::Port { switch, interface } => TriggerRequest {
            switch,
            interface: Some(interface),
        },
    };

    let mut session =
        ProcessSession::connect(&config.transport, &request.switch, config.command_timeout());

    let results = engine.handle_trigger(&mut session, &request).await?;
    for (port, outcome) in &results {
        println!("{}: {}", port, outcome);
    }
    info!(
        candidates = results.len(),
        committed = results.iter().filter(|(_, o)| o.is_committed()).count(),
        "Evaluation complete"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    info!("--- Starting vlanmigd ---");

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("vlanmigd failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
