//! Daemon configuration.
//!
//! Every policy value the engine consults (source/destination VLAN, the
//! vendor OUI set, the exact safe-mode string, the ledger location, session
//! transport settings) comes from here. None of them are embedded in
//! engine logic.
//!
//! `config/vlanmigd.example.yaml` at the workspace root is a complete
//! starting point, shipping the Dell OUI registry set as its
//! `vendor_ouis` data.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{MigrationError, MigrationResult};
use crate::mac::VendorRegistry;

/// Default policy values.
pub mod defaults {
    /// Default source VLAN to migrate away from.
    pub const SOURCE_VLAN: &str = "3";

    /// Default destination VLAN.
    pub const DESTINATION_VLAN: &str = "3010";

    /// The exact administrative-mode line a port must report to be safe
    /// for automated change. Anything else fails closed.
    pub const EXPECTED_PORT_MODE: &str = "Administrative Mode: static access";

    /// Default per-exchange command timeout in seconds.
    pub const COMMAND_TIMEOUT_SECS: u64 = 30;

    /// Default ledger file location.
    pub const LEDGER_PATH: &str = "/var/lib/vlanmig/migrations.log";
}

fn default_source_vlan() -> String {
    defaults::SOURCE_VLAN.to_string()
}

fn default_destination_vlan() -> String {
    defaults::DESTINATION_VLAN.to_string()
}

fn default_expected_port_mode() -> String {
    defaults::EXPECTED_PORT_MODE.to_string()
}

fn default_command_timeout_secs() -> u64 {
    defaults::COMMAND_TIMEOUT_SECS
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from(defaults::LEDGER_PATH)
}

/// Migration policy: which ports are eligible and what they become.
#[derive(Debug, Clone, Deserialize)]
pub struct MigrationPolicy {
    /// VLAN a device must currently be on to be eligible.
    #[serde(default = "default_source_vlan")]
    pub source_vlan: String,

    /// VLAN assigned by a migration.
    #[serde(default = "default_destination_vlan")]
    pub destination_vlan: String,

    /// Vendor OUI prefixes whose devices trigger migration
    /// (e.g. `"00:06:5B"`; dotted and dashed groupings also accepted).
    #[serde(default)]
    pub vendor_ouis: Vec<String>,

    /// Exact administrative-mode string required for a port to be touched.
    #[serde(default = "default_expected_port_mode")]
    pub expected_port_mode: String,
}

impl Default for MigrationPolicy {
    fn default() -> Self {
        Self {
            source_vlan: default_source_vlan(),
            destination_vlan: default_destination_vlan(),
            vendor_ouis: Vec::new(),
            expected_port_mode: default_expected_port_mode(),
        }
    }
}

impl MigrationPolicy {
    /// Builds the vendor registry from the configured prefixes.
    pub fn vendor_registry(&self) -> MigrationResult<VendorRegistry> {
        VendorRegistry::from_prefixes(&self.vendor_ouis)
            .map_err(|e| MigrationError::invalid_config("vendor_ouis", e.to_string()))
    }
}

/// Session transport settings.
///
/// One external program invocation per command exchange; `{host}` and
/// `{user}` placeholders in `args` are substituted at session open.
#[derive(Debug, Clone, Deserialize)]
pub struct TransportConfig {
    /// Program invoked for each exchange (e.g. `/usr/bin/ssh`).
    pub program: String,

    /// Arguments, with `{host}` / `{user}` placeholders.
    #[serde(default)]
    pub args: Vec<String>,

    /// Login username substituted for `{user}`.
    #[serde(default)]
    pub username: String,
}

/// Top-level daemon configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct VlanmigConfig {
    /// Migration eligibility policy.
    #[serde(default)]
    pub policy: MigrationPolicy,

    /// Durable ledger location.
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,

    /// Bounded timeout per command exchange, in seconds.
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,

    /// Device session transport.
    pub transport: TransportConfig,
}

impl VlanmigConfig {
    /// Parses configuration from YAML text.
    pub fn from_yaml(text: &str) -> MigrationResult<Self> {
        serde_yaml::from_str(text)
            .map_err(|e| MigrationError::invalid_config("config", e.to_string()))
    }

    /// Loads configuration from a YAML file.
    pub fn load(path: &Path) -> MigrationResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            MigrationError::invalid_config("config", format!("{}: {}", path.display(), e))
        })?;
        Self::from_yaml(&text)
    }

    /// Returns the per-exchange timeout as a [`Duration`].
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}
