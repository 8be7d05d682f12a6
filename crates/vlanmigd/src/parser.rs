//! MAC-address-table parser.
//!
//! Turns raw `show mac address-table` output into [`MacObservation`]s.
//! Lines that do not match the structural pattern (VLAN id, dotted
//! six-octet MAC, interface token) are skipped silently; headers, rules
//! and summary lines never match. An input with no matches is an empty
//! result, not an error.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use vlanmig_common::MacObservation;

/// One table row: VLAN, dotted MAC, type word, interface token.
static TABLE_ROW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^\s*(\d+)\s+([0-9a-fA-F]{4}\.[0-9a-fA-F]{4}\.[0-9a-fA-F]{4})\s+\S+\s+([A-Za-z]+[A-Za-z0-9/.-]*)",
    )
    .expect("Invalid table row regex")
});

/// Single-interface form: first VLAN + MAC pair anywhere in the output.
static INTERFACE_ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s+([0-9a-fA-F]{4}\.[0-9a-fA-F]{4}\.[0-9a-fA-F]{4})")
        .expect("Invalid interface entry regex")
});

/// Parses whole-table output into observations.
///
/// The switch identity is supplied by the caller; it never appears in the
/// table text itself.
pub fn parse_mac_table(switch: &str, text: &str) -> Vec<MacObservation> {
    let mut observations = Vec::new();
    for caps in TABLE_ROW_RE.captures_iter(text) {
        let mac = match caps[2].parse() {
            Ok(mac) => mac,
            Err(_) => continue, // regex guarantees shape; belt and braces
        };
        observations.push(MacObservation {
            switch: switch.to_string(),
            interface: caps[3].to_string(),
            vlan: caps[1].to_string(),
            mac,
        });
    }
    debug!(
        switch = %switch,
        entries = observations.len(),
        "Parsed MAC address table"
    );
    observations
}

/// Parses a single-interface table slice.
///
/// The interface is already known to the caller; the VLAN is extracted
/// from the matched text, never inferred. Returns `None` when nothing is
/// learned on the interface.
pub fn parse_interface_entry(switch: &str, interface: &str, text: &str) -> Option<MacObservation> {
    let caps = INTERFACE_ENTRY_RE.captures(text)?;
    let mac = caps[2].parse().ok()?;
    Some(MacObservation {
        switch: switch.to_string(),
        interface: interface.to_string(),
        vlan: caps[1].to_string(),
        mac,
    })
}
