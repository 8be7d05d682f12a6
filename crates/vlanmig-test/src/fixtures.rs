//! Canned device output for parser and engine tests.

/// The exact administrative-mode line for a safe port.
pub const STATIC_ACCESS_MODE: &str = "Administrative Mode: static access";

/// Administrative-mode lines that must all classify as unsafe.
pub const UNSAFE_MODES: &[&str] = &[
    "Administrative Mode: dynamic auto",
    "Administrative Mode: dynamic desirable",
    "Administrative Mode: trunk",
    "Administrative Mode: tunnel",
    "Administrative Mode: private-vlan host",
    "administrative mode: static access",
    "Administrative Mode: static access trunk",
    "Administrative Mode: static",
    "",
    "% Invalid input detected",
];

/// A whole-VLAN MAC-address-table as a Catalyst prints it.
pub fn mac_table_vlan3() -> String {
    "\
          Mac Address Table
-------------------------------------------

Vlan    Mac Address       Type        Ports
----    -----------       --------    -----
   3    0006.5b12.3456    DYNAMIC     Gi1/0/14
   3    f8ca.b845.6789    DYNAMIC     Gi1/0/15
   3    aabb.ccdd.eeff    DYNAMIC     Gi1/0/16
Total Mac Addresses for this criterion: 3
"
    .to_string()
}

/// A single-interface MAC-address-table slice with one learned entry.
pub fn mac_table_interface(vlan: &str, mac: &str, interface: &str) -> String {
    format!(
        "\
          Mac Address Table
-------------------------------------------

Vlan    Mac Address       Type        Ports
----    -----------       --------    -----
   {}    {}    DYNAMIC     {}
Total Mac Addresses for this criterion: 1
",
        vlan, mac, interface
    )
}

/// Table output for an interface with nothing connected.
pub fn mac_table_empty() -> String {
    "\
          Mac Address Table
-------------------------------------------

Vlan    Mac Address       Type        Ports
----    -----------       --------    -----
"
    .to_string()
}
