//! IOS command builders for migration operations.

/// Build the whole-VLAN MAC-address-table query.
pub fn show_mac_table_vlan(vlan: &str) -> String {
    format!("show mac address-table vlan {}", vlan)
}

/// Build the single-interface MAC-address-table query.
pub fn show_mac_table_interface(interface: &str) -> String {
    format!("show mac address-table interface {}", interface)
}

/// Build the switchport administrative-mode query.
///
/// The device-side filter keeps the response down to the one line the
/// inspector compares against.
pub fn show_switchport_mode(interface: &str) -> String {
    format!(
        "show interface {} switchport | include Administrative Mode",
        interface
    )
}

/// Build the ordered migration configuration sequence.
///
/// The shutdown/no-shutdown bounce forces the attached host to
/// re-negotiate onto the new VLAN.
pub fn migration_config_set(interface: &str, destination_vlan: &str) -> Vec<String> {
    vec![
        format!("interface {}", interface),
        format!("switchport access vlan {}", destination_vlan),
        "shutdown".to_string(),
        "no shutdown".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_queries() {
        assert_eq!(show_mac_table_vlan("3"), "show mac address-table vlan 3");
        assert_eq!(
            show_mac_table_interface("Gi1/0/14"),
            "show mac address-table interface Gi1/0/14"
        );
    }

    #[test]
    fn test_switchport_query() {
        let cmd = show_switchport_mode("Gi1/0/14");
        assert!(cmd.starts_with("show interface Gi1/0/14 switchport"));
        assert!(cmd.contains("include Administrative Mode"));
    }

    #[test]
    fn test_migration_sequence_order() {
        let cmds = migration_config_set("Gi1/0/14", "3010");
        assert_eq!(
            cmds,
            vec![
                "interface Gi1/0/14",
                "switchport access vlan 3010",
                "shutdown",
                "no shutdown",
            ]
        );
    }
}
