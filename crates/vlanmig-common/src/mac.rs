//! MAC address normalization and vendor OUI lookup.
//!
//! All MAC comparisons in the system operate on one canonical form:
//! lowercase, colon-separated, six octets (`00:11:22:33:44:55`). Switch
//! output arrives Cisco-dotted (`0011.2233.4455`); configuration files and
//! logs may use colons or dashes in any case. Every representation of the
//! same physical address must normalize to the same [`MacAddress`].

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when a string is not a recognizable MAC address or OUI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MacParseError {
    #[error("not a valid MAC address: '{0}'")]
    InvalidMac(String),

    #[error("not a valid OUI prefix: '{0}'")]
    InvalidOui(String),
}

/// A MAC address in canonical form: lowercase, colon-separated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MacAddress(String);

impl MacAddress {
    /// Returns the canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the OUI (first three octets) of this address.
    pub fn oui(&self) -> OuiPrefix {
        // Canonical form is "xx:xx:xx:xx:xx:xx"; the OUI is the first 8 chars.
        OuiPrefix(self.0[..8].to_ascii_uppercase())
    }
}

impl FromStr for MacAddress {
    type Err = MacParseError;

    /// Parses any of the accepted groupings (dotted, colon, dash), any case.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let hex: String = raw
            .chars()
            .filter(|c| !matches!(c, '.' | ':' | '-'))
            .collect();

        if hex.len() != 12 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(MacParseError::InvalidMac(raw.to_string()));
        }

        let lower = hex.to_ascii_lowercase();
        let octets: Vec<&str> = (0..6).map(|i| &lower[i * 2..i * 2 + 2]).collect();
        Ok(MacAddress(octets.join(":")))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A vendor OUI prefix in canonical form: uppercase, colon-separated
/// (`00:06:5B`). Used as the vendor-registry lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OuiPrefix(String);

impl OuiPrefix {
    /// Returns the canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for OuiPrefix {
    type Err = MacParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let hex: String = raw
            .chars()
            .filter(|c| !matches!(c, '.' | ':' | '-'))
            .collect();

        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(MacParseError::InvalidOui(raw.to_string()));
        }

        let upper = hex.to_ascii_uppercase();
        let octets: Vec<&str> = (0..3).map(|i| &upper[i * 2..i * 2 + 2]).collect();
        Ok(OuiPrefix(octets.join(":")))
    }
}

impl fmt::Display for OuiPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fixed set of vendor OUI prefixes with O(1) membership lookup.
///
/// The prefix set is configuration data; swapping vendors never touches
/// classifier logic. Membership is exact: an OUI differing in a single
/// hex digit is not recognized.
#[derive(Debug, Clone, Default)]
pub struct VendorRegistry {
    prefixes: HashSet<OuiPrefix>,
}

impl VendorRegistry {
    /// Builds a registry from configured prefix strings.
    ///
    /// Any unparsable prefix is an error; a registry silently missing an
    /// entry would skip migrations without a trace.
    pub fn from_prefixes<I, S>(prefixes: I) -> Result<Self, MacParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefixes = prefixes
            .into_iter()
            .map(|p| p.as_ref().parse())
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(Self { prefixes })
    }

    /// Returns true if the MAC's OUI belongs to a registered vendor.
    pub fn is_recognized(&self, mac: &MacAddress) -> bool {
        self.prefixes.contains(&mac.oui())
    }

    /// Number of registered prefixes.
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Returns true if no prefixes are registered.
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_dotted() {
        let mac: MacAddress = "0011.2233.4455".parse().unwrap();
        assert_eq!(mac.as_str(), "00:11:22:33:44:55");
    }

    #[test]
    fn test_normalize_equivalence() {
        let dotted: MacAddress = "0011.2233.4455".parse().unwrap();
        let colon: MacAddress = "00:11:22:33:44:55".parse().unwrap();
        let dashed: MacAddress = "00-11-22-33-44-55".parse().unwrap();
        let upper: MacAddress = "00:11:22:33:44:55".to_uppercase().parse().unwrap();

        assert_eq!(dotted, colon);
        assert_eq!(colon, dashed);
        assert_eq!(dashed, upper);
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!("".parse::<MacAddress>().is_err());
        assert!("0011.2233".parse::<MacAddress>().is_err());
        assert!("gg11.2233.4455".parse::<MacAddress>().is_err());
        assert!("0011.2233.44556".parse::<MacAddress>().is_err());
    }

    #[test]
    fn test_oui_extraction() {
        let mac: MacAddress = "f8ca.b812.3456".parse().unwrap();
        assert_eq!(mac.oui().as_str(), "F8:CA:B8");
    }

    #[test]
    fn test_oui_prefix_forms() {
        let a: OuiPrefix = "00:06:5B".parse().unwrap();
        let b: OuiPrefix = "00-06-5b".parse().unwrap();
        let c: OuiPrefix = "00065b".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.as_str(), "00:06:5B");
    }

    #[test]
    fn test_registry_membership() {
        let registry = VendorRegistry::from_prefixes(["00:06:5B", "F8:CA:B8"]).unwrap();

        let dell: MacAddress = "0006.5b12.3456".parse().unwrap();
        assert!(registry.is_recognized(&dell));

        // One hex digit off the registered prefix.
        let near_miss: MacAddress = "0006.5c12.3456".parse().unwrap();
        assert!(!registry.is_recognized(&near_miss));
    }

    #[test]
    fn test_registry_rejects_bad_prefix() {
        assert!(VendorRegistry::from_prefixes(["not-an-oui"]).is_err());
    }

    #[test]
    fn test_empty_registry_recognizes_nothing() {
        let registry = VendorRegistry::default();
        assert!(registry.is_empty());
        let mac: MacAddress = "0011.2233.4455".parse().unwrap();
        assert!(!registry.is_recognized(&mac));
    }
}
