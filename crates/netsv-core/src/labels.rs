//! # Link Label Resolver
//!
//! Medium labels for links between device types.
//!
//! Labels are stored under directional `"{A}-{B}"` keys, but lookup is
//! direction-agnostic: `A-B` is tried first, then `B-A`, and only when both are
//! absent is a fallback `"{A} → {B}"` synthesized. A connection may be legal in
//! one direction only and still resolve the same label from either side.
//!
//! A table must not give `A-B` and `B-A` different labels; that would make the
//! rendered medium depend on which end the user dragged from.

use crate::primitives::{FALLBACK_ARROW, LABEL_KEY_SEPARATOR};
use crate::{DeviceType, SandboxError};
use std::collections::BTreeMap;

/// Medium labels keyed by device-type pair.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelRules {
    labels: BTreeMap<(DeviceType, DeviceType), String>,
}

impl LabelRules {
    /// Create an empty table (every link gets a fallback label).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The table shipped with the sandbox.
    #[must_use]
    pub fn bundled() -> Self {
        use DeviceType::*;

        const ETHERNET: &str = "Ethernet";
        const WIFI: &str = "Wi-Fi";
        const CELLULAR: &str = "Cellular";
        const ISP_LINE: &str = "Coax, Fiber, or DSL";
        const P2P: &str = "P2P (Bluetooth/Wi-Fi Direct)";

        // Reverse entries that disagreed with the first-listed direction were
        // folded into it: Phone-PC and Phone-Laptop ("USB/Lightning"), Cell
        // Tower-Gateway and Cell Tower-Laptop ("Cellular"), Internet-Gateway
        // and Internet-Modem ("Coax/Fiber/DSL"), Server-Switch
        // ("Ethernet/Fiber"), Printer-Laptop, Tablet-Laptop.

        let entries: &[(DeviceType, DeviceType, &str)] = &[
            // Router
            (Router, Modem, ETHERNET),
            (Router, Switch, ETHERNET),
            (Router, Firewall, ETHERNET),
            (Router, Server, ETHERNET),
            (Router, Pc, ETHERNET),
            // Switch
            (Switch, Pc, ETHERNET),
            (Switch, Firewall, ETHERNET),
            (Switch, Server, ETHERNET),
            (Switch, Laptop, ETHERNET),
            (Switch, Printer, ETHERNET),
            (Switch, AccessPoint, "Ethernet/PoE"),
            (Switch, Switch, "Ethernet/Fiber"),
            // Access Point
            (AccessPoint, Switch, "Ethernet/PoE"),
            (AccessPoint, Router, ETHERNET),
            (AccessPoint, Firewall, ETHERNET),
            (AccessPoint, Laptop, WIFI),
            (AccessPoint, Phone, WIFI),
            (AccessPoint, Tablet, WIFI),
            (AccessPoint, Printer, WIFI),
            (AccessPoint, Pc, WIFI),
            // Modem
            (Modem, Internet, ISP_LINE),
            (Modem, Router, ETHERNET),
            (Modem, Firewall, ETHERNET),
            // Gateway
            (Gateway, Internet, ISP_LINE),
            (Gateway, Switch, ETHERNET),
            (Gateway, Server, ETHERNET),
            (Gateway, Pc, ETHERNET),
            (Gateway, Printer, ETHERNET),
            (Gateway, Laptop, WIFI),
            (Gateway, Phone, WIFI),
            (Gateway, Tablet, WIFI),
            (Gateway, Firewall, ETHERNET),
            (Gateway, CellTower, "Cellular (5G/LTE Gateway flavor)"),
            // Firewall
            (Firewall, Modem, ETHERNET),
            (Firewall, Switch, ETHERNET),
            (Firewall, Server, ETHERNET),
            (Firewall, Router, ETHERNET),
            (Firewall, Pc, ETHERNET),
            (Firewall, Gateway, ETHERNET),
            // Server
            (Server, Router, ETHERNET),
            (Server, Server, "Ethernet/Fiber"),
            (Server, AccessPoint, WIFI),
            // Internet
            (Internet, CarrierCore, "Fiber"),
            // PC
            (Pc, Switch, ETHERNET),
            (Pc, Router, ETHERNET),
            (Pc, Printer, "USB/Ethernet/Wi-Fi"),
            (Pc, Server, ETHERNET),
            (Pc, AccessPoint, WIFI),
            (Pc, Phone, "Wi-Fi (Hotspot)"),
            // Laptop
            (Laptop, Switch, ETHERNET),
            (Laptop, Router, ETHERNET),
            (Laptop, Printer, "USB/P2P via Bluetooth"),
            (Laptop, Pc, "USB-C"),
            (Laptop, Tablet, "USB-C"),
            (Laptop, AccessPoint, WIFI),
            (Laptop, CellTower, "Cellular - if SIM equipped"),
            (Laptop, Phone, "Wi-Fi - Hotspot"),
            // Phone
            (Phone, Router, ETHERNET),
            (Phone, AccessPoint, WIFI),
            (Phone, CellTower, CELLULAR),
            (Phone, Phone, "P2P (Bluetooth/NFC/Wi-Fi Direct)"),
            (Phone, Printer, P2P),
            // Tablet
            (Tablet, Router, ETHERNET),
            (Tablet, AccessPoint, WIFI),
            (Tablet, CellTower, CELLULAR),
            (Tablet, Printer, P2P),
            // Printer
            (Printer, Switch, ETHERNET),
            (Printer, Pc, "USB/Ethernet/Wi-Fi"),
            (Printer, Server, ETHERNET),
            (Printer, AccessPoint, WIFI),
            (Printer, Phone, P2P),
            (Printer, Tablet, P2P),
            // Cell Tower
            (CellTower, CarrierCore, "Fiber/Ethernet Backhaul"),
            (CellTower, Phone, CELLULAR),
            (CellTower, Tablet, CELLULAR),
            (CellTower, CellTower, "P2P (Microwave Link)"),
            // Carrier Core
            (CarrierCore, Internet, "Fiber"),
            (CarrierCore, Landline, "Fiber/Copper Gateway"),
            (CarrierCore, CarrierCore, "Fiber"),
            // Landline
            (Landline, CarrierCore, "Fiber/Copper Gateway"),
            (Landline, Landline, "Copper circuit"),
            (Landline, Router, "Ethernet (via VoIP adapter)"),
        ];

        let labels = entries
            .iter()
            .map(|&(a, b, label)| ((a, b), label.to_string()))
            .collect();
        Self { labels }
    }

    /// Build a table from `"{A}-{B}"` keys, as found in configuration files.
    pub fn from_keys<'a, I>(entries: I) -> Result<Self, SandboxError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut rules = Self::new();
        for (key, label) in entries {
            let (a, b) = parse_key(key)?;
            rules.insert(a, b, label)?;
        }
        Ok(rules)
    }

    /// Add a label for the ordered pair `(a, b)`.
    ///
    /// Fails if the reverse pair already carries a different label.
    pub fn insert(
        &mut self,
        a: DeviceType,
        b: DeviceType,
        label: impl Into<String>,
    ) -> Result<(), SandboxError> {
        let label = label.into();
        match self.labels.get(&(b, a)) {
            Some(existing) if *existing != label => {
                return Err(SandboxError::ConflictingLabels {
                    key: Self::key(a, b),
                    first: existing.clone(),
                    second: label,
                });
            }
            _ => {}
        }
        self.labels.insert((a, b), label);
        Ok(())
    }

    /// Exact directional lookup of `"{a}-{b}"`.
    #[must_use]
    pub fn get(&self, a: DeviceType, b: DeviceType) -> Option<&str> {
        self.labels.get(&(a, b)).map(String::as_str)
    }

    /// Resolve the medium label for a link between `a` and `b`.
    ///
    /// Tries `a-b`, then `b-a`, then falls back to `"{a} → {b}"`.
    #[must_use]
    pub fn resolve_label(&self, a: DeviceType, b: DeviceType) -> String {
        self.get(a, b)
            .or_else(|| self.get(b, a))
            .map_or_else(|| fallback_label(a, b), str::to_string)
    }

    /// The table key for an ordered pair.
    #[must_use]
    pub fn key(a: DeviceType, b: DeviceType) -> String {
        format!("{}{}{}", a.name(), LABEL_KEY_SEPARATOR, b.name())
    }

    /// All `(key pair, label)` entries in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = (DeviceType, DeviceType, &str)> + '_ {
        self.labels
            .iter()
            .map(|((a, b), label)| (*a, *b, label.as_str()))
    }

    /// Number of directional entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// The label used when neither direction has an entry.
#[must_use]
pub fn fallback_label(a: DeviceType, b: DeviceType) -> String {
    format!("{} {} {}", a.name(), FALLBACK_ARROW, b.name())
}

/// Split a `"{A}-{B}"` key into its two device types.
fn parse_key(key: &str) -> Result<(DeviceType, DeviceType), SandboxError> {
    let (a, b) = key
        .split_once(LABEL_KEY_SEPARATOR)
        .ok_or_else(|| SandboxError::MalformedLabelKey(key.to_string()))?;
    if b.contains(LABEL_KEY_SEPARATOR) {
        return Err(SandboxError::MalformedLabelKey(key.to_string()));
    }
    Ok((a.parse()?, b.parse()?))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use DeviceType::*;

    #[test]
    fn resolves_both_directions() {
        let labels = LabelRules::bundled();
        assert_eq!(labels.resolve_label(Router, Modem), "Ethernet");
        assert_eq!(labels.resolve_label(Modem, Router), "Ethernet");
    }

    #[test]
    fn reverse_lookup_covers_one_sided_entries() {
        let labels = LabelRules::bundled();

        // Only "Server-Access Point" is listed.
        assert_eq!(labels.get(AccessPoint, Server), None);
        assert_eq!(labels.resolve_label(AccessPoint, Server), "Wi-Fi");
    }

    #[test]
    fn fallback_when_no_entry() {
        let labels = LabelRules::bundled();
        assert_eq!(labels.resolve_label(Pc, Tablet), "PC → Tablet");
        assert_eq!(labels.resolve_label(Phone, Tablet), "Phone → Tablet");
    }

    #[test]
    fn empty_table_always_falls_back() {
        let labels = LabelRules::new();
        assert!(labels.is_empty());
        assert_eq!(labels.resolve_label(Router, Modem), "Router → Modem");
    }

    #[test]
    fn bundled_table_is_consistent() {
        let labels = LabelRules::bundled();
        for (a, b, label) in labels.iter() {
            if let Some(reverse) = labels.get(b, a) {
                assert_eq!(reverse, label, "{} disagrees with its reverse", LabelRules::key(a, b));
            }
        }
    }

    #[test]
    fn from_keys_parses_display_names() {
        let labels = LabelRules::from_keys([
            ("Cell Tower-Carrier Core", "Microwave"),
            ("Access Point-PC", "Wi-Fi 6"),
        ])
        .expect("parse");

        assert_eq!(labels.resolve_label(CarrierCore, CellTower), "Microwave");
        assert_eq!(labels.resolve_label(Pc, AccessPoint), "Wi-Fi 6");
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn from_keys_rejects_malformed_keys() {
        assert!(matches!(
            LabelRules::from_keys([("RouterModem", "Ethernet")]),
            Err(SandboxError::MalformedLabelKey(_))
        ));
        assert!(matches!(
            LabelRules::from_keys([("Router-Modem-Switch", "Ethernet")]),
            Err(SandboxError::MalformedLabelKey(_))
        ));
        assert!(matches!(
            LabelRules::from_keys([("Router-Toaster", "Ethernet")]),
            Err(SandboxError::UnknownDeviceType(_))
        ));
    }

    #[test]
    fn insert_rejects_conflicting_reverse() {
        let mut labels = LabelRules::new();
        labels.insert(Switch, Server, "Ethernet").expect("first");

        let result = labels.insert(Server, Switch, "Ethernet/Fiber");
        assert!(matches!(
            result,
            Err(SandboxError::ConflictingLabels { key, .. }) if key == "Server-Switch"
        ));

        // Agreeing reverse entries are fine.
        labels.insert(Server, Switch, "Ethernet").expect("agreeing");
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn key_format() {
        assert_eq!(LabelRules::key(AccessPoint, Switch), "Access Point-Switch");
    }
}
