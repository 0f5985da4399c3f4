//! # Compatibility Rules
//!
//! The directional adjacency table over device types.
//!
//! A connection gesture from a `source` node to a `target` node is legal only
//! if the target's type appears in the source type's entry. The relation is
//! NOT symmetric: Firewall may connect to Gateway, Gateway may not connect to
//! Firewall. Callers pass types in gesture order, never a canonical order.

use crate::{DeviceType, SandboxError};
use std::collections::{BTreeMap, BTreeSet};

/// Directional device-type compatibility table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompatibilityRules {
    allowed: BTreeMap<DeviceType, BTreeSet<DeviceType>>,
}

impl CompatibilityRules {
    /// Create an empty table (nothing may connect).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The table shipped with the sandbox.
    #[must_use]
    pub fn bundled() -> Self {
        use DeviceType::*;

        let table: [(DeviceType, &[DeviceType]); 16] = [
            (
                Router,
                &[
                    Modem,
                    Switch,
                    Firewall,
                    Server,
                    Pc,
                    AccessPoint,
                    Laptop,
                    Phone,
                    Tablet,
                    Landline,
                ],
            ),
            (
                Switch,
                &[
                    Pc,
                    Firewall,
                    Server,
                    Laptop,
                    Printer,
                    AccessPoint,
                    Switch,
                    Router,
                    Gateway,
                ],
            ),
            (
                AccessPoint,
                &[
                    Switch, Router, Firewall, Laptop, Phone, Tablet, Printer, Pc, Server,
                ],
            ),
            (Modem, &[Internet, Router, Firewall]),
            (
                Gateway,
                &[
                    Internet, Switch, Server, Pc, Printer, Laptop, Phone, Tablet, CellTower,
                ],
            ),
            (
                Firewall,
                &[Modem, Switch, Server, Router, Pc, AccessPoint, Gateway],
            ),
            (
                Server,
                &[
                    Switch,
                    Router,
                    Server,
                    AccessPoint,
                    Pc,
                    Firewall,
                    Gateway,
                    Printer,
                ],
            ),
            (Internet, &[Gateway, Modem, CarrierCore]),
            (
                Pc,
                &[
                    Switch,
                    Router,
                    Printer,
                    Server,
                    AccessPoint,
                    Phone,
                    Firewall,
                    Gateway,
                    Laptop,
                    Tablet,
                ],
            ),
            (
                Laptop,
                &[
                    Switch,
                    Router,
                    Printer,
                    Pc,
                    Tablet,
                    AccessPoint,
                    CellTower,
                    Phone,
                    Gateway,
                ],
            ),
            (
                Phone,
                &[
                    Pc,
                    Laptop,
                    Router,
                    AccessPoint,
                    CellTower,
                    Phone,
                    Printer,
                    Gateway,
                    Tablet,
                ],
            ),
            (
                Tablet,
                &[
                    Pc,
                    Laptop,
                    Router,
                    AccessPoint,
                    CellTower,
                    Printer,
                    Gateway,
                    Phone,
                ],
            ),
            (
                Printer,
                &[
                    Switch,
                    Pc,
                    Laptop,
                    Server,
                    AccessPoint,
                    Phone,
                    Tablet,
                    Gateway,
                ],
            ),
            (
                CellTower,
                &[CarrierCore, Phone, Tablet, Laptop, Gateway, CellTower],
            ),
            (CarrierCore, &[CellTower, Internet, Landline, CarrierCore]),
            (Landline, &[CarrierCore, Landline, Router]),
        ];

        let mut rules = Self::new();
        for (source, targets) in table {
            for &target in targets {
                rules.allow(source, target);
            }
        }
        rules
    }

    /// Build a table from type names, as found in configuration files.
    ///
    /// Every name, key or member, must be a known device type.
    pub fn from_names<'a, I, T>(entries: I) -> Result<Self, SandboxError>
    where
        I: IntoIterator<Item = (&'a str, T)>,
        T: IntoIterator<Item = &'a str>,
    {
        let mut rules = Self::new();
        for (source, targets) in entries {
            let source: DeviceType = source.parse()?;
            rules.allowed.entry(source).or_default();
            for target in targets {
                rules.allow(source, target.parse()?);
            }
        }
        Ok(rules)
    }

    /// Permit connections from `source` to `target`.
    pub fn allow(&mut self, source: DeviceType, target: DeviceType) {
        self.allowed.entry(source).or_default().insert(target);
    }

    /// Check whether a connection from `source` to `target` is permitted.
    ///
    /// A type with no entry has no outgoing connections.
    #[must_use]
    pub fn is_allowed(&self, source: DeviceType, target: DeviceType) -> bool {
        self.allowed
            .get(&source)
            .is_some_and(|targets| targets.contains(&target))
    }

    /// Types `source` may connect to, in palette order.
    pub fn targets(&self, source: DeviceType) -> impl Iterator<Item = DeviceType> + '_ {
        self.allowed
            .get(&source)
            .into_iter()
            .flat_map(|targets| targets.iter().copied())
    }

    /// All `(source, target)` permissions in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = (DeviceType, DeviceType)> + '_ {
        self.allowed
            .iter()
            .flat_map(|(source, targets)| targets.iter().map(move |target| (*source, *target)))
    }

    /// Number of permitted ordered pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.allowed.values().map(BTreeSet::len).sum()
    }

    /// Check if no pair is permitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// TESTS
// =============================================================================
