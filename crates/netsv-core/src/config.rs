//! # Sandbox Configuration
//!
//! The static tables and session settings, assembled once at startup and
//! handed to the controller.
//!
//! [`SandboxConfig`] is the deserializable form (the binary reads it from
//! TOML). Every field is optional; anything absent keeps the bundled value.
//! `rules` and `labels` replace the bundled tables wholesale, `devices` only
//! overrides the entries it names.
//!
//! ```toml
//! reveal_delay_ms = 1500
//!
//! [placement]
//! width = 800
//! height = 600
//! seed = 7
//!
//! [devices."Router"]
//! description = "Moves packets between networks."
//!
//! [labels]
//! "Router-Modem" = "Ethernet"
//! ```

use crate::catalog::Catalog;
use crate::labels::LabelRules;
use crate::primitives::{
    PLACEMENT_HEIGHT, PLACEMENT_WIDTH, REVEAL_DELAY_MS, SENTINEL_X, SENTINEL_Y,
};
use crate::rules::CompatibilityRules;
use crate::{DeviceType, Position, SandboxError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

// =============================================================================
// DESERIALIZABLE CONFIGURATION
// =============================================================================

/// Raw configuration as read from a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SandboxConfig {
    /// Reveal duration after a click, in milliseconds.
    pub reveal_delay_ms: Option<u64>,
    /// Area new devices are scattered over.
    pub placement: PlacementConfig,
    /// Where the Internet sentinel starts.
    pub sentinel_position: Option<Position>,
    /// Per-type catalog overrides, keyed by device type name.
    pub devices: BTreeMap<String, DeviceOverride>,
    /// Replacement compatibility table: type name -> allowed target names.
    pub rules: Option<BTreeMap<String, Vec<String>>>,
    /// Replacement label table: `"{A}-{B}"` -> medium.
    pub labels: Option<BTreeMap<String, String>>,
}

/// Placement area settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlacementConfig {
    pub width: Option<i32>,
    pub height: Option<i32>,
    /// Fixed seed for reproducible layouts.
    pub seed: Option<u64>,
}

/// Catalog override for one device type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceOverride {
    pub description: Option<String>,
    pub icon: Option<String>,
}

impl SandboxConfig {
    /// Validate the configuration and assemble the rule book.
    pub fn build(&self) -> Result<RuleBook, SandboxError> {
        let mut book = RuleBook::bundled();

        if let Some(ms) = self.reveal_delay_ms {
            if ms == 0 {
                return Err(SandboxError::InvalidConfig(
                    "reveal_delay_ms must be greater than zero".to_string(),
                ));
            }
            book.reveal_delay = Duration::from_millis(ms);
        }

        let width = self.placement.width.unwrap_or(PLACEMENT_WIDTH);
        let height = self.placement.height.unwrap_or(PLACEMENT_HEIGHT);
        if width <= 0 || height <= 0 {
            return Err(SandboxError::InvalidConfig(format!(
                "placement area must be positive, got {}x{}",
                width, height
            )));
        }
        book.placement = PlacementArea {
            width,
            height,
            seed: self.placement.seed,
        };

        if let Some(position) = self.sentinel_position {
            book.sentinel_position = position;
        }

        for (name, device) in &self.devices {
            let device_type: DeviceType = name.parse()?;
            book.catalog.set_override(
                device_type,
                device.description.clone(),
                device.icon.clone(),
            );
        }

        if let Some(rules) = &self.rules {
            book.rules = CompatibilityRules::from_names(
                rules
                    .iter()
                    .map(|(source, targets)| (source.as_str(), targets.iter().map(String::as_str))),
            )?;
        }

        if let Some(labels) = &self.labels {
            book.labels = LabelRules::from_keys(
                labels
                    .iter()
                    .map(|(key, label)| (key.as_str(), label.as_str())),
            )?;
        }

        Ok(book)
    }
}

// =============================================================================
// RULE BOOK
// =============================================================================

/// Bounds (and optional seed) for scattering new devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementArea {
    pub width: i32,
    pub height: i32,
    pub seed: Option<u64>,
}

impl Default for PlacementArea {
    fn default() -> Self {
        Self {
            width: PLACEMENT_WIDTH,
            height: PLACEMENT_HEIGHT,
            seed: None,
        }
    }
}

/// The immutable tables and settings one sandbox session runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleBook {
    pub catalog: Catalog,
    pub rules: CompatibilityRules,
    pub labels: LabelRules,
    pub reveal_delay: Duration,
    pub placement: PlacementArea,
    pub sentinel_position: Position,
}

impl Default for RuleBook {
    fn default() -> Self {
        Self::bundled()
    }
}

impl RuleBook {
    /// The bundled tables with default settings.
    #[must_use]
    pub fn bundled() -> Self {
        Self {
            catalog: Catalog::bundled(),
            rules: CompatibilityRules::bundled(),
            labels: LabelRules::bundled(),
            reveal_delay: Duration::from_millis(REVEAL_DELAY_MS),
            placement: PlacementArea::default(),
            sentinel_position: Position::new(SENTINEL_X, SENTINEL_Y),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_bundled() {
        let book = SandboxConfig::default().build().expect("build");
        assert_eq!(book, RuleBook::bundled());
        assert_eq!(book.reveal_delay, Duration::from_secs(3));
    }

    #[test]
    fn overrides_apply() {
        let mut config = SandboxConfig {
            reveal_delay_ms: Some(500),
            sentinel_position: Some(Position::new(10, 20)),
            ..SandboxConfig::default()
        };
        config.placement.seed = Some(9);
        config.devices.insert(
            "Access Point".to_string(),
            DeviceOverride {
                description: Some("Radio bridge.".to_string()),
                icon: None,
            },
        );

        let book = config.build().expect("build");
        assert_eq!(book.reveal_delay, Duration::from_millis(500));
        assert_eq!(book.sentinel_position, Position::new(10, 20));
        assert_eq!(book.placement.seed, Some(9));
        assert_eq!(book.catalog.description(DeviceType::AccessPoint), "Radio bridge.");
    }

    #[test]
    fn replacement_tables() {
        let config = SandboxConfig {
            rules: Some(BTreeMap::from([(
                "Phone".to_string(),
                vec!["Cell Tower".to_string()],
            )])),
            labels: Some(BTreeMap::from([(
                "Phone-Cell Tower".to_string(),
                "5G".to_string(),
            )])),
            ..SandboxConfig::default()
        };

        let book = config.build().expect("build");
        assert_eq!(book.rules.len(), 1);
        assert!(book.rules.is_allowed(DeviceType::Phone, DeviceType::CellTower));
        assert!(!book.rules.is_allowed(DeviceType::Router, DeviceType::Modem));
        assert_eq!(
            book.labels
                .resolve_label(DeviceType::CellTower, DeviceType::Phone),
            "5G"
        );
    }

    #[test]
    fn invalid_values_rejected() {
        let zero_delay = SandboxConfig {
            reveal_delay_ms: Some(0),
            ..SandboxConfig::default()
        };
        assert!(matches!(zero_delay.build(), Err(SandboxError::InvalidConfig(_))));

        let mut flat = SandboxConfig::default();
        flat.placement.height = Some(0);
        assert!(matches!(flat.build(), Err(SandboxError::InvalidConfig(_))));

        let mut unknown = SandboxConfig::default();
        unknown
            .devices
            .insert("Toaster".to_string(), DeviceOverride::default());
        assert!(matches!(
            unknown.build(),
            Err(SandboxError::UnknownDeviceType(_))
        ));
    }
}
