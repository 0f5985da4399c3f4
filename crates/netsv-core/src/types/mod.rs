//! # Core Type Definitions
//!
//! This module contains the shared types for the NetworkSV sandbox:
//! - The closed device type set (`DeviceType`)
//! - Node identifiers and canvas coordinates (`NodeId`, `Position`)
//! - Placed devices and accepted links (`DeviceInstance`, `LinkInstance`)
//! - Error types (`SandboxError`)
//!
//! ## Identifier Scheme
//!
//! Every placed device is identified as `{DeviceType}-{sequence}`. Device type
//! names may contain spaces but never the `-` separator, so the type of any
//! node is recoverable from the prefix of its id.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// DEVICE TYPE
// =============================================================================

/// The closed set of device types a user can drop onto the canvas.
///
/// Declaration order is the palette order and the iteration order of every
/// table keyed by device type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    Router,
    Switch,
    #[serde(rename = "Access Point")]
    AccessPoint,
    Modem,
    Gateway,
    Firewall,
    Server,
    Internet,
    #[serde(rename = "PC")]
    Pc,
    Laptop,
    Phone,
    Tablet,
    Printer,
    #[serde(rename = "Cell Tower")]
    CellTower,
    #[serde(rename = "Carrier Core")]
    CarrierCore,
    Landline,
}

impl DeviceType {
    /// Every device type, in palette order.
    pub const ALL: [DeviceType; 16] = [
        DeviceType::Router,
        DeviceType::Switch,
        DeviceType::AccessPoint,
        DeviceType::Modem,
        DeviceType::Gateway,
        DeviceType::Firewall,
        DeviceType::Server,
        DeviceType::Internet,
        DeviceType::Pc,
        DeviceType::Laptop,
        DeviceType::Phone,
        DeviceType::Tablet,
        DeviceType::Printer,
        DeviceType::CellTower,
        DeviceType::CarrierCore,
        DeviceType::Landline,
    ];

    /// The canonical, human-readable name (also the id prefix).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            DeviceType::Router => "Router",
            DeviceType::Switch => "Switch",
            DeviceType::AccessPoint => "Access Point",
            DeviceType::Modem => "Modem",
            DeviceType::Gateway => "Gateway",
            DeviceType::Firewall => "Firewall",
            DeviceType::Server => "Server",
            DeviceType::Internet => "Internet",
            DeviceType::Pc => "PC",
            DeviceType::Laptop => "Laptop",
            DeviceType::Phone => "Phone",
            DeviceType::Tablet => "Tablet",
            DeviceType::Printer => "Printer",
            DeviceType::CellTower => "Cell Tower",
            DeviceType::CarrierCore => "Carrier Core",
            DeviceType::Landline => "Landline",
        }
    }

    /// Look up a device type by its canonical name. Matching is exact.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeviceType {
    type Err = SandboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| SandboxError::UnknownDeviceType(s.to_string()))
    }
}

// =============================================================================
// NODE IDENTIFIER
// =============================================================================

/// Identifier of a placed device: `{DeviceType}-{sequence}`.
///
/// Ids arriving from the canvas are not trusted to be well formed; an id whose
/// prefix is not a known type simply has no device type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Separator between the type prefix and the sequence number.
    pub const SEPARATOR: char = '-';

    /// Wrap a raw id string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build the id for the `sequence`-th device of a type.
    #[must_use]
    pub fn for_device(device_type: DeviceType, sequence: u64) -> Self {
        Self(format!("{}{}{}", device_type.name(), Self::SEPARATOR, sequence))
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything before the first separator (the whole id if there is none).
    #[must_use]
    pub fn type_prefix(&self) -> &str {
        self.0
            .split_once(Self::SEPARATOR)
            .map_or(self.0.as_str(), |(prefix, _)| prefix)
    }

    /// The device type encoded in the id prefix, if it names a known type.
    #[must_use]
    pub fn device_type(&self) -> Option<DeviceType> {
        DeviceType::parse(self.type_prefix())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// =============================================================================
// POSITION
// =============================================================================

/// A canvas coordinate in whole pixels.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

// =============================================================================
// DEVICE INSTANCE
// =============================================================================

/// One placed device on the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInstance {
    /// Unique id, `{DeviceType}-{sequence}`.
    pub id: NodeId,
    /// The type this instance represents.
    pub device_type: DeviceType,
    /// Current canvas position.
    pub position: Position,
    /// Text currently shown on the node.
    pub display_label: String,
}

impl DeviceInstance {
    /// Create the `sequence`-th device of a type with its default label.
    #[must_use]
    pub fn new(device_type: DeviceType, sequence: u64, position: Position) -> Self {
        Self {
            id: NodeId::for_device(device_type, sequence),
            device_type,
            position,
            display_label: format!("{} {}", device_type.name(), sequence),
        }
    }
}

// =============================================================================
// LINK INSTANCE
// =============================================================================

/// One accepted connection between two placed devices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkInstance {
    /// The node the connection gesture started from.
    pub source: NodeId,
    /// The node the connection gesture ended on.
    pub target: NodeId,
    /// Physical medium label, fixed at creation.
    pub label: String,
}

impl LinkInstance {
    /// Create a new link.
    #[must_use]
    pub fn new(source: NodeId, target: NodeId, label: impl Into<String>) -> Self {
        Self {
            source,
            target,
            label: label.into(),
        }
    }

    /// Check whether this link has the exact ordered endpoints.
    #[must_use]
    pub fn connects(&self, source: &NodeId, target: &NodeId) -> bool {
        &self.source == source && &self.target == target
    }

    /// Check whether either endpoint is the given node.
    #[must_use]
    pub fn involves(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised while building tables or driving the sandbox from tooling.
///
/// Gestures never produce these; an invalid gesture is a silent no-op.
#[derive(Debug, Error)]
pub enum SandboxError {
    /// A name does not match any device type.
    #[error("Unknown device type: {0:?}")]
    UnknownDeviceType(String),

    /// A label key is not of the form `{A}-{B}`.
    #[error("Malformed label key: {0:?}")]
    MalformedLabelKey(String),

    /// The same pair carries different labels in each direction.
    #[error("Conflicting labels for {key}: {first:?} vs {second:?}")]
    ConflictingLabels {
        key: String,
        first: String,
        second: String,
    },

    /// A configuration value is out of range or inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A gesture script could not be parsed.
    #[error("Invalid script: {0}")]
    InvalidScript(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_round_trips_through_its_name() {
        for device_type in DeviceType::ALL {
            assert_eq!(DeviceType::parse(device_type.name()), Some(device_type));
            assert!(!device_type.name().contains(NodeId::SEPARATOR));
        }
    }

    #[test]
    fn parse_is_exact() {
        assert_eq!(DeviceType::parse("router"), None);
        assert_eq!(DeviceType::parse("AccessPoint"), None);
        assert!(matches!(
            "Mainframe".parse::<DeviceType>(),
            Err(SandboxError::UnknownDeviceType(name)) if name == "Mainframe"
        ));
    }

    #[test]
    fn node_id_prefix_recovers_type() {
        let id = NodeId::for_device(DeviceType::AccessPoint, 3);
        assert_eq!(id.as_str(), "Access Point-3");
        assert_eq!(id.type_prefix(), "Access Point");
        assert_eq!(id.device_type(), Some(DeviceType::AccessPoint));
    }

    #[test]
    fn node_id_without_separator_is_its_own_prefix() {
        let id = NodeId::new("Internet");
        assert_eq!(id.type_prefix(), "Internet");
        assert_eq!(id.device_type(), Some(DeviceType::Internet));

        assert_eq!(NodeId::new("Toaster-1").device_type(), None);
    }

    #[test]
    fn device_instance_default_label() {
        let device = DeviceInstance::new(DeviceType::CellTower, 2, Position::new(1, 2));
        assert_eq!(device.id.as_str(), "Cell Tower-2");
        assert_eq!(device.display_label, "Cell Tower 2");
    }

    #[test]
    fn device_type_serializes_as_display_name() {
        let json = serde_json::to_string(&DeviceType::CarrierCore).expect("serialize");
        assert_eq!(json, "\"Carrier Core\"");

        let parsed: DeviceType = serde_json::from_str("\"PC\"").expect("deserialize");
        assert_eq!(parsed, DeviceType::Pc);
    }

    #[test]
    fn link_endpoint_checks() {
        let link = LinkInstance::new("Router-1".into(), "Modem-1".into(), "Ethernet");
        assert!(link.connects(&"Router-1".into(), &"Modem-1".into()));
        assert!(!link.connects(&"Modem-1".into(), &"Router-1".into()));
        assert!(link.involves(&"Modem-1".into()));
        assert!(!link.involves(&"PC-1".into()));
    }
}
