//! # Device Catalog
//!
//! Reference data for every device type: the descriptive blurb shown when a
//! node is clicked, and the icon the palette draws for it.

use crate::DeviceType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Catalog entry for one device type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Educational description revealed on click.
    pub description: String,
    /// Icon asset reference.
    pub icon: String,
}

/// The device catalog. Always holds an entry for every [`DeviceType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: BTreeMap<DeviceType, DeviceInfo>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::bundled()
    }
}

impl Catalog {
    /// The catalog shipped with the sandbox.
    #[must_use]
    pub fn bundled() -> Self {
        let entries = DeviceType::ALL
            .into_iter()
            .map(|t| {
                let info = DeviceInfo {
                    description: bundled_description(t).to_string(),
                    icon: bundled_icon(t),
                };
                (t, info)
            })
            .collect();
        Self { entries }
    }

    /// Replace the description and/or icon of one type.
    pub fn set_override(
        &mut self,
        device_type: DeviceType,
        description: Option<String>,
        icon: Option<String>,
    ) {
        if let Some(info) = self.entries.get_mut(&device_type) {
            if let Some(description) = description {
                info.description = description;
            }
            if let Some(icon) = icon {
                info.icon = icon;
            }
        }
    }

    /// Full entry for a type.
    #[must_use]
    pub fn info(&self, device_type: DeviceType) -> Option<&DeviceInfo> {
        self.entries.get(&device_type)
    }

    /// Description text for a type.
    #[must_use]
    pub fn description(&self, device_type: DeviceType) -> &str {
        self.info(device_type)
            .map_or_else(|| bundled_description(device_type), |i| &i.description)
    }

    /// Icon reference for a type.
    #[must_use]
    pub fn icon(&self, device_type: DeviceType) -> Option<&str> {
        self.info(device_type).map(|i| i.icon.as_str())
    }

    /// All entries in palette order.
    pub fn iter(&self) -> impl Iterator<Item = (DeviceType, &DeviceInfo)> {
        self.entries.iter().map(|(t, info)| (*t, info))
    }
}

fn bundled_icon(device_type: DeviceType) -> String {
    format!(
        "{}.png",
        device_type.name().to_ascii_lowercase().replace(' ', "-")
    )
}

fn bundled_description(device_type: DeviceType) -> &'static str {
    match device_type {
        DeviceType::Router => {
            "Forwards data packets between different networks, determining the best path for traffic to travel."
        }
        DeviceType::Switch => {
            "Connects devices within a local network, using MAC addresses to forward data to the correct device."
        }
        DeviceType::AccessPoint => {
            "Provides wireless connectivity, allowing Wi-Fi devices to join a wired network without cables."
        }
        DeviceType::Modem => {
            "Converts signals between your ISP and your local network, enabling internet access over cable or phone lines."
        }
        DeviceType::Gateway => {
            "Acts as a network entry point, often combining router and modem functions to translate between different protocols."
        }
        DeviceType::Firewall => {
            "Monitors and filters incoming and outgoing network traffic based on security rules to block threats."
        }
        DeviceType::Server => {
            "A dedicated computer that provides services like file storage, websites, or email to other networked devices."
        }
        DeviceType::Internet => {
            "The global network of networks, reached through an ISP modem, gateway, or carrier backbone."
        }
        DeviceType::Pc => {
            "A personal computer that connects to a network to access shared resources and internet services."
        }
        DeviceType::Laptop => {
            "A portable computer with built-in wireless networking for mobile access to network resources."
        }
        DeviceType::Phone => {
            "A smartphone capable of connecting to networks via Wi-Fi or cellular data for communication and browsing."
        }
        DeviceType::Tablet => {
            "A touchscreen mobile device that connects wirelessly to networks for browsing, apps, and media consumption."
        }
        DeviceType::Printer => {
            "A network-enabled printer that receives print jobs wirelessly or via Ethernet from connected devices."
        }
        DeviceType::CellTower => {
            "A telecommunications structure that transmits and receives cellular signals, connecting mobile devices to wider networks."
        }
        DeviceType::CarrierCore => {
            "The central backbone of a telecom network, routing voice and data traffic between cell towers and the internet."
        }
        DeviceType::Landline => {
            "A traditional wired telephone connection that transmits voice signals through physical copper or fiber-optic cables."
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
