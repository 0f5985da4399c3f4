//! # Topology Model
//!
//! The in-memory graph of placed devices and accepted links for one session.
//!
//! The topology does no rule checking; the controller validates gestures
//! before mutating it. What the topology does guarantee:
//! - the sentinel `Internet-0` node is present from construction and can
//!   never be removed
//! - per-type sequence numbers are counters, never reused after deletion
//! - links never dangle: removing a node removes the links touching it
//! - nodes and links keep insertion order (the render order)

use crate::primitives::{FIRST_SEQUENCE, SENTINEL_ID, SENTINEL_LABEL};
use crate::{DeviceInstance, DeviceType, LinkInstance, NodeId, Position};
use std::collections::BTreeMap;

/// Placed devices and accepted links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    /// Nodes in placement order.
    nodes: Vec<DeviceInstance>,
    /// Links in creation order.
    links: Vec<LinkInstance>,
    /// Next sequence number per device type.
    next_sequence: BTreeMap<DeviceType, u64>,
}

impl Topology {
    /// Create a topology holding only the sentinel at `sentinel_position`.
    #[must_use]
    pub fn new(sentinel_position: Position) -> Self {
        let sentinel = DeviceInstance {
            id: Self::sentinel_id(),
            device_type: DeviceType::Internet,
            position: sentinel_position,
            display_label: SENTINEL_LABEL.to_string(),
        };
        Self {
            nodes: vec![sentinel],
            links: Vec::new(),
            next_sequence: BTreeMap::new(),
        }
    }

    /// Id of the protected Internet node.
    #[must_use]
    pub fn sentinel_id() -> NodeId {
        NodeId::new(SENTINEL_ID)
    }

    /// Check whether `id` is the protected sentinel.
    #[must_use]
    pub fn is_sentinel(id: &NodeId) -> bool {
        id.as_str() == SENTINEL_ID
    }

    // =========================================================================
    // NODES
    // =========================================================================

    /// Place a new device of `device_type`. Always succeeds.
    pub fn place_device(&mut self, device_type: DeviceType, position: Position) -> &DeviceInstance {
        let counter = self
            .next_sequence
            .entry(device_type)
            .or_insert(FIRST_SEQUENCE);
        let sequence = *counter;
        *counter = counter.saturating_add(1);

        let index = self.nodes.len();
        self.nodes
            .push(DeviceInstance::new(device_type, sequence, position));
        &self.nodes[index]
    }

    /// Remove a device and every link touching it.
    ///
    /// Returns `false` (and changes nothing) for the sentinel or unknown ids.
    pub fn remove_device(&mut self, id: &NodeId) -> bool {
        if Self::is_sentinel(id) {
            return false;
        }
        let before = self.nodes.len();
        self.nodes.retain(|n| &n.id != id);
        if self.nodes.len() == before {
            return false;
        }
        self.links.retain(|l| !l.involves(id));
        true
    }

    /// Move a device. Returns `false` for unknown ids.
    pub fn move_device(&mut self, id: &NodeId, position: Position) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Replace the label shown on a device. Returns `false` for unknown ids.
    pub fn set_display_label(&mut self, id: &NodeId, label: impl Into<String>) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.display_label = label.into();
                true
            }
            None => false,
        }
    }

    /// Look up a device.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&DeviceInstance> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    fn node_mut(&mut self, id: &NodeId) -> Option<&mut DeviceInstance> {
        self.nodes.iter_mut().find(|n| &n.id == id)
    }

    /// Check if a device is placed.
    #[must_use]
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    /// All devices in placement order.
    pub fn nodes(&self) -> impl Iterator<Item = &DeviceInstance> {
        self.nodes.iter()
    }

    /// Number of placed devices, sentinel included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The sequence number the next device of `device_type` will receive.
    #[must_use]
    pub fn next_sequence(&self, device_type: DeviceType) -> u64 {
        self.next_sequence
            .get(&device_type)
            .copied()
            .unwrap_or(FIRST_SEQUENCE)
    }

    // =========================================================================
    // LINKS
    // =========================================================================

    /// Append a link. No rule or duplicate checking happens here.
    pub fn add_link(
        &mut self,
        source: NodeId,
        target: NodeId,
        label: impl Into<String>,
    ) -> &LinkInstance {
        let index = self.links.len();
        self.links.push(LinkInstance::new(source, target, label));
        &self.links[index]
    }

    /// Check for a link with exactly this ordered pair.
    #[must_use]
    pub fn has_link(&self, source: &NodeId, target: &NodeId) -> bool {
        self.links.iter().any(|l| l.connects(source, target))
    }

    /// Remove the link with exactly this ordered pair.
    pub fn remove_link(&mut self, source: &NodeId, target: &NodeId) -> bool {
        let before = self.links.len();
        self.links.retain(|l| !l.connects(source, target));
        self.links.len() != before
    }

    /// All links in creation order.
    pub fn links(&self) -> impl Iterator<Item = &LinkInstance> {
        self.links.iter()
    }

    /// Number of links.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn topology() -> Topology {
        Topology::new(Position::new(400, 50))
    }

    #[test]
    fn starts_with_sentinel_only() {
        let topo = topology();
        assert_eq!(topo.node_count(), 1);
        assert_eq!(topo.link_count(), 0);

        let sentinel = topo.node(&Topology::sentinel_id()).expect("sentinel");
        assert_eq!(sentinel.display_label, "Internet");
        assert_eq!(sentinel.device_type, DeviceType::Internet);
        assert_eq!(sentinel.position, Position::new(400, 50));
    }

    #[test]
    fn sequence_numbers_are_per_type() {
        let mut topo = topology();
        let r1 = topo.place_device(DeviceType::Router, Position::default()).id.clone();
        let s1 = topo.place_device(DeviceType::Switch, Position::default()).id.clone();
        let r2 = topo.place_device(DeviceType::Router, Position::default()).id.clone();

        assert_eq!(r1.as_str(), "Router-1");
        assert_eq!(s1.as_str(), "Switch-1");
        assert_eq!(r2.as_str(), "Router-2");
    }

    #[test]
    fn sequence_numbers_are_never_reused() {
        let mut topo = topology();
        let first = topo.place_device(DeviceType::Pc, Position::default()).id.clone();
        assert!(topo.remove_device(&first));

        let second = topo.place_device(DeviceType::Pc, Position::default());
        assert_eq!(second.id.as_str(), "PC-2");
        assert_eq!(topo.next_sequence(DeviceType::Pc), 3);
    }

    #[test]
    fn placing_internet_does_not_collide_with_sentinel() {
        let mut topo = topology();
        let extra = topo.place_device(DeviceType::Internet, Position::default());
        assert_eq!(extra.id.as_str(), "Internet-1");
        assert_eq!(extra.display_label, "Internet 1");
    }

    #[test]
    fn sentinel_cannot_be_removed() {
        let mut topo = topology();
        assert!(!topo.remove_device(&Topology::sentinel_id()));
        assert_eq!(topo.node_count(), 1);
    }

    #[test]
    fn remove_unknown_is_noop() {
        let mut topo = topology();
        assert!(!topo.remove_device(&NodeId::new("Router-9")));
        assert_eq!(topo.node_count(), 1);
    }

    #[test]
    fn removing_a_node_drops_its_links() {
        let mut topo = topology();
        let modem = topo.place_device(DeviceType::Modem, Position::default()).id.clone();
        let router = topo.place_device(DeviceType::Router, Position::default()).id.clone();
        topo.add_link(modem.clone(), Topology::sentinel_id(), "Coax, Fiber, or DSL");
        topo.add_link(router.clone(), modem.clone(), "Ethernet");

        assert!(topo.remove_device(&router));
        assert_eq!(topo.link_count(), 1);
        assert!(topo.has_link(&modem, &Topology::sentinel_id()));
    }

    #[test]
    fn has_link_is_ordered() {
        let mut topo = topology();
        let a = NodeId::new("Router-1");
        let b = NodeId::new("Modem-1");
        topo.add_link(a.clone(), b.clone(), "Ethernet");

        assert!(topo.has_link(&a, &b));
        assert!(!topo.has_link(&b, &a));
    }

    #[test]
    fn remove_link_by_ordered_pair() {
        let mut topo = topology();
        let a = NodeId::new("Router-1");
        let b = NodeId::new("Modem-1");
        topo.add_link(a.clone(), b.clone(), "Ethernet");

        assert!(!topo.remove_link(&b, &a));
        assert!(topo.remove_link(&a, &b));
        assert_eq!(topo.link_count(), 0);
    }

    #[test]
    fn move_and_relabel() {
        let mut topo = topology();
        let id = topo.place_device(DeviceType::Server, Position::default()).id.clone();

        assert!(topo.move_device(&id, Position::new(7, 8)));
        assert!(topo.set_display_label(&id, "Web"));
        let node = topo.node(&id).expect("node");
        assert_eq!(node.position, Position::new(7, 8));
        assert_eq!(node.display_label, "Web");

        let ghost = NodeId::new("Server-5");
        assert!(!topo.move_device(&ghost, Position::default()));
        assert!(!topo.set_display_label(&ghost, "x"));
    }
}
