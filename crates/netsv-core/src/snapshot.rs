//! # Render State
//!
//! The outbound half of the canvas contract: everything the surface needs to
//! redraw, and nothing else.

use crate::topology::Topology;
use crate::{DeviceType, NodeId, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A node as the canvas draws it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeView {
    pub id: NodeId,
    pub label: String,
    pub position: Position,
    pub device_type: DeviceType,
}

/// An edge as the canvas draws it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeView {
    pub source: NodeId,
    pub target: NodeId,
    pub label: String,
}

/// Full node and edge lists, in render order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderState {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

impl RenderState {
    /// Capture the current topology.
    #[must_use]
    pub fn from_topology(topology: &Topology) -> Self {
        let nodes = topology
            .nodes()
            .map(|n| NodeView {
                id: n.id.clone(),
                label: n.display_label.clone(),
                position: n.position,
                device_type: n.device_type,
            })
            .collect();
        let edges = topology
            .links()
            .map(|l| EdgeView {
                source: l.source.clone(),
                target: l.target.clone(),
                label: l.label.clone(),
            })
            .collect();
        Self { nodes, edges }
    }

    /// Find a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&NodeView> {
        self.nodes.iter().find(|n| n.id.as_str() == id)
    }
}

// =============================================================================
// TOPOLOGY METRICS
// =============================================================================

/// Summary counts for status output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyMetrics {
    /// Placed devices, sentinel included.
    pub node_count: usize,
    /// Accepted links.
    pub link_count: usize,
    /// Placed devices per type (types with none are omitted).
    pub by_type: BTreeMap<DeviceType, usize>,
    /// Links per distinct medium label.
    pub by_medium: BTreeMap<String, usize>,
    /// Nodes currently showing their description.
    pub revealed: usize,
}

impl TopologyMetrics {
    /// Compute metrics from a topology. Reveal state lives in the controller,
    /// so `revealed` starts at zero.
    #[must_use]
    pub fn from_topology(topology: &Topology) -> Self {
        let mut by_type = BTreeMap::new();
        for node in topology.nodes() {
            *by_type.entry(node.device_type).or_insert(0) += 1;
        }
        let mut by_medium = BTreeMap::new();
        for link in topology.links() {
            *by_medium.entry(link.label.clone()).or_insert(0) += 1;
        }
        Self {
            node_count: topology.node_count(),
            link_count: topology.link_count(),
            by_type,
            by_medium,
            revealed: 0,
        }
    }
}
