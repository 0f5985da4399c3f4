//! # Canvas Events
//!
//! The inbound half of the contract with the canvas surface. Each variant is
//! one gesture; [`crate::InteractionController::handle`] dispatches them.
//!
//! Events serialize as internally tagged JSON:
//!
//! ```json
//! {"event": "place_device", "device_type": "Router"}
//! {"event": "connect_attempt", "source": "Router-1", "target": "Modem-1"}
//! {"event": "nodes_changed", "changes": [{"type": "move", "id": "Router-1", "position": {"x": 5, "y": 9}}]}
//! ```

use crate::{DeviceType, NodeId, Position};
use serde::{Deserialize, Serialize};

/// One gesture reported by the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CanvasEvent {
    /// A palette button was pressed.
    PlaceDevice { device_type: DeviceType },
    /// The user dragged from one node handle to another.
    ConnectAttempt {
        #[serde(default)]
        source: Option<NodeId>,
        #[serde(default)]
        target: Option<NodeId>,
    },
    /// A node was clicked.
    NodeClicked { id: NodeId },
    /// A node deletion was requested.
    RemoveNode { id: NodeId },
    /// A batch of node deltas (drag, delete, add).
    NodesChanged { changes: Vec<NodeChange> },
    /// A batch of edge deltas.
    EdgesChanged { changes: Vec<EdgeChange> },
}

/// A single node delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeChange {
    Add { device_type: DeviceType },
    Move { id: NodeId, position: Position },
    Remove { id: NodeId },
}

/// A single edge delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EdgeChange {
    Remove { source: NodeId, target: NodeId },
}
