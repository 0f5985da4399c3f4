//! # Interaction Controller
//!
//! Mediates canvas gestures against the rule book and owns the session state.
//!
//! ## Gestures
//!
//! - **place**: always succeeds; the topology assigns the id.
//! - **connect**: rejected, in this order, when an endpoint is missing, the
//!   endpoints are equal, the exact ordered pair is already linked, or the
//!   source type may not connect to the target type. Otherwise the link is
//!   labeled and committed.
//! - **click**: swaps the node label for its catalog description and
//!   schedules a revert.
//! - **remove**: the sentinel is filtered out; anything else passes through.
//!
//! Rejections never surface as errors. They are traced at debug level and
//! leave the topology untouched.
//!
//! ## Reveal State Machine
//!
//! Each node is `Normal` or `Revealed`:
//!
//! ```text
//! Normal   --click-->  Revealed   (schedule revert)
//! Revealed --click-->  Revealed   (cancel, re-capture label, reschedule)
//! Revealed --expiry--> Normal     (restore captured label)
//! ```
//!
//! A re-click captures whatever the node shows at that moment, which while
//! revealed is the description itself. Clicking faster than the delay therefore
//! leaves the description on the node after the final expiry.
//!
//! Removing a node does not cancel its timer; the expiry finds no node to
//! relabel and only clears the timer entry.

use crate::config::RuleBook;
use crate::events::{CanvasEvent, EdgeChange, NodeChange};
use crate::placement::{Placement, RandomPlacement};
use crate::scheduler::{DeferredCall, RevertTask, TimerId, VirtualScheduler};
use crate::snapshot::{RenderState, TopologyMetrics};
use crate::topology::Topology;
use crate::{DeviceInstance, DeviceType, LinkInstance, NodeId, Position};
use std::collections::BTreeMap;
use std::time::Duration;

// =============================================================================
// OUTCOMES
// =============================================================================

/// Why a connect gesture had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// An endpoint was absent from the gesture or is not a placed node.
    MissingEndpoint,
    /// Source and target are the same node.
    SelfLoop,
    /// A link with the same ordered endpoints exists.
    Duplicate,
    /// The rules do not permit this direction (or a type is unknown).
    NotAllowed {
        source: Option<DeviceType>,
        target: Option<DeviceType>,
    },
}

/// Result of a connect gesture, for diagnostics and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    Linked(LinkInstance),
    Rejected(Rejection),
}

impl ConnectOutcome {
    /// Check whether a link was created.
    #[must_use]
    pub fn is_linked(&self) -> bool {
        matches!(self, ConnectOutcome::Linked(_))
    }
}

/// Per-node reveal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Normal,
    Revealed { timer: TimerId },
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Owns the topology and the reveal timers of one sandbox session.
pub struct InteractionController<S: DeferredCall = VirtualScheduler> {
    book: RuleBook,
    topology: Topology,
    scheduler: S,
    placement: Box<dyn Placement>,
    /// Pending revert timer per node (present = `Revealed`).
    reveals: BTreeMap<NodeId, TimerId>,
    next_timer: u64,
}

impl<S: DeferredCall> std::fmt::Debug for InteractionController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionController")
            .field("topology", &self.topology)
            .field("reveals", &self.reveals)
            .field("next_timer", &self.next_timer)
            .finish_non_exhaustive()
    }
}

impl<S: DeferredCall> InteractionController<S> {
    /// Start a session with random placement over the rule book's area.
    #[must_use]
    pub fn new(book: RuleBook, scheduler: S) -> Self {
        let placement = RandomPlacement::new(book.placement);
        Self::with_placement(book, scheduler, placement)
    }

    /// Start a session with an explicit placement strategy.
    #[must_use]
    pub fn with_placement(
        book: RuleBook,
        scheduler: S,
        placement: impl Placement + 'static,
    ) -> Self {
        let topology = Topology::new(book.sentinel_position);
        Self {
            book,
            topology,
            scheduler,
            placement: Box::new(placement),
            reveals: BTreeMap::new(),
            next_timer: 0,
        }
    }

    /// The tables this session runs against.
    #[must_use]
    pub fn rule_book(&self) -> &RuleBook {
        &self.book
    }

    /// The current topology.
    #[must_use]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// The scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Snapshot for the canvas to redraw from.
    #[must_use]
    pub fn render_state(&self) -> RenderState {
        RenderState::from_topology(&self.topology)
    }

    /// Summary counts, including how many nodes are revealed.
    #[must_use]
    pub fn metrics(&self) -> TopologyMetrics {
        let mut metrics = TopologyMetrics::from_topology(&self.topology);
        metrics.revealed = self.reveals.len();
        metrics
    }

    // =========================================================================
    // DISPATCH
    // =========================================================================

    /// Apply one canvas event. Invalid gestures are silent no-ops.
    pub fn handle(&mut self, event: CanvasEvent) {
        match event {
            CanvasEvent::PlaceDevice { device_type } => {
                self.place_device(device_type);
            }
            CanvasEvent::ConnectAttempt { source, target } => {
                self.connect(source.as_ref(), target.as_ref());
            }
            CanvasEvent::NodeClicked { id } => {
                self.click(&id);
            }
            CanvasEvent::RemoveNode { id } => {
                self.remove_device(&id);
            }
            CanvasEvent::NodesChanged { changes } => self.apply_node_changes(changes),
            CanvasEvent::EdgesChanged { changes } => self.apply_edge_changes(changes),
        }
    }

    // =========================================================================
    // GESTURES
    // =========================================================================

    /// Place a new device at a position chosen by the placement strategy.
    pub fn place_device(&mut self, device_type: DeviceType) -> &DeviceInstance {
        let position = self.placement.next_position();
        let device = self.topology.place_device(device_type, position);
        tracing::debug!(id = %device.id, x = position.x, y = position.y, "device placed");
        device
    }

    /// Attempt a connection from `source` to `target`.
    pub fn connect(&mut self, source: Option<&NodeId>, target: Option<&NodeId>) -> ConnectOutcome {
        match self.validate_connection(source, target) {
            Ok((source, target, source_type, target_type)) => {
                let label = self.book.labels.resolve_label(source_type, target_type);
                tracing::debug!(%source, %target, %label, "link created");
                let link = self.topology.add_link(source, target, label);
                ConnectOutcome::Linked(link.clone())
            }
            Err(rejection) => {
                tracing::debug!(
                    source = ?source.map(NodeId::as_str),
                    target = ?target.map(NodeId::as_str),
                    ?rejection,
                    "connection not allowed"
                );
                ConnectOutcome::Rejected(rejection)
            }
        }
    }

    fn validate_connection(
        &self,
        source: Option<&NodeId>,
        target: Option<&NodeId>,
    ) -> Result<(NodeId, NodeId, DeviceType, DeviceType), Rejection> {
        let (Some(source), Some(target)) = (source, target) else {
            return Err(Rejection::MissingEndpoint);
        };
        if !self.topology.contains_node(source) || !self.topology.contains_node(target) {
            return Err(Rejection::MissingEndpoint);
        }
        if source == target {
            return Err(Rejection::SelfLoop);
        }
        if self.topology.has_link(source, target) {
            return Err(Rejection::Duplicate);
        }

        let source_type = source.device_type();
        let target_type = target.device_type();
        match (source_type, target_type) {
            (Some(s), Some(t)) if self.book.rules.is_allowed(s, t) => {
                Ok((source.clone(), target.clone(), s, t))
            }
            _ => Err(Rejection::NotAllowed {
                source: source_type,
                target: target_type,
            }),
        }
    }

    /// Reveal a node's description and schedule the revert.
    ///
    /// Returns `false` if no such node is placed.
    pub fn click(&mut self, id: &NodeId) -> bool {
        let Some(node) = self.topology.node(id) else {
            tracing::debug!(%id, "click on unknown node ignored");
            return false;
        };
        let original_label = node.display_label.clone();
        let device_type = node.device_type;

        if let Some(previous) = self.reveals.remove(id) {
            self.scheduler.cancel(previous);
            tracing::debug!(%id, timer = %previous, "reveal restarted");
        }

        let description = self.book.catalog.description(device_type).to_string();
        self.topology.set_display_label(id, description);

        let timer = self.allocate_timer();
        self.scheduler.schedule(
            self.book.reveal_delay,
            RevertTask {
                timer,
                node: id.clone(),
                original_label,
            },
        );
        self.reveals.insert(id.clone(), timer);
        tracing::debug!(%id, %timer, "description revealed");
        true
    }

    /// Remove a device. The sentinel is filtered out.
    pub fn remove_device(&mut self, id: &NodeId) -> bool {
        if Topology::is_sentinel(id) {
            tracing::debug!(%id, "removal of the Internet node ignored");
            return false;
        }
        let removed = self.topology.remove_device(id);
        if removed {
            tracing::debug!(%id, "device removed");
        }
        removed
    }

    /// Apply a batch of node deltas in order, minus any sentinel removal.
    pub fn apply_node_changes(&mut self, changes: Vec<NodeChange>) {
        let filtered = changes
            .into_iter()
            .filter(|c| !matches!(c, NodeChange::Remove { id } if Topology::is_sentinel(id)));

        for change in filtered {
            match change {
                NodeChange::Add { device_type } => {
                    self.place_device(device_type);
                }
                NodeChange::Move { id, position } => {
                    self.move_device(&id, position);
                }
                NodeChange::Remove { id } => {
                    self.remove_device(&id);
                }
            }
        }
    }

    /// Apply a batch of edge deltas in order.
    pub fn apply_edge_changes(&mut self, changes: Vec<EdgeChange>) {
        for change in changes {
            match change {
                EdgeChange::Remove { source, target } => {
                    self.remove_link(&source, &target);
                }
            }
        }
    }

    /// Drag a device to `position`. Returns `false` if no such node is placed.
    pub fn move_device(&mut self, id: &NodeId, position: Position) -> bool {
        let moved = self.topology.move_device(id, position);
        if !moved {
            tracing::debug!(%id, "move of unknown node ignored");
        }
        moved
    }

    /// Delete the link with exactly this ordered pair.
    pub fn remove_link(&mut self, source: &NodeId, target: &NodeId) -> bool {
        let removed = self.topology.remove_link(source, target);
        if removed {
            tracing::debug!(%source, %target, "link removed");
        }
        removed
    }

    // =========================================================================
    // TIMERS
    // =========================================================================

    /// Apply a due revert task.
    ///
    /// Tasks whose timer is no longer the node's pending timer were cancelled
    /// and are ignored. Returns whether the task was current.
    pub fn fire(&mut self, task: RevertTask) -> bool {
        self.scheduler.acknowledge(task.timer);
        if self.reveals.get(&task.node) != Some(&task.timer) {
            tracing::debug!(node = %task.node, timer = %task.timer, "stale revert ignored");
            return false;
        }
        self.reveals.remove(&task.node);
        if !self
            .topology
            .set_display_label(&task.node, task.original_label)
        {
            tracing::debug!(node = %task.node, "revert for removed node");
        }
        true
    }

    /// Reveal state of a node.
    #[must_use]
    pub fn reveal_state(&self, id: &NodeId) -> RevealState {
        self.reveals
            .get(id)
            .map_or(RevealState::Normal, |&timer| RevealState::Revealed { timer })
    }

    /// Number of outstanding revert timers.
    #[must_use]
    pub fn pending_reverts(&self) -> usize {
        self.reveals.len()
    }

    fn allocate_timer(&mut self) -> TimerId {
        self.next_timer = self.next_timer.saturating_add(1);
        TimerId(self.next_timer)
    }
}

impl InteractionController<VirtualScheduler> {
    /// Start a session on a fresh virtual clock.
    #[must_use]
    pub fn virtual_clock(book: RuleBook, placement: impl Placement + 'static) -> Self {
        Self::with_placement(book, VirtualScheduler::new(), placement)
    }

    /// Advance virtual time and apply every revert that became due.
    ///
    /// Returns the number of reverts applied.
    pub fn advance(&mut self, by: Duration) -> usize {
        let due = self.scheduler.advance(by);
        let mut applied = 0;
        for task in due {
            if self.fire(task) {
                applied += 1;
            }
        }
        applied
    }
}

// =============================================================================
// TESTS
// =============================================================================
