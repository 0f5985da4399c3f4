//! # netsv-core
//!
//! The rule engine for the NetworkSV topology sandbox - THE RULES.
//!
//! This crate decides what a user may build on the sandbox canvas: which device
//! types may be wired to which, what medium a link is labeled with, and how
//! clicks reveal device descriptions for a few seconds before reverting.
//!
//! ## Layers
//!
//! - Static tables: `catalog`, `rules`, `labels`, bundled into a `RuleBook`
//!   by `config`
//! - Session state: `topology` (placed devices and accepted links)
//! - Gesture mediation: `controller`, fed by `events`, rendered via `snapshot`
//! - Time: `scheduler` (the deferred-call capability and a virtual clock)
//!
//! ## Architectural Constraints
//!
//! - Single logical thread: the controller owns the topology and timer registry
//! - Invalid gestures are silent no-ops, never errors
//! - Has NO async, NO I/O (pure Rust); real-time timers live in the binary

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod config;
pub mod controller;
pub mod events;
pub mod labels;
pub mod placement;
pub mod primitives;
pub mod rules;
pub mod scheduler;
pub mod snapshot;
pub mod topology;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{DeviceInstance, DeviceType, LinkInstance, NodeId, Position, SandboxError};

// =============================================================================
// RE-EXPORTS: Tables and Configuration
// =============================================================================

pub use catalog::{Catalog, DeviceInfo};
pub use config::{DeviceOverride, PlacementArea, PlacementConfig, RuleBook, SandboxConfig};
pub use labels::{LabelRules, fallback_label};
pub use rules::CompatibilityRules;

// =============================================================================
// RE-EXPORTS: Session
// =============================================================================

pub use controller::{ConnectOutcome, InteractionController, Rejection, RevealState};
pub use events::{CanvasEvent, EdgeChange, NodeChange};
pub use placement::{FixedPlacement, Placement, RandomPlacement};
pub use scheduler::{DeferredCall, RevertTask, TimerId, VirtualScheduler};
pub use snapshot::{EdgeView, NodeView, RenderState, TopologyMetrics};
pub use topology::Topology;

// =============================================================================
// RE-EXPORTS: Primitives
// =============================================================================

pub use primitives::{MAX_SCRIPT_STEPS, REVEAL_DELAY_MS, SENTINEL_ID};
