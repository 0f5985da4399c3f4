//! # Gesture Scripts
//!
//! Recorded canvas sessions replayed against a virtual clock.
//!
//! A script is a JSON array whose elements are either canvas events or wait
//! steps:
//!
//! ```json
//! [
//!   {"event": "place_device", "device_type": "Router"},
//!   {"event": "node_clicked", "id": "Router-1"},
//!   {"wait_ms": 3000}
//! ]
//! ```

use netsv_core::{
    CanvasEvent, InteractionController, MAX_SCRIPT_STEPS, RenderState, RuleBook, SandboxError,
    TopologyMetrics, VirtualScheduler,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One script element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptStep {
    /// A gesture, exactly as the canvas would report it.
    Event(CanvasEvent),
    /// Let virtual time pass.
    Wait { wait_ms: u64 },
}

/// Parse a script, enforcing the step limit.
pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>, SandboxError> {
    let steps: Vec<ScriptStep> =
        serde_json::from_str(text).map_err(|e| SandboxError::InvalidScript(e.to_string()))?;

    if steps.len() > MAX_SCRIPT_STEPS {
        return Err(SandboxError::InvalidScript(format!(
            "script has {} steps, limit is {}",
            steps.len(),
            MAX_SCRIPT_STEPS
        )));
    }
    Ok(steps)
}

/// Outcome of a replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    /// Gestures dispatched.
    pub events: usize,
    /// Total virtual time waited, in milliseconds.
    pub waited_ms: u64,
    /// Reveal timers that expired during the replay.
    pub reverts_applied: usize,
    /// Reveal timers still running when the script ended.
    pub reverts_pending: usize,
    /// Final canvas contents.
    pub render: RenderState,
    pub metrics: TopologyMetrics,
}

/// Replay `steps` from a fresh session.
///
/// With `settle`, the clock runs past the reveal delay after the last step so
/// every outstanding reveal reverts before the report is taken.
pub fn replay(book: RuleBook, steps: Vec<ScriptStep>, settle: bool) -> ReplayReport {
    let delay = book.reveal_delay;
    let mut controller = InteractionController::new(book, VirtualScheduler::new());
    let mut events = 0;
    let mut waited_ms: u64 = 0;
    let mut reverts_applied = 0;

    for (index, step) in steps.into_iter().enumerate() {
        match step {
            ScriptStep::Event(event) => {
                tracing::debug!(step = index, ?event, "replaying gesture");
                controller.handle(event);
                events += 1;
            }
            ScriptStep::Wait { wait_ms } => {
                reverts_applied += controller.advance(Duration::from_millis(wait_ms));
                waited_ms = waited_ms.saturating_add(wait_ms);
            }
        }
    }

    if settle {
        reverts_applied += controller.advance(delay);
    }

    tracing::info!(events, waited_ms, reverts_applied, "replay finished");

    ReplayReport {
        events,
        waited_ms,
        reverts_applied,
        reverts_pending: controller.pending_reverts(),
        render: controller.render_state(),
        metrics: controller.metrics(),
    }
}
