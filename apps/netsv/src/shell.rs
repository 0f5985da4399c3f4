//! # Interactive Shell
//!
//! Drives a sandbox session from text gestures with real-time reveal timers.
//!
//! ## Event Loop
//!
//! ```text
//! stdin lines ──┐
//!               ├──> select! ──> InteractionController
//! timer channel ┘                       │
//!      ▲                                │ schedule / cancel
//!      └──────── TokioScheduler <───────┘
//! ```
//!
//! Timers run as tokio tasks that only send their [`RevertTask`] back over a
//! channel; the controller is touched by the loop alone. When input closes,
//! the loop keeps running until every outstanding reveal has reverted.
//!
//! ## Gestures
//!
//! ```text
//! place <Type>                  connect <source> <target>
//! click <id>                    remove <id>
//! move <id> <x> <y>             unlink <source> <target>
//! show                          help
//! quit
//! ```
//!
//! Ids may contain spaces (`Access Point-1`); every id ends at the token
//! carrying the `-` separator.

use netsv_core::{
    ConnectOutcome, DeferredCall, DeviceType, InteractionController, NodeId, Position, RevertTask,
    RuleBook, SandboxError, TimerId,
};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

// =============================================================================
// TOKIO SCHEDULER
// =============================================================================

/// Wall-clock deferred calls on the current tokio runtime.
#[derive(Debug)]
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<RevertTask>,
    handles: BTreeMap<TimerId, AbortHandle>,
}

impl TokioScheduler {
    /// Create a scheduler and the receiver its expiries arrive on.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RevertTask>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            tx,
            handles: BTreeMap::new(),
        };
        (scheduler, rx)
    }

    /// Number of timers not yet delivered or cancelled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.handles.len()
    }
}

impl DeferredCall for TokioScheduler {
    fn schedule(&mut self, delay: Duration, task: RevertTask) {
        let timer = task.timer;
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver only closes when the session ends.
            let _ = tx.send(task);
        });
        self.handles.insert(timer, handle.abort_handle());
    }

    fn cancel(&mut self, timer: TimerId) {
        if let Some(handle) = self.handles.remove(&timer) {
            handle.abort();
        }
    }

    fn acknowledge(&mut self, timer: TimerId) {
        self.handles.remove(&timer);
    }
}

// =============================================================================
// COMMAND PARSING
// =============================================================================

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Place(DeviceType),
    Connect(NodeId, NodeId),
    Click(NodeId),
    Remove(NodeId),
    Move(NodeId, Position),
    Unlink(NodeId, NodeId),
    Show,
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse a line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, SandboxError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match verb {
            "place" => Self::Place(rest.parse()?),
            "connect" => {
                let (source, target) = two_ids(verb, rest)?;
                Self::Connect(source, target)
            }
            "unlink" => {
                let (source, target) = two_ids(verb, rest)?;
                Self::Unlink(source, target)
            }
            "click" => Self::Click(one_id(verb, rest)?),
            "remove" => Self::Remove(one_id(verb, rest)?),
            "move" => {
                let mut tokens: Vec<&str> = rest.split_whitespace().collect();
                let (Some(y), Some(x)) = (tokens.pop(), tokens.pop()) else {
                    return Err(usage("move <id> <x> <y>"));
                };
                let x = x.parse().map_err(|_| usage("move <id> <x> <y>"))?;
                let y = y.parse().map_err(|_| usage("move <id> <x> <y>"))?;
                Self::Move(one_id(verb, &tokens.join(" "))?, Position::new(x, y))
            }
            "show" => Self::Show,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => {
                return Err(SandboxError::InvalidScript(format!(
                    "unknown command {:?} (try `help`)",
                    other
                )));
            }
        };
        Ok(Some(command))
    }
}

fn usage(form: &str) -> SandboxError {
    SandboxError::InvalidScript(format!("usage: {}", form))
}

/// Group whitespace tokens into ids, closing each at the token with a separator.
fn split_ids(rest: &str) -> Vec<NodeId> {
    let mut ids = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for token in rest.split_whitespace() {
        current.push(token);
        if token.contains(NodeId::SEPARATOR) {
            ids.push(NodeId::new(current.join(" ")));
            current.clear();
        }
    }
    if !current.is_empty() {
        ids.push(NodeId::new(current.join(" ")));
    }
    ids
}

fn one_id(verb: &str, rest: &str) -> Result<NodeId, SandboxError> {
    let mut ids = split_ids(rest);
    match (ids.pop(), ids.is_empty()) {
        (Some(id), true) => Ok(id),
        _ => Err(usage(&format!("{} <id>", verb))),
    }
}

fn two_ids(verb: &str, rest: &str) -> Result<(NodeId, NodeId), SandboxError> {
    let ids = split_ids(rest);
    match <[NodeId; 2]>::try_from(ids) {
        Ok([source, target]) => Ok((source, target)),
        Err(_) => Err(usage(&format!("{} <source> <target>", verb))),
    }
}

const HELP: &str = "\
place <Type>               add a device (e.g. `place Access Point`)
connect <source> <target>  draw a link
unlink <source> <target>   delete a link
click <id>                 reveal the device description
remove <id>                delete a device
move <id> <x> <y>          drag a device
show                       print the canvas
quit                       leave the shell";

// =============================================================================
// SESSION LOOP
// =============================================================================

/// Run a shell session reading gestures from `input` and writing to `output`.
pub async fn run_session<R, W>(
    book: RuleBook,
    input: R,
    output: &mut W,
    json_mode: bool,
) -> Result<(), SandboxError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (scheduler, mut expiries) = TokioScheduler::channel();
    let mut controller = InteractionController::new(book, scheduler);
    let mut lines = input.lines();
    let mut input_open = true;

    while input_open || controller.pending_reverts() > 0 {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                let line = line.map_err(|e| SandboxError::IoError(e.to_string()))?;
                let Some(line) = line else {
                    input_open = false;
                    continue;
                };
                match ShellCommand::parse(&line) {
                    Ok(Some(ShellCommand::Quit)) => break,
                    Ok(Some(command)) => {
                        let reply = apply(&mut controller, command, json_mode);
                        emit(output, &reply).await?;
                    }
                    Ok(None) => {}
                    Err(e) => emit(output, &error_reply(&e, json_mode)).await?,
                }
            }
            Some(task) = expiries.recv() => {
                let node = task.node.clone();
                if controller.fire(task) {
                    let label = controller
                        .topology()
                        .node(&node)
                        .map(|n| n.display_label.clone());
                    if let Some(label) = label {
                        let reply = if json_mode {
                            serde_json::json!({"reverted": node, "label": label}).to_string()
                        } else {
                            format!("{} reverted to {:?}", node, label)
                        };
                        emit(output, &reply).await?;
                    }
                }
            }
            else => break,
        }
    }

    output
        .flush()
        .await
        .map_err(|e| SandboxError::IoError(e.to_string()))
}

async fn emit<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<(), SandboxError> {
    output
        .write_all(format!("{}\n", text).as_bytes())
        .await
        .map_err(|e| SandboxError::IoError(e.to_string()))
}

fn error_reply(error: &SandboxError, json_mode: bool) -> String {
    if json_mode {
        serde_json::json!({"error": error.to_string()}).to_string()
    } else {
        format!("error: {}", error)
    }
}

/// Apply one command and describe what happened.
fn apply(
    controller: &mut InteractionController<TokioScheduler>,
    command: ShellCommand,
    json_mode: bool,
) -> String {
    match command {
        ShellCommand::Place(device_type) => {
            let device = controller.place_device(device_type);
            if json_mode {
                serde_json::json!({"placed": device.id, "position": device.position}).to_string()
            } else {
                format!(
                    "placed {} at ({}, {})",
                    device.id, device.position.x, device.position.y
                )
            }
        }
        ShellCommand::Connect(source, target) => {
            match controller.connect(Some(&source), Some(&target)) {
                ConnectOutcome::Linked(link) => {
                    if json_mode {
                        serde_json::json!({"linked": link}).to_string()
                    } else {
                        format!("linked {} → {} ({})", link.source, link.target, link.label)
                    }
                }
                ConnectOutcome::Rejected(rejection) => {
                    if json_mode {
                        serde_json::json!({"rejected": format!("{:?}", rejection)}).to_string()
                    } else {
                        format!("rejected: {:?}", rejection)
                    }
                }
            }
        }
        ShellCommand::Click(id) => {
            if controller.click(&id) {
                let label = controller
                    .topology()
                    .node(&id)
                    .map(|n| n.display_label.clone())
                    .unwrap_or_default();
                if json_mode {
                    serde_json::json!({"revealed": id, "label": label}).to_string()
                } else {
                    format!("{}: {}", id, label)
                }
            } else {
                missing(&id, json_mode)
            }
        }
        ShellCommand::Remove(id) => {
            let removed = controller.remove_device(&id);
            if json_mode {
                serde_json::json!({"removed": id, "ok": removed}).to_string()
            } else if removed {
                format!("removed {}", id)
            } else {
                format!("{} not removed", id)
            }
        }
        ShellCommand::Move(id, position) => {
            if !controller.move_device(&id, position) {
                return missing(&id, json_mode);
            }
            if json_mode {
                serde_json::json!({"moved": id, "position": position}).to_string()
            } else {
                format!("moved {} to ({}, {})", id, position.x, position.y)
            }
        }
        ShellCommand::Unlink(source, target) => {
            let removed = controller.remove_link(&source, &target);
            if json_mode {
                serde_json::json!({"unlinked": {"source": source, "target": target}, "ok": removed})
                    .to_string()
            } else if removed {
                format!("unlinked {} → {}", source, target)
            } else {
                format!("no link {} → {}", source, target)
            }
        }
        ShellCommand::Show => show(controller, json_mode),
        ShellCommand::Help => {
            if json_mode {
                serde_json::json!({"help": HELP.lines().collect::<Vec<_>>()}).to_string()
            } else {
                HELP.to_string()
            }
        }
        ShellCommand::Quit => String::new(),
    }
}

fn missing(id: &NodeId, json_mode: bool) -> String {
    if json_mode {
        serde_json::json!({"error": "no such node", "id": id}).to_string()
    } else {
        format!("no such node: {}", id)
    }
}

fn show(controller: &InteractionController<TokioScheduler>, json_mode: bool) -> String {
    let state = controller.render_state();
    if json_mode {
        return serde_json::to_string(&state).unwrap_or_default();
    }

    let mut out = String::new();
    out.push_str(&format!("Nodes ({}):", state.nodes.len()));
    for node in &state.nodes {
        out.push_str(&format!(
            "\n  {:<16} ({:>4}, {:>4})  {}",
            node.id.as_str(),
            node.position.x,
            node.position.y,
            node.label
        ));
    }
    out.push_str(&format!("\nLinks ({}):", state.edges.len()));
    for edge in &state.edges {
        out.push_str(&format!(
            "\n  {} → {}  [{}]",
            edge.source, edge.target, edge.label
        ));
    }
    out.push_str(&format!(
        "\nTimers: {}",
        controller.scheduler().pending()
    ));
    out
}
