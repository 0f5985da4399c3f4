//! Integration tests for the NetworkSV binary: configuration loading, script
//! replay and the interactive shell loop.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use clap::Parser;
use netsv::cli::{Cli, Commands, cmd_replay, load_rule_book, parse_config};
use netsv::script::{parse_script, replay};
use netsv::shell::run_session;
use netsv_core::{DeviceType, RuleBook, SandboxError};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

async fn run_shell(book: RuleBook, input: &str, json_mode: bool) -> String {
    let mut output: Vec<u8> = Vec::new();
    run_session(book, input.as_bytes(), &mut output, json_mode)
        .await
        .unwrap();
    String::from_utf8(output).unwrap()
}

// =============================================================================
// CLI PARSING TESTS
// =============================================================================

#[test]
fn test_cli_parses_check() {
    let cli = Cli::try_parse_from(["netsv", "--json-mode", "check", "Modem", "Internet"]).unwrap();
    assert!(cli.json_mode);
    match cli.command {
        Some(Commands::Check { source, target }) => {
            assert_eq!(source, "Modem");
            assert_eq!(target, "Internet");
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_cli_parses_replay() {
    let cli = Cli::try_parse_from(["netsv", "replay", "-f", "s.json", "--settle", "-q"]).unwrap();
    assert!(cli.quiet);
    assert!(matches!(
        cli.command,
        Some(Commands::Replay { settle: true, .. })
    ));
}

#[test]
fn test_cli_default_is_summary() {
    let cli = Cli::try_parse_from(["netsv"]).unwrap();
    assert!(cli.command.is_none());
}

// =============================================================================
// CONFIGURATION TESTS
// =============================================================================

#[test]
fn test_no_config_is_bundled() {
    let book = load_rule_book(None).unwrap();
    assert_eq!(book, RuleBook::bundled());
}

#[test]
fn test_config_overrides() {
    let file = write_temp(
        r#"
reveal_delay_ms = 500
sentinel_position = { x = 10, y = 20 }

[placement]
width = 800
height = 600
seed = 7

[devices."Router"]
description = "Moves packets between networks."
"#,
    );

    let book = load_rule_book(Some(file.path())).unwrap();
    assert_eq!(book.reveal_delay, Duration::from_millis(500));
    assert_eq!(book.placement.width, 800);
    assert_eq!(book.placement.seed, Some(7));
    assert_eq!(book.sentinel_position.x, 10);
    assert_eq!(
        book.catalog.description(DeviceType::Router),
        "Moves packets between networks."
    );
    // Untouched tables keep their bundled contents.
    assert_eq!(book.rules, RuleBook::bundled().rules);
}

#[test]
fn test_config_replaces_tables() {
    let file = write_temp(
        r#"
[rules]
"Router" = ["Switch"]

[labels]
"Router-Switch" = "Cat6"
"#,
    );

    let book = load_rule_book(Some(file.path())).unwrap();
    assert_eq!(book.rules.len(), 1);
    assert!(book.rules.is_allowed(DeviceType::Router, DeviceType::Switch));
    assert!(!book.rules.is_allowed(DeviceType::Router, DeviceType::Modem));
    assert_eq!(
        book.labels
            .resolve_label(DeviceType::Switch, DeviceType::Router),
        "Cat6"
    );
}

#[test]
fn test_config_unknown_type_rejected() {
    let file = write_temp("[rules]\n\"Toaster\" = [\"Router\"]\n");
    let result = load_rule_book(Some(file.path()));
    assert!(matches!(result, Err(SandboxError::UnknownDeviceType(_))));
}

#[test]
fn test_config_malformed_label_key_rejected() {
    let file = write_temp("[labels]\n\"RouterSwitch\" = \"Cat6\"\n");
    let result = load_rule_book(Some(file.path()));
    assert!(matches!(result, Err(SandboxError::MalformedLabelKey(_))));
}

#[test]
fn test_config_unknown_field_rejected() {
    let result = parse_config("reveal_delay = 5\n");
    assert!(matches!(result, Err(SandboxError::InvalidConfig(_))));
}

#[test]
fn test_config_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_rule_book(Some(&dir.path().join("absent.toml")));
    assert!(matches!(result, Err(SandboxError::IoError(_))));
}

// =============================================================================
// REPLAY TESTS
// =============================================================================

#[test]
fn test_replay_builds_home_network() {
    let steps = parse_script(
        r#"[
            {"event": "place_device", "device_type": "Modem"},
            {"event": "place_device", "device_type": "Router"},
            {"event": "place_device", "device_type": "Laptop"},
            {"event": "connect_attempt", "source": "Modem-1", "target": "Internet-0"},
            {"event": "connect_attempt", "source": "Router-1", "target": "Modem-1"},
            {"event": "connect_attempt", "source": "Laptop-1", "target": "Router-1"},
            {"event": "connect_attempt", "source": "Laptop-1", "target": "Laptop-1"},
            {"event": "remove_node", "id": "Internet-0"}
        ]"#,
    )
    .unwrap();

    let report = replay(RuleBook::bundled(), steps, false);
    assert_eq!(report.metrics.node_count, 4);
    assert_eq!(report.metrics.link_count, 3);
    assert!(report.render.node("Internet-0").is_some());
    assert_eq!(report.render.edges[0].label, "Coax, Fiber, or DSL");
    assert_eq!(report.render.edges[1].label, "Ethernet");
}

#[test]
fn test_replay_double_click_keeps_description() {
    let steps = parse_script(
        r#"[
            {"event": "place_device", "device_type": "Router"},
            {"event": "node_clicked", "id": "Router-1"},
            {"wait_ms": 1000},
            {"event": "node_clicked", "id": "Router-1"},
            {"wait_ms": 5000}
        ]"#,
    )
    .unwrap();

    let book = RuleBook::bundled();
    let description = book.catalog.description(DeviceType::Router).to_string();
    let report = replay(book, steps, false);

    assert_eq!(report.reverts_applied, 1);
    assert_eq!(
        report.render.node("Router-1").map(|n| n.label.clone()),
        Some(description)
    );
}

#[test]
fn test_cmd_replay_from_file() {
    let file = write_temp(r#"[{"event": "place_device", "device_type": "Switch"}]"#);
    let result = cmd_replay(RuleBook::bundled(), true, false, file.path(), true);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_replay_malformed_script() {
    let file = write_temp(r#"{"event": "place_device"}"#);
    let result = cmd_replay(RuleBook::bundled(), false, false, file.path(), false);
    assert!(matches!(result, Err(SandboxError::InvalidScript(_))));
}

// =============================================================================
// SHELL TESTS
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_shell_connect_and_reject() {
    let output = run_shell(
        RuleBook::bundled(),
        "place Gateway\nplace Firewall\nconnect Gateway-1 Firewall-1\nconnect Firewall-1 Gateway-1\n",
        false,
    )
    .await;

    assert!(output.contains("placed Gateway-1"));
    assert!(output.contains("rejected: NotAllowed"));
    assert!(output.contains("linked Firewall-1 → Gateway-1"));
}

#[tokio::test(start_paused = true)]
async fn test_shell_reveal_reverts_after_input_closes() {
    let output = run_shell(RuleBook::bundled(), "place Router\nclick Router-1\n", false).await;

    assert!(output.contains("Router-1 reverted to \"Router 1\""));
}

#[tokio::test(start_paused = true)]
async fn test_shell_double_click_reverts_once() {
    let output = run_shell(
        RuleBook::bundled(),
        "place Router\nclick Router-1\nclick Router-1\n",
        false,
    )
    .await;

    assert_eq!(output.matches("reverted").count(), 1);
    assert!(!output.contains("reverted to \"Router 1\""));
}

#[tokio::test(start_paused = true)]
async fn test_shell_quit_stops_immediately() {
    let output = run_shell(
        RuleBook::bundled(),
        "place Router\nclick Router-1\nquit\nplace Switch\n",
        false,
    )
    .await;

    assert!(!output.contains("Switch-1"));
    assert!(!output.contains("reverted"));
}

#[tokio::test(start_paused = true)]
async fn test_shell_sentinel_not_removed() {
    let output = run_shell(RuleBook::bundled(), "remove Internet-0\nshow\n", false).await;

    assert!(output.contains("Internet-0 not removed"));
    assert!(output.contains("Nodes (1):"));
}

#[tokio::test(start_paused = true)]
async fn test_shell_json_mode() {
    let output = run_shell(RuleBook::bundled(), "place Switch\nbogus\n", true).await;
    let lines: Vec<serde_json::Value> = output
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(lines[0]["placed"], "Switch-1");
    assert!(lines[1]["error"].is_string());
}

#[tokio::test(start_paused = true)]
async fn test_shell_json_mode_every_line_parses() {
    let output = run_shell(
        RuleBook::bundled(),
        "place Router\nremove Router-1\nmove Ghost-1 1 2\nunlink A-1 B-1\nclick Ghost-1\nremove Internet-0\nhelp\n",
        true,
    )
    .await;
    let lines: Vec<serde_json::Value> = output
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(lines.len(), 7);
    assert_eq!(lines[1]["removed"], "Router-1");
    assert_eq!(lines[1]["ok"], true);
    assert_eq!(lines[2]["error"], "no such node");
    assert_eq!(lines[2]["id"], "Ghost-1");
    assert_eq!(lines[3]["ok"], false);
    assert_eq!(lines[4]["id"], "Ghost-1");
    assert_eq!(lines[5]["removed"], "Internet-0");
    assert_eq!(lines[5]["ok"], false);
    assert!(lines[6]["help"].is_array());
}

#[tokio::test(start_paused = true)]
async fn test_shell_move_unknown_node() {
    let output = run_shell(
        RuleBook::bundled(),
        "place Router\nmove Router-1 5 6\nmove Ghost-1 1 2\n",
        false,
    )
    .await;

    assert!(output.contains("moved Router-1 to (5, 6)"));
    assert!(output.contains("no such node: Ghost-1"));
    assert!(!output.contains("moved Ghost-1"));
}
