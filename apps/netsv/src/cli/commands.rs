//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::script::{ReplayReport, parse_script, replay};
use crate::shell::run_session;
use netsv_core::{DeviceType, RuleBook, SandboxConfig, SandboxError};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum configuration file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Maximum script file size (16 MB).
const MAX_SCRIPT_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), SandboxError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| SandboxError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(SandboxError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve a path to an existing regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, SandboxError> {
    let canonical = path.canonicalize().map_err(|e| {
        SandboxError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(SandboxError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Read a bounded text file.
fn read_text(path: &Path, max_size: u64) -> Result<String, SandboxError> {
    let path = validate_file_path(path)?;
    validate_file_size(&path, max_size)?;
    std::fs::read_to_string(&path)
        .map_err(|e| SandboxError::IoError(format!("Read '{}': {}", path.display(), e)))
}

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

fn parse_type(name: &str) -> Result<DeviceType, SandboxError> {
    name.parse()
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Parse a TOML configuration document.
pub fn parse_config(text: &str) -> Result<SandboxConfig, SandboxError> {
    toml::from_str(text).map_err(|e| SandboxError::InvalidConfig(e.to_string()))
}

/// Load the rule book from `path`, or the bundled tables if there is none.
///
/// A path that was given but cannot be read is an error.
pub fn load_rule_book(path: Option<&Path>) -> Result<RuleBook, SandboxError> {
    let Some(path) = path else {
        tracing::debug!("no configuration file, using bundled tables");
        return Ok(RuleBook::bundled());
    };

    let text = read_text(path, MAX_CONFIG_FILE_SIZE)?;
    let book = parse_config(&text)?.build()?;
    tracing::info!(
        path = %path.display(),
        rules = book.rules.len(),
        labels = book.labels.len(),
        "configuration loaded"
    );
    Ok(book)
}

// =============================================================================
// SUMMARY COMMAND
// =============================================================================

/// Summarize the loaded tables.
pub fn cmd_summary(
    book: &RuleBook,
    config: Option<&Path>,
    json_mode: bool,
) -> Result<(), SandboxError> {
    let source = config
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "bundled".to_string());

    if json_mode {
        print_json(&serde_json::json!({
            "config": source,
            "device_types": DeviceType::ALL.len(),
            "rules": book.rules.len(),
            "labels": book.labels.len(),
            "reveal_delay_ms": book.reveal_delay.as_millis() as u64,
            "placement": {
                "width": book.placement.width,
                "height": book.placement.height,
                "seed": book.placement.seed,
            },
            "sentinel_position": book.sentinel_position,
        }));
        return Ok(());
    }

    println!("NetworkSV Sandbox");
    println!("=================");
    println!("Config:       {}", source);
    println!();
    println!("Device types: {}", DeviceType::ALL.len());
    println!("Rules:        {} allowed directions", book.rules.len());
    println!("Labels:       {} entries", book.labels.len());
    println!("Reveal delay: {} ms", book.reveal_delay.as_millis());
    println!(
        "Placement:    {}x{}{}",
        book.placement.width,
        book.placement.height,
        book.placement
            .seed
            .map(|s| format!(" (seed {})", s))
            .unwrap_or_default()
    );
    println!();
    println!("Run `netsv devices` for the catalog or `netsv shell` to build.");

    Ok(())
}

// =============================================================================
// DEVICES COMMAND
// =============================================================================

/// List the device catalog.
pub fn cmd_devices(book: &RuleBook, json_mode: bool, verbose: bool) -> Result<(), SandboxError> {
    if json_mode {
        let devices: Vec<_> = book
            .catalog
            .iter()
            .map(|(t, info)| {
                serde_json::json!({
                    "type": t,
                    "description": info.description,
                    "icon": info.icon,
                    "targets": book.rules.targets(t).collect::<Vec<_>>(),
                })
            })
            .collect();
        print_json(&serde_json::Value::Array(devices));
        return Ok(());
    }

    for (device_type, info) in book.catalog.iter() {
        println!("{}", device_type);
        println!("  {}", info.description);
        if verbose {
            println!("  icon: {}", info.icon);
            let targets: Vec<String> = book.rules.targets(device_type).map(|t| t.to_string()).collect();
            println!("  connects to: {}", targets.join(", "));
        }
    }

    Ok(())
}

// =============================================================================
// RULES COMMAND
// =============================================================================

/// List compatibility rules, optionally for one source type.
pub fn cmd_rules(book: &RuleBook, json_mode: bool, from: Option<&str>) -> Result<(), SandboxError> {
    let sources: Vec<DeviceType> = match from {
        Some(name) => vec![parse_type(name)?],
        None => DeviceType::ALL.to_vec(),
    };

    if json_mode {
        let mut table = serde_json::Map::new();
        for source in &sources {
            let targets: Vec<_> = book.rules.targets(*source).collect();
            table.insert(source.to_string(), serde_json::json!(targets));
        }
        print_json(&serde_json::Value::Object(table));
        return Ok(());
    }

    for source in sources {
        let targets: Vec<String> = book.rules.targets(source).map(|t| t.to_string()).collect();
        if targets.is_empty() {
            println!("{:<13} -> (none)", source.name());
        } else {
            println!("{:<13} -> {}", source.name(), targets.join(", "));
        }
    }

    Ok(())
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Check one direction of the compatibility table.
pub fn cmd_check(
    book: &RuleBook,
    json_mode: bool,
    source: &str,
    target: &str,
) -> Result<(), SandboxError> {
    let source = parse_type(source)?;
    let target = parse_type(target)?;
    let allowed = book.rules.is_allowed(source, target);
    let reverse = book.rules.is_allowed(target, source);

    if json_mode {
        print_json(&serde_json::json!({
            "source": source,
            "target": target,
            "allowed": allowed,
            "reverse_allowed": reverse,
            "label": allowed.then(|| book.labels.resolve_label(source, target)),
        }));
        return Ok(());
    }

    if allowed {
        println!(
            "{} → {}: allowed ({})",
            source,
            target,
            book.labels.resolve_label(source, target)
        );
    } else {
        println!("{} → {}: not allowed", source, target);
        if reverse {
            println!("  hint: {} → {} is allowed", target, source);
        }
    }

    Ok(())
}

// =============================================================================
// LABEL COMMAND
// =============================================================================

/// Resolve the medium label for a pair of types.
pub fn cmd_label(book: &RuleBook, json_mode: bool, a: &str, b: &str) -> Result<(), SandboxError> {
    let a = parse_type(a)?;
    let b = parse_type(b)?;
    let label = book.labels.resolve_label(a, b);
    let from_table = book.labels.get(a, b).is_some() || book.labels.get(b, a).is_some();

    if json_mode {
        print_json(&serde_json::json!({
            "a": a,
            "b": b,
            "label": label,
            "fallback": !from_table,
        }));
        return Ok(());
    }

    if from_table {
        println!("{}", label);
    } else {
        println!("{} (fallback)", label);
    }

    Ok(())
}

// =============================================================================
// REPLAY COMMAND
// =============================================================================

/// Replay a gesture script and print the final canvas.
pub fn cmd_replay(
    book: RuleBook,
    json_mode: bool,
    verbose: bool,
    file: &Path,
    settle: bool,
) -> Result<(), SandboxError> {
    let text = read_text(file, MAX_SCRIPT_FILE_SIZE)?;
    let steps = parse_script(&text)?;
    let report = replay(book, steps, settle);

    if json_mode {
        let value = serde_json::to_value(&report)
            .map_err(|e| SandboxError::SerializationError(e.to_string()))?;
        print_json(&value);
        return Ok(());
    }

    print_report(&report, verbose);
    Ok(())
}

fn print_report(report: &ReplayReport, verbose: bool) {
    println!("Replay Complete");
    println!("===============");
    println!("Gestures:        {}", report.events);
    println!("Virtual time:    {} ms", report.waited_ms);
    println!("Reverts applied: {}", report.reverts_applied);
    println!("Reverts pending: {}", report.reverts_pending);
    println!();
    println!("Nodes: {}", report.metrics.node_count);
    for node in &report.render.nodes {
        if verbose {
            println!(
                "  {:<16} ({:>4}, {:>4})  {}",
                node.id.as_str(),
                node.position.x,
                node.position.y,
                node.label
            );
        } else {
            println!("  {:<16} {}", node.id.as_str(), node.label);
        }
    }
    println!("Links: {}", report.metrics.link_count);
    for edge in &report.render.edges {
        println!("  {} → {}  [{}]", edge.source, edge.target, edge.label);
    }
}

// =============================================================================
// SHELL COMMAND
// =============================================================================

/// Run the interactive shell on stdin/stdout.
pub async fn cmd_shell(book: RuleBook, json_mode: bool) -> Result<(), SandboxError> {
    if !json_mode {
        println!("NetworkSV shell. Type `help` for gestures, `quit` to leave.");
    }
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();
    run_session(book, input, &mut output, json_mode).await
}
