//! # NetworkSV CLI Module
//!
//! This module implements the CLI interface for the sandbox.
//!
//! ## Available Commands
//!
//! - (none) - Summarize the loaded tables
//! - `devices` - List the device catalog
//! - `rules` - List compatibility rules
//! - `check` - Test whether one type may connect to another
//! - `label` - Resolve the medium label for a pair of types
//! - `replay` - Replay a JSON gesture script on a virtual clock
//! - `shell` - Interactive sandbox with real-time reveal timers

mod commands;

use clap::{Parser, Subcommand};
use netsv_core::SandboxError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// NetworkSV - network topology sandbox
///
/// Place devices, wire them together, and see which connections real
/// networks allow.
#[derive(Parser, Debug)]
#[command(name = "netsv")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file (bundled tables if omitted)
    #[arg(short, long, global = true, env = "NETSV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every device type with its description
    Devices,

    /// List compatibility rules
    Rules {
        /// Only show targets for this source type
        #[arg(short, long)]
        from: Option<String>,
    },

    /// Check whether SOURCE may connect to TARGET
    Check {
        /// Source device type (the end the drag starts from)
        source: String,

        /// Target device type
        target: String,
    },

    /// Resolve the medium label for a pair of device types
    Label {
        /// First device type
        a: String,

        /// Second device type
        b: String,
    },

    /// Replay a gesture script against a virtual clock
    Replay {
        /// Path to the JSON script
        #[arg(short, long)]
        file: PathBuf,

        /// Let every pending reveal expire before reporting
        #[arg(short, long)]
        settle: bool,
    },

    /// Start an interactive sandbox session on stdin
    Shell,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), SandboxError> {
    let json_mode = cli.json_mode;
    let book = load_rule_book(cli.config.as_deref())?;

    match cli.command {
        None => cmd_summary(&book, cli.config.as_deref(), json_mode),
        Some(Commands::Devices) => cmd_devices(&book, json_mode, cli.verbose),
        Some(Commands::Rules { from }) => cmd_rules(&book, json_mode, from.as_deref()),
        Some(Commands::Check { source, target }) => cmd_check(&book, json_mode, &source, &target),
        Some(Commands::Label { a, b }) => cmd_label(&book, json_mode, &a, &b),
        Some(Commands::Replay { file, settle }) => {
            cmd_replay(book, json_mode, cli.verbose, &file, settle)
        }
        Some(Commands::Shell) => cmd_shell(book, json_mode).await,
    }
}
