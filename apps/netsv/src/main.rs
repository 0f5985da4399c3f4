//! # NetworkSV - Network Topology Sandbox
//!
//! The main binary for the NetworkSV sandbox.
//!
//! This application provides:
//! - CLI commands over the device catalog and rule tables
//! - Replay of recorded gesture scripts
//! - An interactive shell with real-time reveal timers
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 apps/netsv (THE BINARY)              │
//! │                                                      │
//! │  ┌─────────────┐   ┌─────────────┐   ┌───────────┐   │
//! │  │   CLI       │   │   Replay    │   │   Shell   │   │
//! │  │  (clap)     │   │ (virtual)   │   │  (tokio)  │   │
//! │  └──────┬──────┘   └──────┬──────┘   └─────┬─────┘   │
//! │         └─────────────────┼────────────────┘         │
//! │                           ▼                          │
//! │                   ┌───────────────┐                  │
//! │                   │  netsv-core   │                  │
//! │                   │  (THE RULES)  │                  │
//! │                   └───────────────┘                  │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! netsv check Modem Internet
//! netsv rules --from Router
//! netsv replay -f session.json --settle
//! netsv --config sandbox.toml shell
//! ```

use clap::Parser;
use netsv::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing: NETSV_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("NETSV_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "netsv=info,netsv_core=info".into());

    // Logs go to stderr so the shell and --json-mode keep stdout clean.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the NetworkSV startup banner.
fn print_banner() {
    println!(
        r#"
  ┌─┐   ┌─┐   ┌─┐
  │N├───┤S├───┤V│   NetworkSV Sandbox v{}
  └─┘   └─┘   └─┘

  Place • Connect • Learn
"#,
        env!("CARGO_PKG_VERSION")
    );
}
