//! # netsv
//!
//! Command-line front end for the NetworkSV sandbox.
//!
//! - `cli`: clap commands over the rule tables
//! - `script`: JSON gesture scripts replayed on a virtual clock
//! - `shell`: interactive gestures with real-time reveal timers

pub mod cli;
pub mod script;
pub mod shell;
