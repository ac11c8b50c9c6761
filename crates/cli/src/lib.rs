//! CLI tool for routing keys onto cells.
//!
//! Provides commands for:
//! - Looking up the cell for keys, request paths and queued messages
//! - Inspecting key distribution and keyspace ownership

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
