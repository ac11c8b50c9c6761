//! Command-line configuration.
//!
//! Flags override the JSON config file, which overrides built-in defaults.

use crate::commands::Command;
use anyhow::Context;
use clap::{ArgAction, Parser};
use corelib::NodeName;
use routing::{CellDirectory, Dispatcher, RouterConfig};
use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::Level;

#[derive(Debug, Parser)]
#[command(name = "cellring", version, about = "Route keys onto cells with a consistent hash ring")]
pub struct CliConfig {
    /// JSON router config file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Virtual nodes per cell
    #[arg(long, global = true)]
    pub vnodes: Option<NonZeroUsize>,

    /// Cell and its target; repeat for each cell. Replaces configured cells.
    #[arg(long = "cell", global = true, value_name = "NAME=TARGET", value_parser = parse_cell)]
    pub cells: Vec<(NodeName, String)>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

fn parse_cell(arg: &str) -> Result<(NodeName, String), String> {
    let (name, target) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=TARGET, got {:?}", arg))?;
    let name = NodeName::new(name).map_err(|e| e.to_string())?;
    Ok((name, target.to_string()))
}

impl CliConfig {
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Install the stderr log subscriber. Safe to call more than once.
    pub fn init_tracing(&self) {
        let _ = tracing_subscriber::fmt()
            .with_max_level(self.log_level())
            .with_writer(io::stderr)
            .try_init();
    }

    /// Router config after applying the file and flag overrides.
    pub fn router_config(&self) -> anyhow::Result<RouterConfig> {
        let mut config = match &self.config {
            Some(path) => RouterConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => RouterConfig::default(),
        };
        if let Some(vnodes) = self.vnodes {
            config.ring.virtual_nodes = vnodes;
        }
        if !self.cells.is_empty() {
            config.cells = self.cells.iter().cloned().collect::<CellDirectory>();
        }
        Ok(config)
    }

    pub fn run(self) -> anyhow::Result<()> {
        let dispatcher =
            Dispatcher::new(self.router_config()?).context("building the ring")?;
        let result = self
            .command
            .execute(&dispatcher, &mut io::stdin().lock())?;
        print!("{}", result);
        Ok(())
    }
}
