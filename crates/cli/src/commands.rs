//! CLI subcommands.

use anyhow::Context;
use clap::Subcommand;
use corelib::{NodeName, RingTopology};
use routing::{Dispatcher, Route};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the cell for each key
    Lookup {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Print the cell and target for a gateway request path
    Route { path: String },
    /// Read a notification body from stdin and print the message to forward
    Enrich,
    /// Hash sample keys and report how many land on each cell
    Distribution {
        /// Number of sample keys
        #[arg(long, default_value_t = 1000)]
        keys: usize,
        /// Sample keys are `<prefix><n>`
        #[arg(long, default_value = "key")]
        prefix: String,
    },
    /// Print each cell's share of the keyspace
    Ownership,
}

/// Output of a command, rendered with `Display`.
#[derive(Debug)]
pub enum CommandResult {
    Lookups(Vec<(String, Option<NodeName>)>),
    Route(Option<Route>),
    Forward(Option<String>),
    Distribution {
        total: usize,
        counts: BTreeMap<NodeName, usize>,
    },
    Ownership(RingTopology),
}

impl Command {
    pub fn execute(&self, dispatcher: &Dispatcher, input: &mut dyn Read) -> anyhow::Result<CommandResult> {
        match self {
            Command::Lookup { keys } => {
                let ring = dispatcher.ring();
                let lookups = keys
                    .iter()
                    .map(|key| {
                        let cell = ring
                            .lookup(key)
                            .with_context(|| format!("looking up {:?}", key))?;
                        Ok((key.clone(), cell))
                    })
                    .collect::<anyhow::Result<Vec<_>>>()?;
                Ok(CommandResult::Lookups(lookups))
            }
            Command::Route { path } => {
                let route = dispatcher
                    .route_path(path)
                    .with_context(|| format!("routing {}", path))?;
                Ok(CommandResult::Route(route))
            }
            Command::Enrich => {
                let mut body = String::new();
                input
                    .read_to_string(&mut body)
                    .context("reading notification from stdin")?;
                let forward = dispatcher.enrich(&body).context("enriching notification")?;
                let json = forward
                    .map(|forward| serde_json::to_string_pretty(&forward))
                    .transpose()?;
                Ok(CommandResult::Forward(json))
            }
            Command::Distribution { keys, prefix } => {
                let counts = dispatcher
                    .ring()
                    .read(|ring| ring.distribution((0..*keys).map(|i| format!("{}{}", prefix, i))));
                Ok(CommandResult::Distribution {
                    total: *keys,
                    counts,
                })
            }
            Command::Ownership => Ok(CommandResult::Ownership(
                dispatcher.ring().read(RingTopology::from_ring),
            )),
        }
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Lookups(lookups) => {
                for (key, cell) in lookups {
                    match cell {
                        Some(cell) => writeln!(f, "{}\t{}", key, cell)?,
                        None => writeln!(f, "{}\t-", key)?,
                    }
                }
                Ok(())
            }
            CommandResult::Route(Some(route)) => writeln!(f, "{}\t{}", route.cell, route.target),
            CommandResult::Route(None) | CommandResult::Forward(None) => {
                writeln!(f, "no cells registered")
            }
            CommandResult::Forward(Some(json)) => writeln!(f, "{}", json),
            CommandResult::Distribution { total, counts } => {
                let mean = *total as f64 / counts.len().max(1) as f64;
                for (cell, count) in counts {
                    let deviation = if mean > 0.0 {
                        (*count as f64 - mean) / mean * 100.0
                    } else {
                        0.0
                    };
                    writeln!(f, "{}\t{}\t{:+.1}%", cell, count, deviation)?;
                }
                Ok(())
            }
            CommandResult::Ownership(topology) => {
                for (cell, ownership) in topology.iter() {
                    writeln!(
                        f,
                        "{}\t{:.2}%\t{} arcs",
                        cell,
                        ownership.share * 100.0,
                        ownership.arcs
                    )?;
                }
                if let Some(spread) = topology.spread() {
                    writeln!(f, "spread\t{:.3}", spread)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routing::RouterConfig;
    use std::io;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(RouterConfig::default()).unwrap()
    }

    fn run(command: Command, stdin: &str) -> anyhow::Result<String> {
        let result = command.execute(&dispatcher(), &mut stdin.as_bytes())?;
        Ok(result.to_string())
    }

    #[test]
    fn test_lookup_prints_each_key() {
        let out = run(
            Command::Lookup {
                keys: vec!["rider:0001".into(), "rider:1000".into()],
            },
            "",
        )
        .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("rider:0001\tcell"));
        assert!(lines[1].starts_with("rider:1000\tcell"));
    }

    #[test]
    fn test_lookup_empty_key_fails() {
        let err = run(Command::Lookup { keys: vec![String::new()] }, "").unwrap_err();
        assert!(err.to_string().contains("looking up"));
    }

    #[test]
    fn test_route_prints_target() {
        let out = run(Command::Route { path: "/api/42/orders/1".into() }, "").unwrap();
        assert!(out.contains("http://localhost:300"));
    }

    #[test]
    fn test_enrich_reads_stdin() {
        let body = r#"{"Message": "hi", "MessageAttributes": {"RIDER_ID": {"Type": "String", "Value": "rider:0001"}}}"#;
        let out = run(Command::Enrich, body).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["Message"], "hi");
        assert!(json["MessageAttributes"]["CELL_ID"]["StringValue"]
            .as_str()
            .unwrap()
            .starts_with("cell"));
    }

    #[test]
    fn test_enrich_rejects_garbage() {
        assert!(run(Command::Enrich, "garbage").is_err());
    }

    #[test]
    fn test_distribution_and_ownership() {
        let out = run(
            Command::Distribution {
                keys: 1000,
                prefix: "key".into(),
            },
            "",
        )
        .unwrap();
        assert_eq!(out.lines().count(), 2);
        let total: usize = out
            .lines()
            .map(|line| line.split('\t').nth(1).unwrap().parse::<usize>().unwrap())
            .sum();
        assert_eq!(total, 1000);

        let out = run(Command::Ownership, "").unwrap();
        assert!(out.contains("cell1\t"));
        assert!(out.contains("spread\t"));
    }

    #[test]
    fn test_empty_ring_output() {
        let config = RouterConfig {
            cells: routing::CellDirectory::new(),
            ..RouterConfig::default()
        };
        let dispatcher = Dispatcher::new(config).unwrap();
        let result = Command::Route { path: "/api/1".into() }
            .execute(&dispatcher, &mut io::empty())
            .unwrap();
        assert_eq!(result.to_string(), "no cells registered\n");
    }
}
