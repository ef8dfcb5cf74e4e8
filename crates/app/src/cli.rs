use std::path::PathBuf;

use clap::{Parser, Subcommand};

use engine::{Amount, ItemId};
use report::Format;

#[derive(Debug, Parser)]
#[command(name = "semester_budget", version, about = "Semester budget planner")]
pub struct Cli {
    /// Optional config file path (TOML).
    #[arg(long)]
    pub config: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the budget tree. Locked items are marked with `*`.
    Show,
    /// Lock items, then apply value, quantity and rate edits in that order.
    Apply {
        #[arg(long = "lock", value_name = "ITEM")]
        locks: Vec<ItemId>,
        #[arg(long = "set", value_name = "ITEM=VALUE", value_parser = parse_assignment)]
        values: Vec<(ItemId, f64)>,
        #[arg(long = "quantity", value_name = "ROLE=COUNT", value_parser = parse_assignment)]
        quantities: Vec<(ItemId, f64)>,
        #[arg(long = "rate", value_name = "ROLE=RATE", value_parser = parse_assignment)]
        rates: Vec<(ItemId, f64)>,
    },
    /// Run an edit script.
    Script { file: PathBuf },
    /// Write a report of the configured budget to stdout.
    Report {
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// List item keys and labels.
    Items,
}

/// Parses `ITEM=VALUE`, e.g. `food=$15,000`.
pub fn parse_assignment(input: &str) -> Result<(ItemId, f64), String> {
    let (item, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected ITEM=VALUE, got \"{input}\""))?;
    let item: ItemId = item.parse().map_err(|err| format!("{err}"))?;
    let value: Amount = value.parse().map_err(|err| format!("{err}"))?;
    Ok((item, value.value()))
}
