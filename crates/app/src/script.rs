//! Line based edit scripts.
//!
//! ```text
//! # comments and blank lines are ignored
//! lock variable_costs
//! set staff_salaries $195,000
//! quantity head_cook 2
//! rate ras 5500
//! unlock variable_costs
//! show
//! ```

use std::io::Write;

use engine::{Amount, EngineError, ItemId, Planner};

use crate::{
    error::{AppError, Result},
    view,
};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Step {
    Set(ItemId, f64),
    Quantity(ItemId, f64),
    Rate(ItemId, f64),
    Lock(ItemId),
    Unlock(ItemId),
    Reset,
    Show,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command \"{0}\"")]
    UnknownCommand(String),
    #[error("\"{0}\" expects {1}")]
    Arity(&'static str, &'static str),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Parses one script line; `None` for blank lines and comments.
pub(crate) fn parse_line(input: &str) -> std::result::Result<Option<Step>, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let mut parts = trimmed.split_whitespace();
    let command = parts.next().unwrap_or_default().to_ascii_lowercase();
    let item = parts.next();
    let rest: Vec<&str> = parts.collect();
    let value = (!rest.is_empty()).then(|| rest.join(" "));

    let step = match (command.as_str(), item, value.as_deref()) {
        ("show", None, None) => Step::Show,
        ("reset", None, None) => Step::Reset,
        ("lock", Some(item), None) => Step::Lock(item.parse()?),
        ("unlock", Some(item), None) => Step::Unlock(item.parse()?),
        ("set", Some(item), Some(value)) => {
            Step::Set(item.parse()?, value.parse::<Amount>()?.value())
        }
        ("quantity", Some(role), Some(value)) => {
            Step::Quantity(role.parse()?, value.parse::<Amount>()?.value())
        }
        ("rate", Some(role), Some(value)) => {
            Step::Rate(role.parse()?, value.parse::<Amount>()?.value())
        }
        ("show", ..) => return Err(ParseError::Arity("show", "no arguments")),
        ("reset", ..) => return Err(ParseError::Arity("reset", "no arguments")),
        ("lock", ..) => return Err(ParseError::Arity("lock", "an item")),
        ("unlock", ..) => return Err(ParseError::Arity("unlock", "an item")),
        ("set", ..) => return Err(ParseError::Arity("set", "an item and a value")),
        ("quantity", ..) => return Err(ParseError::Arity("quantity", "a role and a head count")),
        ("rate", ..) => return Err(ParseError::Arity("rate", "a role and a rate")),
        _ => return Err(ParseError::UnknownCommand(command)),
    };
    Ok(Some(step))
}

/// Runs `text` against `planner`, writing rejections and `show` output to
/// `out`. Malformed lines abort the script; rejected edits do not.
pub(crate) fn run(planner: &mut Planner, text: &str, out: &mut impl Write) -> Result<()> {
    for (index, input) in text.lines().enumerate() {
        let line = index + 1;
        let step = parse_line(input).map_err(|source| AppError::Script { line, source })?;
        let Some(step) = step else {
            continue;
        };
        let outcome = match step {
            Step::Set(item, value) => planner.apply(item, value),
            Step::Quantity(role, quantity) => planner.set_quantity(role, quantity),
            Step::Rate(role, rate) => planner.set_rate(role, rate),
            Step::Lock(item) => {
                planner.set_lock(item, true);
                Ok(())
            }
            Step::Unlock(item) => {
                planner.set_lock(item, false);
                Ok(())
            }
            Step::Reset => planner.reset(),
            Step::Show => {
                write!(out, "{}", view::tree(&planner.snapshot()))?;
                Ok(())
            }
        };
        if let Err(err) = outcome {
            writeln!(out, "line {line}: rejected\n{}\n", err.remediation())?;
        }
    }
    Ok(())
}
