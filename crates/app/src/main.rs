use std::io::{self, Write};

use clap::Parser;

use engine::{Amount, Edit, EngineError, ItemId, Observer, Planner, Snapshot};

use crate::{
    cli::{Cli, Command},
    error::Result,
    settings::Settings,
};

mod cli;
mod error;
mod script;
mod settings;
mod view;

/// Logs every accepted and rejected edit.
struct ChangeLog;

impl Observer for ChangeLog {
    fn on_change(&mut self, snapshot: &Snapshot) {
        tracing::debug!(
            total = %Amount::new(snapshot.value(ItemId::Total)),
            balance = %Amount::new(snapshot.totals.balance),
            "budget updated"
        );
    }

    fn on_rejected(&mut self, edit: &Edit, error: &EngineError) {
        tracing::debug!(?edit, "rejected: {error}");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "semester_budget={level},engine={level},report={level}",
            level = settings.app.level
        ))
        .with_writer(io::stderr)
        .init();

    let mut planner = Planner::builder()
        .config(settings.budget)
        .observer(Box::new(ChangeLog))
        .build()?;
    tracing::info!("budget loaded");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Show => write!(out, "{}", view::tree(&planner.snapshot()))?,
        Command::Apply {
            locks,
            values,
            quantities,
            rates,
        } => {
            for item in locks {
                planner.set_lock(item, true);
            }
            let edits = values
                .into_iter()
                .map(|(item, value)| Edit::Value { item, value })
                .chain(
                    quantities
                        .into_iter()
                        .map(|(role, quantity)| Edit::Quantity { role, quantity }),
                )
                .chain(
                    rates
                        .into_iter()
                        .map(|(role, rate)| Edit::Rate { role, rate }),
                );
            for edit in edits {
                if let Err(err) = planner.apply_edit(edit) {
                    writeln!(out, "{} rejected\n{}\n", edit.item(), err.remediation())?;
                }
            }
            write!(out, "{}", view::tree(&planner.snapshot()))?;
        }
        Command::Script { file } => {
            let text = std::fs::read_to_string(&file)?;
            tracing::info!("running script {}", file.display());
            script::run(&mut planner, &text, &mut out)?;
        }
        Command::Report { format } => {
            let today = chrono::Local::now().date_naive();
            let text = report::render(&planner.snapshot(), format, today)?;
            writeln!(out, "{text}")?;
        }
        Command::Items => {
            for item in ItemId::ALL {
                writeln!(out, "{:<28}{}", item.as_str(), item.label())?;
            }
        }
    }

    Ok(())
}
