//! Budget reports.
//!
//! Renders a [`Snapshot`] as plain text for people, CSV for spreadsheets or
//! JSON for other tools.

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use engine::{GroupId, ItemId, Snapshot, hierarchy};

pub use error::ReportError;

mod error;
mod rows;
mod text;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Text,
    Csv,
    Json,
}

/// Branch of the budget an item belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Total,
    Income,
    Expenses,
}

impl Section {
    #[must_use]
    pub fn of(item: ItemId) -> Section {
        let mut current = item;
        while let Some(group) = hierarchy::parent_group(current) {
            match group.id {
                GroupId::Income => return Section::Income,
                GroupId::Expenses => return Section::Expenses,
                _ => current = group.parent,
            }
        }
        Section::Total
    }
}

/// Number of aggregates above `item`.
#[must_use]
pub fn depth(item: ItemId) -> usize {
    let mut depth = 0;
    let mut current = item;
    while let Some(group) = hierarchy::parent_group(current) {
        depth += 1;
        current = group.parent;
    }
    depth
}

pub fn render(
    snapshot: &Snapshot,
    format: Format,
    generated_on: NaiveDate,
) -> Result<String, ReportError> {
    match format {
        Format::Text => Ok(text::render(snapshot, generated_on)),
        Format::Csv => rows::render(snapshot),
        Format::Json => Ok(serde_json::to_string_pretty(snapshot)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{BudgetConfig, BudgetState};

    fn snapshot() -> Snapshot {
        BudgetState::from_config(&BudgetConfig::default())
            .unwrap()
            .snapshot()
    }

    #[test]
    fn sections_follow_the_hierarchy() {
        assert_eq!(Section::of(ItemId::Total), Section::Total);
        assert_eq!(Section::of(ItemId::Scholarships), Section::Income);
        assert_eq!(Section::of(ItemId::HeadCook), Section::Expenses);
        assert_eq!(Section::of(ItemId::FixedCosts), Section::Expenses);
    }

    #[test]
    fn depth_counts_ancestors() {
        assert_eq!(depth(ItemId::Total), 0);
        assert_eq!(depth(ItemId::Reserves), 1);
        assert_eq!(depth(ItemId::GrossTuition), 2);
        assert_eq!(depth(ItemId::Ras), 4);
    }

    #[test]
    fn json_report_round_trips_the_snapshot() {
        let snapshot = snapshot();
        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let json = render(&snapshot, Format::Json, date).unwrap();
        let parsed: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn format_parses_from_cli() {
        assert_eq!(Format::from_str("csv", true), Ok(Format::Csv));
        assert!(Format::from_str("pdf", true).is_err());
    }
}
