use chrono::NaiveDate;

use engine::{Amount, ItemId, Snapshot};

use crate::{Section, depth};

const LABEL_WIDTH: usize = 36;
const AMOUNT_WIDTH: usize = 14;

const INCOME: [ItemId; 5] = [
    ItemId::Reserves,
    ItemId::GrossTuition,
    ItemId::Scholarships,
    ItemId::NetTuition,
    ItemId::Fundraising,
];

pub(crate) fn render(snapshot: &Snapshot, generated_on: NaiveDate) -> String {
    let mut out = String::new();
    let totals = &snapshot.totals;

    line(&mut out, "SEMESTER BUDGET REPORT");
    line(&mut out, &format!("Generated on {}", generated_on.format("%B %-d, %Y")));
    line(&mut out, "");

    line(&mut out, "EXECUTIVE SUMMARY");
    row(&mut out, 1, "Total Budget", &Amount::new(snapshot.value(ItemId::Total)).to_string());
    row(&mut out, 1, "Total Income", &Amount::new(totals.income).to_string());
    row(&mut out, 1, "Total Expenses", &Amount::new(totals.expenses).to_string());
    row(&mut out, 1, "Balance", &Amount::new(totals.balance).to_string());
    row(
        &mut out,
        1,
        "Status",
        if totals.balanced { "balanced" } else { "unbalanced" },
    );
    line(&mut out, "");

    line(&mut out, "INCOME BREAKDOWN");
    for item in INCOME {
        let amount = Amount::new(snapshot.value(item)).to_string();
        let amount = if item == ItemId::Scholarships {
            format!("({amount})")
        } else {
            amount
        };
        item_row(&mut out, snapshot, item, 1, &amount);
    }
    line(&mut out, "");

    line(&mut out, "EXPENSE BREAKDOWN");
    for item in ItemId::ALL
        .into_iter()
        .filter(|item| Section::of(*item) == Section::Expenses)
    {
        let amount = Amount::new(snapshot.value(item)).to_string();
        let amount = match snapshot.role(item) {
            Some(detail) => format!(
                "{} × {}  {amount}",
                quantity(detail.quantity),
                Amount::new(detail.rate)
            ),
            None => amount,
        };
        item_row(&mut out, snapshot, item, depth(item), &amount);
    }
    line(&mut out, "");

    line(&mut out, "LOCKED ITEMS");
    let locked: Vec<ItemId> = ItemId::ALL
        .into_iter()
        .filter(|item| snapshot.is_locked(*item))
        .collect();
    if locked.is_empty() {
        line(&mut out, "  none");
    }
    for item in locked {
        line(&mut out, &format!("  {}", item.label()));
    }
    out
}

fn quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

fn row(out: &mut String, indent: usize, label: &str, amount: &str) {
    let pad = "  ".repeat(indent);
    let width = LABEL_WIDTH.saturating_sub(pad.len());
    line(
        out,
        &format!("{pad}{label:<width$}{amount:>w$}", w = AMOUNT_WIDTH),
    );
}

fn item_row(out: &mut String, snapshot: &Snapshot, item: ItemId, indent: usize, amount: &str) {
    let label = if snapshot.is_locked(item) {
        format!("{} [locked]", item.label())
    } else {
        item.label().to_string()
    };
    row(out, indent, &label, amount);
}
