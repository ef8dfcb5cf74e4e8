use engine::{Amount, ItemId, Snapshot};

/// The whole budget as an indented tree, one item per line. Locked items are
/// marked with `*`.
pub(crate) fn tree(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    for item in ItemId::ALL {
        let marker = if snapshot.is_locked(item) { '*' } else { ' ' };
        let pad = "  ".repeat(report::depth(item));
        let label = format!("{pad}{}", item.label());
        let detail = snapshot
            .role(item)
            .map(|d| format!("  ({} × {})", d.quantity, Amount::new(d.rate)))
            .unwrap_or_default();
        out.push_str(&format!(
            "{marker} {label:<40}{:>12}{detail}\n",
            Amount::new(snapshot.value(item)).to_string()
        ));
    }
    let totals = &snapshot.totals;
    out.push_str(&format!(
        "\nbalance {} ({})\n",
        Amount::new(totals.balance),
        if totals.balanced { "balanced" } else { "unbalanced" }
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{BudgetConfig, BudgetState};

    #[test]
    fn tree_marks_locks_and_roles() {
        let snapshot = BudgetState::from_config(&BudgetConfig::default())
            .unwrap()
            .snapshot();
        let tree = tree(&snapshot);
        let lines: Vec<&str> = tree.lines().collect();

        assert!(lines[0].starts_with("  Total Budget"));
        assert!(lines[0].ends_with("$300,000"));
        assert!(lines[1].starts_with("*   Reserves"));
        assert!(tree.contains("(2 × $5,000)"));
        assert!(tree.ends_with("balance $0 (balanced)\n"));
    }
}
