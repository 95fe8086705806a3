//! Budget and summary display formatting

use super::DisplayOptions;
use crate::models::{BudgetGate, CostCenterSet, Month};
use crate::services::MonthMetrics;

/// Format the budget state of a month
pub fn format_budget(month: Month, gate: BudgetGate, options: &DisplayOptions) -> String {
    match gate {
        BudgetGate::Unset => format!(
            "No budget set for {}.\nRun 'gastos budget set <AMOUNT> --month {}' to open expense entry.\n",
            month.long_name(),
            month
        ),
        BudgetGate::Closed => format!(
            "Budget for {}: {} (expense entry closed)\n",
            month.long_name(),
            options.money(gate.amount())
        ),
        BudgetGate::Open(amount) => {
            format!("Budget for {}: {}\n", month.long_name(), options.money(amount))
        }
    }
}

/// Format the month summary
pub fn format_summary(metrics: &MonthMetrics, options: &DisplayOptions) -> String {
    let mut output = String::new();

    output.push_str(&format!("Summary for {}\n", metrics.month.long_name()));
    output.push_str(&"=".repeat(40));
    output.push('\n');
    output.push_str(&format!("Expenses:   {}\n", metrics.count));
    output.push_str(&format!("Total:      {}\n", options.money(metrics.total)));

    match metrics.gate {
        BudgetGate::Unset => output.push_str("Budget:     (not set)\n"),
        BudgetGate::Closed => output.push_str("Budget:     closed\n"),
        BudgetGate::Open(amount) => {
            output.push_str(&format!("Budget:     {}\n", options.money(amount)));
            output.push_str(&format!(
                "Remaining:  {}{}\n",
                options.money(metrics.remaining()),
                if metrics.is_over_budget() {
                    "  (over budget)"
                } else {
                    ""
                }
            ));
            if let Some(pct) = metrics.percent_used() {
                output.push_str(&format!("Used:       {:.1}%\n", pct));
            }
        }
    }

    if !metrics.by_cost_center.is_empty() {
        output.push_str("\nBy cost center:\n");
        let width = metrics
            .by_cost_center
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);
        for (label, total) in &metrics.by_cost_center {
            output.push_str(&format!(
                "  {:<width$}  {:>14}\n",
                label,
                options.money(*total),
                width = width
            ));
        }
    }

    output
}

/// Format the known cost centers, one per line
pub fn format_cost_centers(set: &CostCenterSet) -> String {
    if set.is_empty() {
        return "No cost centers.\n".to_string();
    }
    let mut output = String::new();
    for label in set.iter() {
        output.push_str(label);
        output.push('\n');
    }
    output
}
