//! Derivation of template parameters from an event context.
//!
//! Kept as a pure function keyed by kind so the full kind → parameter mapping
//! is auditable and testable in one place. A missing context field simply
//! omits the parameter; the template's placeholder is then left as-is by the
//! substitution step.

use std::collections::BTreeMap;

use herald_common::types::{NotificationContext, NotificationKind};

/// Render a money value with two decimal places and thousands separators.
pub fn format_money(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}.{:02}", if negative { "-" } else { "" }, grouped, frac)
}

/// Render a percentage with one decimal place, including the `%` sign.
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Project the context into the flat parameter map for a given kind.
pub fn derive_params(
    kind: NotificationKind,
    context: &NotificationContext,
) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();

    let mut put = |key: &str, value: Option<String>| {
        if let Some(v) = value {
            params.insert(key.to_string(), v);
        }
    };

    put("actor_name", context.actor_name.clone());
    put("project_id", context.project_id.map(|id| id.to_string()));
    put("project_name", context.project_name.clone());
    put(
        "transaction_id",
        context.transaction_id.map(|id| id.to_string()),
    );
    put("transaction_name", context.transaction_name.clone());
    put("details", context.details.clone());
    put("message", context.system_message.clone());
    put("before_spent", context.before_spent.map(format_money));
    put("after_spent", context.after_spent.map(format_money));
    put("budget_limit", context.budget_limit.map(format_money));

    match kind {
        NotificationKind::TransactionAdded
        | NotificationKind::TransactionUpdated
        | NotificationKind::TransactionRemoved => {
            if let (Some(before), Some(after), Some(limit)) = (
                context.before_spent,
                context.after_spent,
                context.budget_limit,
            ) && limit > 0.0
            {
                let change = format!(
                    "{} ({}) → {} ({})",
                    format_money(before),
                    format_percent(before / limit * 100.0),
                    format_money(after),
                    format_percent(after / limit * 100.0),
                );
                params.insert("spend_change".to_string(), change);
            }
        }
        NotificationKind::BudgetThreshold => {
            if let (Some(spent), Some(limit)) = (context.after_spent, context.budget_limit)
                && limit > 0.0
            {
                params.insert(
                    "percent_used".to_string(),
                    format_percent(spent / limit * 100.0),
                );
            }
        }
        _ => {}
    }

    params
}
