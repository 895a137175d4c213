//! Schema validation for the aggregate document
//!
//! Pure, side-effect free. Two entry points: `validate` for already-typed
//! aggregates (the save path) and `validate_value` for loosely-typed JSON
//! (the read/migration path, where serde does the shape checking — integer
//! cents, strict dates, enum-with-fallback account types — before the
//! structural rules here run).
//!
//! The rules are deliberately limited to structure: id presence and
//! per-collection uniqueness, a non-empty currency on every Money, and
//! transaction dates representable at the stored millisecond precision.
//! Display names may be empty; migration output stays loadable.

use std::collections::HashSet;
use std::fmt;

use crate::models::date::is_millis_precision;
use crate::models::{AppData, Money};

/// A single structural problem found by the validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// JSON-ish path to the offending field (e.g. `accounts[2].id`)
    pub path: String,

    /// What is wrong with it
    pub message: String,
}

impl ValidationIssue {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Validate a typed aggregate
///
/// Returns every issue found, not just the first.
pub fn validate(data: &AppData) -> Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    check_ids(
        "accounts",
        data.accounts.iter().map(|a| a.id.as_str()),
        &mut issues,
    );
    check_ids(
        "transactions",
        data.transactions.iter().map(|t| t.id.as_str()),
        &mut issues,
    );
    check_ids(
        "categories",
        data.categories.iter().map(|c| c.id.as_str()),
        &mut issues,
    );
    check_ids(
        "fixedExpenses",
        data.fixed_expenses.iter().map(|f| f.id.as_str()),
        &mut issues,
    );
    check_ids(
        "goals",
        data.goals.iter().map(|g| g.id.as_str()),
        &mut issues,
    );

    for (i, account) in data.accounts.iter().enumerate() {
        if account.currency.is_empty() {
            issues.push(ValidationIssue::new(
                format!("accounts[{}].currency", i),
                "currency must not be empty",
            ));
        }
    }
    for (i, tx) in data.transactions.iter().enumerate() {
        check_money(&format!("transactions[{}].amount", i), &tx.amount, &mut issues);
        if !is_millis_precision(&tx.date) {
            issues.push(ValidationIssue::new(
                format!("transactions[{}].date", i),
                "sub-millisecond precision cannot round-trip through storage",
            ));
        }
    }
    for (i, fx) in data.fixed_expenses.iter().enumerate() {
        check_money(
            &format!("fixedExpenses[{}].amount", i),
            &fx.amount,
            &mut issues,
        );
    }
    for (i, goal) in data.goals.iter().enumerate() {
        check_money(
            &format!("goals[{}].targetAmount", i),
            &goal.target_amount,
            &mut issues,
        );
        check_money(
            &format!("goals[{}].currentAmount", i),
            &goal.current_amount,
            &mut issues,
        );
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Validate a loosely-typed JSON value and produce the typed aggregate
///
/// Shape errors (wrong types, float cents, malformed dates, missing fields)
/// surface as a single issue from serde; structural rules then run on the
/// parsed result.
pub fn validate_value(value: &serde_json::Value) -> Result<AppData, Vec<ValidationIssue>> {
    let data: AppData = serde_json::from_value(value.clone())
        .map_err(|e| vec![ValidationIssue::new("$", e.to_string())])?;

    validate(&data)?;
    Ok(data)
}

fn check_ids<'a>(
    collection: &str,
    ids: impl Iterator<Item = &'a str>,
    issues: &mut Vec<ValidationIssue>,
) {
    let mut seen = HashSet::new();
    for (i, id) in ids.enumerate() {
        if id.is_empty() {
            issues.push(ValidationIssue::new(
                format!("{}[{}].id", collection, i),
                "id must not be empty",
            ));
        } else if !seen.insert(id) {
            issues.push(ValidationIssue::new(
                format!("{}[{}].id", collection, i),
                format!("duplicate id {:?}", id),
            ));
        }
    }
}

fn check_money(path: &str, money: &Money, issues: &mut Vec<ValidationIssue>) {
    if money.currency.is_empty() {
        issues.push(ValidationIssue::new(
            format!("{}.currency", path),
            "currency must not be empty",
        ));
    }
}
