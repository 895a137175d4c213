//! Fixed (recurring) expense model

use serde::{Deserialize, Serialize};

use super::money::Money;

/// A recurring monthly obligation (rent, subscriptions, insurance)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedExpense {
    /// Unique identifier within the fixed-expenses collection
    pub id: String,

    /// Display name
    pub name: String,

    /// Amount due each cycle
    pub amount: Money,

    /// Free-form due date label (e.g. "1st", "2024-04-01")
    pub due_date: String,
}
