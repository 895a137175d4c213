//! Savings goal model

use serde::{Deserialize, Serialize};

use super::money::Money;

/// A savings goal with target and current progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Unique identifier within the goals collection
    pub id: String,

    /// Display name
    pub name: String,

    /// Amount to reach
    pub target_amount: Money,

    /// Amount saved so far
    pub current_amount: Money,

    /// Optional free-form deadline label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}
