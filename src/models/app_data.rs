//! The aggregate document
//!
//! `AppData` is the single top-level document holding every domain
//! collection. Instances are only ever replaced wholesale, never partially
//! mutated in place: the domain store applies a pure updater and swaps the
//! whole value.

use serde::{Deserialize, Serialize};

use super::account::Account;
use super::category::Category;
use super::fixed_expense::FixedExpense;
use super::goal::Goal;
use super::transaction::Transaction;

/// Current schema version of the aggregate document
pub const SCHEMA_VERSION: u32 = 1;

/// The aggregate of all domain collections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    /// Schema generation this document was written with
    pub schema_version: u32,

    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    pub fixed_expenses: Vec<FixedExpense>,
    pub goals: Vec<Goal>,
}

impl AppData {
    /// An empty aggregate at the current schema version
    pub fn empty() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            accounts: Vec::new(),
            transactions: Vec::new(),
            categories: Vec::new(),
            fixed_expenses: Vec::new(),
            goals: Vec::new(),
        }
    }

    /// Total record count across all collections
    pub fn record_count(&self) -> usize {
        self.accounts.len()
            + self.transactions.len()
            + self.categories.len()
            + self.fixed_expenses.len()
            + self.goals.len()
    }

    /// Whether every collection is empty
    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}

impl Default for AppData {
    fn default() -> Self {
        Self::empty()
    }
}
