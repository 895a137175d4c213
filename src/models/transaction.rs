//! Transaction model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::date::iso_millis;
use super::money::Money;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

impl TransactionType {
    /// Best-effort coercion from a loosely-typed legacy value
    ///
    /// Case-insensitive match; anything unrecognized defaults to Expense.
    pub fn coerce(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("income") => Self::Income,
            _ => Self::Expense,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

/// A single income or expense entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier within the transactions collection
    pub id: String,

    /// The account this transaction belongs to
    pub account_id: String,

    /// Income or Expense
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Amount in minor units with explicit currency
    pub amount: Money,

    /// Category name or id this transaction is filed under
    pub category: String,

    /// When the transaction happened (UTC, millisecond precision)
    #[serde(with = "iso_millis")]
    pub date: DateTime<Utc>,

    /// Free-form note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Transaction {
        Transaction {
            id: "t1".into(),
            account_id: "a1".into(),
            transaction_type: TransactionType::Expense,
            amount: Money::new(1250, "USD"),
            category: "Groceries".into(),
            date: Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap(),
            note: None,
        }
    }

    #[test]
    fn test_coerce_type() {
        assert_eq!(TransactionType::coerce(Some("Income")), TransactionType::Income);
        assert_eq!(TransactionType::coerce(Some("income")), TransactionType::Income);
        assert_eq!(TransactionType::coerce(Some("Expense")), TransactionType::Expense);
        assert_eq!(TransactionType::coerce(Some("transfer")), TransactionType::Expense);
        assert_eq!(TransactionType::coerce(None), TransactionType::Expense);
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains(r#""accountId":"a1""#));
        assert!(json.contains(r#""type":"Expense""#));
        assert!(json.contains(r#""date":"2024-03-15T09:30:00.000Z""#));
        assert!(!json.contains("note"));

        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_loose_date_rejected() {
        let json = r#"{"id":"t1","accountId":"a1","type":"Expense",
            "amount":{"cents":100,"currency":"USD"},"category":"Misc",
            "date":"2024-03-15"}"#;
        assert!(serde_json::from_str::<Transaction>(json).is_err());
    }
}
