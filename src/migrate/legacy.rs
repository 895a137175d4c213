//! Legacy flat-collection records and their coercion into the aggregate
//!
//! Before the aggregate document existed, each collection lived under its
//! own storage key as a JSON array of loosely-typed records. These shapes
//! capture every variation the old writers produced; coercion turns each
//! record into a canonical one, accumulating issues instead of failing.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use crate::models::date::{parse_iso_millis, truncate_to_millis};
use crate::models::{
    Account, AccountType, Category, FixedExpense, Goal, Money, Transaction, TransactionType,
};

/// Fallback currency for legacy amounts that never carried one
pub const FALLBACK_CURRENCY: &str = "USD";

/// A non-fatal problem encountered while coercing a legacy record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercionIssue {
    /// Which legacy collection the record came from
    pub collection: &'static str,

    /// Position of the record in the legacy array
    pub index: usize,

    /// The field that needed repair
    pub field: &'static str,

    /// What was done about it
    pub detail: String,
}

impl CoercionIssue {
    fn new(
        collection: &'static str,
        index: usize,
        field: &'static str,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            collection,
            index,
            field,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for CoercionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}].{}: {}",
            self.collection, self.index, self.field, self.detail
        )
    }
}

/// A legacy amount in any of the shapes old writers produced
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    /// Already-canonical minor units, possibly missing the currency
    Cents { cents: i64, currency: Option<String> },
    /// Major-unit number
    Number(f64),
    /// Locale-formatted string
    Text(String),
    /// Anything else; normalizes to zero
    Other(serde_json::Value),
}

impl RawAmount {
    /// Normalize into canonical Money with a fallback currency
    fn to_money(&self, fallback: &str) -> Money {
        match self {
            Self::Cents { cents, currency } => Money::new(
                *cents,
                currency.clone().filter(|c| !c.is_empty()).unwrap_or_else(|| fallback.to_string()),
            ),
            Self::Number(n) => Money::from_number(*n, fallback),
            Self::Text(s) => Money::parse_locale(s, fallback),
            Self::Other(_) => Money::zero(fallback),
        }
    }
}

/// A legacy date in any of the shapes old writers produced
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    Text(String),
    Millis(i64),
    Other(serde_json::Value),
}

impl RawDate {
    /// Best-effort parse; `None` means the value was unusable
    fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Text(s) => parse_iso_millis(s)
                .or_else(|| {
                    DateTime::parse_from_rfc3339(s)
                        .ok()
                        .map(|dt| dt.with_timezone(&Utc))
                })
                .or_else(|| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                        .map(|naive| Utc.from_utc_datetime(&naive))
                }),
            Self::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
            Self::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAccount {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    pub currency: Option<String>,
    pub platform: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    pub id: Option<String>,
    pub account_id: Option<String>,
    /// Older writers stored the account reference under `account`
    pub account: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub amount: Option<RawAmount>,
    pub category: Option<String>,
    pub date: Option<RawDate>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCategory {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFixedExpense {
    pub id: Option<String>,
    pub name: Option<String>,
    pub amount: Option<RawAmount>,
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGoal {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Some writers used snake_case here
    #[serde(alias = "target_amount")]
    pub target_amount: Option<RawAmount>,
    pub current_amount: Option<RawAmount>,
    pub deadline: Option<String>,
}

fn coerce_id(
    raw: Option<String>,
    collection: &'static str,
    index: usize,
    issues: &mut Vec<CoercionIssue>,
) -> String {
    match raw.filter(|id| !id.is_empty()) {
        Some(id) => id,
        None => {
            let id = Uuid::new_v4().to_string();
            issues.push(CoercionIssue::new(
                collection,
                index,
                "id",
                format!("missing id, generated {}", id),
            ));
            id
        }
    }
}

fn coerce_amount(
    raw: Option<&RawAmount>,
    collection: &'static str,
    index: usize,
    field: &'static str,
    issues: &mut Vec<CoercionIssue>,
) -> Money {
    match raw {
        Some(amount @ RawAmount::Other(_)) => {
            let money = amount.to_money(FALLBACK_CURRENCY);
            issues.push(CoercionIssue::new(
                collection,
                index,
                field,
                "unrecognized amount shape, normalized to zero",
            ));
            money
        }
        Some(amount) => amount.to_money(FALLBACK_CURRENCY),
        None => {
            issues.push(CoercionIssue::new(
                collection,
                index,
                field,
                "missing amount, defaulted to zero",
            ));
            Money::zero(FALLBACK_CURRENCY)
        }
    }
}

/// Coerce a legacy account record; never fails
pub fn coerce_account(raw: RawAccount, index: usize, issues: &mut Vec<CoercionIssue>) -> Account {
    let account_type = match raw.account_type.as_deref() {
        Some(t) if !t.is_empty() => AccountType::coerce(t),
        _ => AccountType::default(),
    };

    Account {
        id: coerce_id(raw.id, "accounts", index, issues),
        name: raw.name.unwrap_or_default(),
        account_type,
        currency: raw
            .currency
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| FALLBACK_CURRENCY.to_string()),
        platform: raw.platform.unwrap_or_default(),
    }
}

/// Coerce a legacy transaction record; never fails
pub fn coerce_transaction(
    raw: RawTransaction,
    index: usize,
    issues: &mut Vec<CoercionIssue>,
) -> Transaction {
    // Legacy dates (and the now() fallback) can carry sub-millisecond
    // precision the stored form cannot hold
    let date = truncate_to_millis(match raw.date.as_ref().and_then(RawDate::to_datetime) {
        Some(dt) => dt,
        None => {
            issues.push(CoercionIssue::new(
                "transactions",
                index,
                "date",
                "missing or unparsable date, defaulted to now",
            ));
            Utc::now()
        }
    });

    Transaction {
        id: coerce_id(raw.id, "transactions", index, issues),
        account_id: raw
            .account_id
            .or(raw.account)
            .unwrap_or_default(),
        transaction_type: TransactionType::coerce(raw.transaction_type.as_deref()),
        amount: coerce_amount(raw.amount.as_ref(), "transactions", index, "amount", issues),
        category: raw.category.unwrap_or_default(),
        date,
        note: raw.note.filter(|n| !n.is_empty()),
    }
}

/// Coerce a legacy category record; never fails
pub fn coerce_category(raw: RawCategory, index: usize, issues: &mut Vec<CoercionIssue>) -> Category {
    Category {
        id: coerce_id(raw.id, "categories", index, issues),
        name: raw.name.unwrap_or_default(),
    }
}

/// Coerce a legacy fixed-expense record; never fails
pub fn coerce_fixed_expense(
    raw: RawFixedExpense,
    index: usize,
    issues: &mut Vec<CoercionIssue>,
) -> FixedExpense {
    FixedExpense {
        id: coerce_id(raw.id, "fixedExpenses", index, issues),
        name: raw.name.unwrap_or_default(),
        amount: coerce_amount(raw.amount.as_ref(), "fixedExpenses", index, "amount", issues),
        due_date: raw.due_date.unwrap_or_default(),
    }
}

/// Coerce a legacy goal record; never fails
pub fn coerce_goal(raw: RawGoal, index: usize, issues: &mut Vec<CoercionIssue>) -> Goal {
    Goal {
        id: coerce_id(raw.id, "goals", index, issues),
        name: raw
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Goal".to_string()),
        target_amount: coerce_amount(raw.target_amount.as_ref(), "goals", index, "targetAmount", issues),
        current_amount: coerce_amount(
            raw.current_amount.as_ref(),
            "goals",
            index,
            "currentAmount",
            issues,
        ),
        deadline: raw.deadline.filter(|d| !d.is_empty()),
    }
}

/// Deduplicate a collection by id, last occurrence wins
///
/// Records fold into an id-keyed slot in array order; a repeated id
/// overwrites the earlier record in place, so the survivor carries the last
/// occurrence's data at the first occurrence's position.
pub fn dedupe_by_id<T>(items: Vec<T>, id_of: impl Fn(&T) -> &str) -> Vec<T> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<T> = Vec::with_capacity(items.len());

    for item in items {
        let id = id_of(&item).to_string();
        match slots.get(&id) {
            Some(&slot) => out[slot] = item,
            None => {
                slots.insert(id, out.len());
                out.push(item);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_account_minimal() {
        let raw: RawAccount = serde_json::from_str(r#"{"name":"Cash"}"#).unwrap();
        let mut issues = Vec::new();

        let account = coerce_account(raw, 0, &mut issues);

        assert!(!account.id.is_empty());
        assert_eq!(account.name, "Cash");
        assert_eq!(account.account_type, AccountType::Checking);
        assert_eq!(account.currency, "USD");
        assert_eq!(account.platform, "");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "id");
    }

    #[test]
    fn test_coerce_account_case_normalizes_type() {
        let raw: RawAccount =
            serde_json::from_str(r#"{"id":"a1","name":"Save","type":"savings"}"#).unwrap();
        let mut issues = Vec::new();

        let account = coerce_account(raw, 0, &mut issues);
        assert_eq!(account.account_type, AccountType::Savings);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_coerce_transaction_amount_shapes() {
        let mut issues = Vec::new();

        // Major-unit number
        let raw: RawTransaction =
            serde_json::from_str(r#"{"id":"t1","amount":12.5,"date":"2024-01-02T00:00:00.000Z"}"#)
                .unwrap();
        let tx = coerce_transaction(raw, 0, &mut issues);
        assert_eq!(tx.amount, Money::new(1250, "USD"));

        // Canonical cents object without currency
        let raw: RawTransaction = serde_json::from_str(
            r#"{"id":"t2","amount":{"cents":900},"date":"2024-01-02T00:00:00.000Z"}"#,
        )
        .unwrap();
        let tx = coerce_transaction(raw, 1, &mut issues);
        assert_eq!(tx.amount, Money::new(900, "USD"));

        // Locale string
        let raw: RawTransaction = serde_json::from_str(
            r#"{"id":"t3","amount":"1.234,56","date":"2024-01-02T00:00:00.000Z"}"#,
        )
        .unwrap();
        let tx = coerce_transaction(raw, 2, &mut issues);
        assert_eq!(tx.amount, Money::new(123456, "USD"));

        assert!(issues.is_empty());
    }

    #[test]
    fn test_coerce_transaction_account_alias_and_type() {
        let raw: RawTransaction = serde_json::from_str(
            r#"{"id":"t1","account":"a9","type":"income","amount":1,"date":"2024-01-02T00:00:00.000Z"}"#,
        )
        .unwrap();
        let mut issues = Vec::new();

        let tx = coerce_transaction(raw, 0, &mut issues);
        assert_eq!(tx.account_id, "a9");
        assert_eq!(tx.transaction_type, TransactionType::Income);
    }

    #[test]
    fn test_coerce_transaction_date_fallbacks() {
        let mut issues = Vec::new();

        // Epoch milliseconds
        let raw: RawTransaction =
            serde_json::from_str(r#"{"id":"t1","amount":1,"date":1704153600000}"#).unwrap();
        let tx = coerce_transaction(raw, 0, &mut issues);
        assert_eq!(tx.date.timestamp_millis(), 1_704_153_600_000);

        // Bare calendar date
        let raw: RawTransaction =
            serde_json::from_str(r#"{"id":"t2","amount":1,"date":"2024-03-15"}"#).unwrap();
        let tx = coerce_transaction(raw, 1, &mut issues);
        assert_eq!(
            crate::models::date::format_iso_millis(&tx.date),
            "2024-03-15T00:00:00.000Z"
        );
        assert!(issues.is_empty());

        // Missing date defaults to now with an issue
        let raw: RawTransaction = serde_json::from_str(r#"{"id":"t3","amount":1}"#).unwrap();
        let before = truncate_to_millis(Utc::now());
        let tx = coerce_transaction(raw, 2, &mut issues);
        assert!(tx.date >= before);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "date");
    }

    #[test]
    fn test_coerced_dates_are_millisecond_precision() {
        use crate::models::date::is_millis_precision;

        // RFC3339 with sub-millisecond digits
        let raw: RawTransaction = serde_json::from_str(
            r#"{"id":"t1","amount":1,"date":"2024-03-15T09:30:00.123456789Z"}"#,
        )
        .unwrap();
        let mut issues = Vec::new();
        let tx = coerce_transaction(raw, 0, &mut issues);
        assert!(is_millis_precision(&tx.date));
        assert_eq!(
            crate::models::date::format_iso_millis(&tx.date),
            "2024-03-15T09:30:00.123Z"
        );

        // The now() fallback is truncated too
        let raw: RawTransaction = serde_json::from_str(r#"{"id":"t2","amount":1}"#).unwrap();
        let tx = coerce_transaction(raw, 1, &mut issues);
        assert!(is_millis_precision(&tx.date));
    }

    #[test]
    fn test_coerce_goal_snake_case_alias_and_defaults() {
        let raw: RawGoal =
            serde_json::from_str(r#"{"id":"g1","target_amount":50}"#).unwrap();
        let mut issues = Vec::new();

        let goal = coerce_goal(raw, 0, &mut issues);
        assert_eq!(goal.name, "Goal");
        assert_eq!(goal.target_amount, Money::new(5000, "USD"));
        assert_eq!(goal.current_amount, Money::zero("USD"));
        // Missing currentAmount is reported
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "currentAmount");
    }

    #[test]
    fn test_coerce_fixed_expense() {
        let raw: RawFixedExpense =
            serde_json::from_str(r#"{"id":"f1","name":"Rent","amount":1200,"dueDate":"1st"}"#)
                .unwrap();
        let mut issues = Vec::new();

        let fx = coerce_fixed_expense(raw, 0, &mut issues);
        assert_eq!(fx.amount, Money::new(120000, "USD"));
        assert_eq!(fx.due_date, "1st");
    }

    #[test]
    fn test_dedupe_last_occurrence_wins() {
        let items = vec![("t1", 1), ("t2", 2), ("t1", 3)];
        let deduped = dedupe_by_id(items, |(id, _)| id);

        assert_eq!(deduped, vec![("t1", 3), ("t2", 2)]);
    }

    #[test]
    fn test_dedupe_no_duplicates_is_identity() {
        let items = vec![("a", 1), ("b", 2)];
        assert_eq!(dedupe_by_id(items.clone(), |(id, _)| id), items);
    }
}
