//! Portability boundary: JSON export and import
//!
//! The exchange format is a plain JSON blob of the five collections, no
//! checksum and no envelope. Import re-validates the full aggregate and is
//! a wholesale replacement; it never merges with existing data.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};
use crate::models::{
    Account, AppData, Category, FixedExpense, Goal, Transaction, SCHEMA_VERSION,
};
use crate::storage::checksum::checksum_hex;
use crate::validate;

/// The portable exchange shape: just the collections
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortableData {
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
    /// Older exports may predate categories; absent means empty
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Older exports may predate fixed expenses; absent means empty
    #[serde(default)]
    pub fixed_expenses: Vec<FixedExpense>,
    pub goals: Vec<Goal>,
}

impl From<&AppData> for PortableData {
    fn from(data: &AppData) -> Self {
        Self {
            accounts: data.accounts.clone(),
            transactions: data.transactions.clone(),
            categories: data.categories.clone(),
            fixed_expenses: data.fixed_expenses.clone(),
            goals: data.goals.clone(),
        }
    }
}

/// Serialize the aggregate into the portable JSON blob (pretty-printed)
pub fn export_json(data: &AppData) -> TrackerResult<String> {
    let portable = PortableData::from(data);
    Ok(serde_json::to_string_pretty(&portable)?)
}

/// Suggested download filename for an exported blob
///
/// Stamps today's date and the blob's checksum so repeated exports are
/// distinguishable at a glance.
pub fn suggested_filename(json: &str) -> String {
    format!(
        "fin-tracker-backup-{}-{}.json",
        Utc::now().format("%Y-%m-%d"),
        checksum_hex(json.as_bytes())
    )
}

/// Parse and validate a portable blob into a full aggregate
///
/// The result is stamped with the current schema version and must pass
/// full validation; the caller swaps it in wholesale (for example via
/// `DomainStore::replace`).
pub fn import_json(json: &str) -> TrackerResult<AppData> {
    let portable: PortableData = serde_json::from_str(json)
        .map_err(|e| TrackerError::Import(format!("not a portable backup: {}", e)))?;

    let data = AppData {
        schema_version: SCHEMA_VERSION,
        accounts: portable.accounts,
        transactions: portable.transactions,
        categories: portable.categories,
        fixed_expenses: portable.fixed_expenses,
        goals: portable.goals,
    };

    validate::validate(&data).map_err(|issues| TrackerError::from_issues(&issues))?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountType, Money};

    fn sample_data() -> AppData {
        let mut data = AppData::empty();
        data.accounts.push(Account {
            id: "a1".into(),
            name: "Cash".into(),
            account_type: AccountType::Checking,
            currency: "USD".into(),
            platform: String::new(),
        });
        data.goals.push(Goal {
            id: "g1".into(),
            name: "Trip".into(),
            target_amount: Money::new(50000, "USD"),
            current_amount: Money::new(0, "USD"),
            deadline: Some("2025-06".into()),
        });
        data
    }

    #[test]
    fn test_export_import_round_trip() {
        let data = sample_data();
        let json = export_json(&data).unwrap();

        // No envelope fields in the blob
        assert!(!json.contains("checksum"));
        assert!(!json.contains("schemaVersion"));

        let imported = import_json(&json).unwrap();
        assert_eq!(imported, data);
    }

    #[test]
    fn test_import_stamps_current_version() {
        let json = export_json(&AppData::empty()).unwrap();
        let imported = import_json(&json).unwrap();
        assert_eq!(imported.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn test_import_rejects_garbage() {
        let err = import_json("not json").unwrap_err();
        assert!(matches!(err, TrackerError::Import(_)));
    }

    #[test]
    fn test_import_revalidates() {
        // Duplicate ids inside an otherwise well-formed blob
        let json = r#"{
            "accounts": [],
            "transactions": [],
            "categories": [{"id":"c1","name":"A"},{"id":"c1","name":"B"}],
            "fixedExpenses": [],
            "goals": []
        }"#;

        let err = import_json(json).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_suggested_filename_shape() {
        let name = suggested_filename("{}");
        assert!(name.starts_with("fin-tracker-backup-"));
        assert!(name.ends_with(".json"));
    }
}
