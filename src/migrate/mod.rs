//! Migration engine: detect the stored format and produce an aggregate
//!
//! The read path is a small state machine. In order:
//!
//! 1. Primary versioned key absent or unparsable: inspect the legacy
//!    per-collection keys; any present means `LegacyFlatCollections`,
//!    none means `NoData` (empty defaults).
//! 2. Primary key parses but the schema version differs: `LegacyUnknown`.
//!    The mismatched payload is discarded outright — a version-mismatched
//!    document is never partially trusted — and the legacy inspection runs.
//! 3. Version matches but the checksum does not: `CurrentVersionCorrupt`.
//!    An integrity warning is emitted, the parsed payload is kept
//!    optimistically, and structural validation re-runs; if that also
//!    fails, fall back to the legacy inspection.
//! 4. Version and checksum match and validation passes:
//!    `CurrentVersionValid`, returned directly.
//!
//! Every failure on this path recovers; the worst case is an empty
//! aggregate. Nothing here returns an error to the caller.

pub mod legacy;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::models::{AppData, SCHEMA_VERSION};
use crate::storage::checksum;
use crate::storage::kv::KeyValueStore;
use crate::storage::repository::{StoredDocument, LEGACY_KEYS, PRIMARY_KEY};
use crate::validate;

pub use legacy::{CoercionIssue, FALLBACK_CURRENCY};

/// Terminal state of the read path; records which branch produced the data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing stored anywhere; empty defaults returned
    NoData,
    /// Primary document valid at the current version; no migration
    CurrentVersionValid,
    /// Primary document used despite a checksum mismatch
    CurrentVersionCorrupt,
    /// Aggregate rebuilt from legacy per-collection keys
    LegacyFlatCollections,
    /// Version-mismatched primary document discarded, nothing rescued it
    LegacyUnknown,
}

/// What the read path observed while producing the aggregate
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// The branch that produced the returned data
    pub state: LoadState,

    /// True when the stored checksum did not match the recomputed one
    pub integrity_warning: bool,

    /// Per-record repairs applied during legacy coercion
    pub coercion_issues: Vec<CoercionIssue>,
}

impl LoadReport {
    fn clean(state: LoadState) -> Self {
        Self {
            state,
            integrity_warning: false,
            coercion_issues: Vec::new(),
        }
    }
}

/// Run the read-path state machine against a store
///
/// Total: always yields a structurally valid aggregate, never an error.
pub fn read_aggregate<S: KeyValueStore>(store: &S) -> (AppData, LoadReport) {
    let mut integrity_warning = false;
    let mut version_rejected = false;

    let doc: Option<StoredDocument> = read_key(store, PRIMARY_KEY);
    if let Some(doc) = doc {
        if doc.schema_version == SCHEMA_VERSION {
            let serialized = doc.data.to_string();
            if !checksum::verify(serialized.as_bytes(), &doc.checksum) {
                warn!(
                    stored = %doc.checksum,
                    "checksum mismatch on stored aggregate, attempting to continue"
                );
                integrity_warning = true;
            }

            match validate::validate_value(&doc.data) {
                Ok(data) => {
                    let state = if integrity_warning {
                        LoadState::CurrentVersionCorrupt
                    } else {
                        LoadState::CurrentVersionValid
                    };
                    return (
                        data,
                        LoadReport {
                            state,
                            integrity_warning,
                            coercion_issues: Vec::new(),
                        },
                    );
                }
                Err(issues) => {
                    warn!(
                        issue_count = issues.len(),
                        first = %issues[0],
                        "stored aggregate failed validation, attempting migration fallback"
                    );
                }
            }
        } else {
            warn!(
                stored_version = doc.schema_version,
                current_version = SCHEMA_VERSION,
                "schema version mismatch, discarding stored aggregate"
            );
            version_rejected = true;
        }
    }

    match read_legacy_collections(store) {
        Some((data, coercion_issues)) => {
            warn!(
                records = data.record_count(),
                repairs = coercion_issues.len(),
                "aggregate rebuilt from legacy collection keys"
            );
            (
                data,
                LoadReport {
                    state: LoadState::LegacyFlatCollections,
                    integrity_warning,
                    coercion_issues,
                },
            )
        }
        None => {
            let state = if version_rejected {
                LoadState::LegacyUnknown
            } else {
                LoadState::NoData
            };
            let mut report = LoadReport::clean(state);
            report.integrity_warning = integrity_warning;
            (AppData::empty(), report)
        }
    }
}

/// Read and parse one key; read failures and malformed JSON count as absent
fn read_key<T: DeserializeOwned, S: KeyValueStore>(store: &S, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(key, error = %e, "store read failed, treating key as absent");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(key, error = %e, "malformed JSON, treating key as absent");
            None
        }
    }
}

/// Inspect the legacy per-collection keys
///
/// Returns `None` when no legacy key yields records. Each key is
/// independently optional; a missing or malformed key contributes an empty
/// collection. Every collection is coerced record by record and then
/// deduplicated by id, last occurrence winning.
fn read_legacy_collections<S: KeyValueStore>(store: &S) -> Option<(AppData, Vec<CoercionIssue>)> {
    let accounts: Option<Vec<legacy::RawAccount>> = read_key(store, LEGACY_KEYS.accounts);
    let transactions: Option<Vec<legacy::RawTransaction>> = read_key(store, LEGACY_KEYS.transactions);
    let categories: Option<Vec<legacy::RawCategory>> = read_key(store, LEGACY_KEYS.categories);
    let fixed_expenses: Option<Vec<legacy::RawFixedExpense>> =
        read_key(store, LEGACY_KEYS.fixed_expenses);
    let goals: Option<Vec<legacy::RawGoal>> = read_key(store, LEGACY_KEYS.goals);

    if accounts.is_none()
        && transactions.is_none()
        && categories.is_none()
        && fixed_expenses.is_none()
        && goals.is_none()
    {
        return None;
    }

    let mut issues = Vec::new();

    let accounts: Vec<_> = accounts
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, raw)| legacy::coerce_account(raw, i, &mut issues))
        .collect();
    let transactions: Vec<_> = transactions
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, raw)| legacy::coerce_transaction(raw, i, &mut issues))
        .collect();
    let categories: Vec<_> = categories
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, raw)| legacy::coerce_category(raw, i, &mut issues))
        .collect();
    let fixed_expenses: Vec<_> = fixed_expenses
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, raw)| legacy::coerce_fixed_expense(raw, i, &mut issues))
        .collect();
    let goals: Vec<_> = goals
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, raw)| legacy::coerce_goal(raw, i, &mut issues))
        .collect();

    for issue in &issues {
        debug!(%issue, "legacy record repaired");
    }

    let data = AppData {
        schema_version: SCHEMA_VERSION,
        accounts: legacy::dedupe_by_id(accounts, |a| &a.id),
        transactions: legacy::dedupe_by_id(transactions, |t| &t.id),
        categories: legacy::dedupe_by_id(categories, |c| &c.id),
        fixed_expenses: legacy::dedupe_by_id(fixed_expenses, |f| &f.id),
        goals: legacy::dedupe_by_id(goals, |g| &g.id),
    };

    Some((data, issues))
}
