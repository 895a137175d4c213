//! Versioned repository over the key-value substrate
//!
//! Orchestrates the read path (detect, migrate, validate, return) and the
//! write path (validate, serialize, checksum, persist). The read path is
//! total: it always produces a structurally valid aggregate, empty
//! collections at worst. The write path fails fast: malformed data is a
//! programmer error and never reaches the store.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{TrackerError, TrackerResult};
use crate::migrate::{self, LoadReport};
use crate::models::{AppData, SCHEMA_VERSION};
use crate::validate;

use super::checksum::checksum_hex;
use super::kv::KeyValueStore;

/// Storage key holding the current versioned aggregate document
pub const PRIMARY_KEY: &str = "fin-tracker/v1";

/// Storage keys from the pre-aggregate schema generation, read-only
#[derive(Debug, Clone, Copy)]
pub struct LegacyKeys {
    pub accounts: &'static str,
    pub transactions: &'static str,
    pub categories: &'static str,
    pub fixed_expenses: &'static str,
    pub goals: &'static str,
}

/// The legacy per-collection keys consumed during migration
pub const LEGACY_KEYS: LegacyKeys = LegacyKeys {
    accounts: "fin_accounts",
    transactions: "fin_transactions",
    categories: "fin_categories",
    fixed_expenses: "fin_fixed_expenses",
    goals: "fin_goals",
};

/// The persisted envelope: version, aggregate payload, integrity digest
///
/// The `data` field stays a raw JSON value here so the checksum can be
/// recomputed over exactly what was stored before the payload is trusted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    /// Schema generation of the envelope
    pub schema_version: u32,

    /// The aggregate, as stored
    pub data: serde_json::Value,

    /// 32-bit rolling checksum of the serialized `data` field, lowercase hex
    pub checksum: String,
}

/// Repository for the aggregate document
///
/// Generic over the storage substrate; the same orchestration runs against
/// the file-backed store in production and the in-memory store in tests.
pub struct Repository<S> {
    store: S,
    integrity_warnings: AtomicU64,
}

impl<S: KeyValueStore> Repository<S> {
    /// Create a repository over a store
    pub fn new(store: S) -> Self {
        Self {
            store,
            integrity_warnings: AtomicU64::new(0),
        }
    }

    /// Current schema version constant
    pub fn version(&self) -> u32 {
        SCHEMA_VERSION
    }

    /// Load the aggregate; total, never fails
    ///
    /// Missing, corrupt, version-mismatched, or legacy-format input all
    /// recover to the most complete aggregate obtainable.
    pub fn get_all(&self) -> AppData {
        self.get_all_with_report().0
    }

    /// Load the aggregate along with the read-path report
    pub fn get_all_with_report(&self) -> (AppData, LoadReport) {
        let (data, report) = migrate::read_aggregate(&self.store);
        if report.integrity_warning {
            self.integrity_warnings.fetch_add(1, Ordering::Relaxed);
        }
        (data, report)
    }

    /// Validate and persist the aggregate as a single atomic store write
    ///
    /// # Errors
    ///
    /// `TrackerError::Validation` when the aggregate is structurally
    /// invalid (nothing is persisted); `TrackerError::Storage` when the
    /// substrate rejects the write (propagated unchanged).
    pub fn save_all(&self, data: &AppData) -> TrackerResult<()> {
        validate::validate(data).map_err(|issues| TrackerError::from_issues(&issues))?;

        let value = serde_json::to_value(data)?;
        let serialized = value.to_string();
        let document = StoredDocument {
            schema_version: SCHEMA_VERSION,
            data: value,
            checksum: checksum_hex(serialized.as_bytes()),
        };

        let packed = serde_json::to_string(&document)?;
        self.store.set(PRIMARY_KEY, &packed).map_err(|e| {
            warn!(error = %e, "aggregate write failed");
            e
        })
    }

    /// Remove the primary key only
    ///
    /// Legacy keys are left untouched for forensic recovery.
    pub fn clear(&self) -> TrackerResult<()> {
        self.store.remove(PRIMARY_KEY)
    }

    /// How many times a checksum mismatch was observed on the read path
    pub fn integrity_warnings(&self) -> u64 {
        self.integrity_warnings.load(Ordering::Relaxed)
    }

    /// Access the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }
}
