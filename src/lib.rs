//! fin-tracker — versioned local data layer for a personal finance tracker
//!
//! This library is the persistent core of a single-user finance tracker: it
//! reads and writes one aggregate document, migrates from older flat
//! storage layouts, verifies integrity with a checksum, and deduplicates
//! records. UI, charts, CSV glue, and sync hooks are external collaborators
//! that only call through this crate's public surface.
//!
//! # Architecture
//!
//! - `config`: data-directory resolution
//! - `error`: custom error types
//! - `models`: the aggregate and its domain records (money, accounts,
//!   transactions, categories, fixed expenses, goals)
//! - `validate`: pure structural validation
//! - `migrate`: stored-format detection and legacy migration
//! - `storage`: key-value substrate, checksum, repository
//! - `store`: the in-memory domain store and its save cycle
//! - `export`: portable JSON export/import
//!
//! # Example
//!
//! ```rust
//! use fin_tracker::models::Category;
//! use fin_tracker::storage::{MemoryStore, Repository};
//! use fin_tracker::store::DomainStore;
//!
//! let mut store = DomainStore::new(Repository::new(MemoryStore::new()));
//! store.hydrate();
//! store.save(|data| {
//!     let mut next = data.clone();
//!     next.categories.push(Category::new("Groceries"));
//!     next
//! })?;
//! # Ok::<(), fin_tracker::TrackerError>(())
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod migrate;
pub mod models;
pub mod storage;
pub mod store;
pub mod validate;

pub use error::{TrackerError, TrackerResult};
pub use models::{AppData, SCHEMA_VERSION};
pub use store::DomainStore;
