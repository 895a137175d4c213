//! Storage layer for fin-tracker
//!
//! A key-value substrate with atomic writes, a checksum-guarded versioned
//! document envelope, and the repository that orchestrates reads and
//! writes of the aggregate.

pub mod checksum;
pub mod file_io;
pub mod kv;
pub mod repository;

pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use repository::{Repository, StoredDocument, LEGACY_KEYS, PRIMARY_KEY};
