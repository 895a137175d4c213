//! Domain store: the in-memory aggregate and its update cycle
//!
//! One owned instance is the sole source of truth for consumers. Hydrate
//! once per session, then mutate exclusively through `save`, which applies
//! a pure updater to the current value, persists the result, and only then
//! swaps the in-memory state. An updater never observes a partially
//! updated aggregate.
//!
//! There is no multi-writer coordination: the system assumes exactly one
//! active mutator, and concurrent processes racing on the same store let
//! the last write win. That is a documented limitation of the design.

use tracing::debug;

use crate::error::TrackerResult;
use crate::migrate::LoadReport;
use crate::models::AppData;
use crate::storage::{KeyValueStore, Repository};

/// Cached aggregate plus the read-modify-write cycle over a repository
pub struct DomainStore<S> {
    repository: Repository<S>,
    data: Option<AppData>,
    hydrated: bool,
}

impl<S: KeyValueStore> DomainStore<S> {
    /// Create an unhydrated store over a repository
    pub fn new(repository: Repository<S>) -> Self {
        Self {
            repository,
            data: None,
            hydrated: false,
        }
    }

    /// Load the aggregate from storage and mark the store hydrated
    ///
    /// Meant to be called once per session, before any `save`. Returns the
    /// read-path report so callers can surface migration or integrity
    /// events.
    pub fn hydrate(&mut self) -> LoadReport {
        let (data, report) = self.repository.get_all_with_report();
        debug!(state = ?report.state, records = data.record_count(), "hydrated");
        self.data = Some(data);
        self.hydrated = true;
        report
    }

    /// Whether `hydrate` has completed
    pub fn hydrated(&self) -> bool {
        self.hydrated
    }

    /// The current aggregate, `None` before hydration
    pub fn data(&self) -> Option<&AppData> {
        self.data.as_ref()
    }

    /// Apply a pure updater to the current aggregate and persist the result
    ///
    /// A defined no-op before hydration (there is no current data to
    /// update). The in-memory value only changes after the write succeeds,
    /// so a failed save leaves the previous state intact.
    pub fn save(&mut self, updater: impl FnOnce(&AppData) -> AppData) -> TrackerResult<()> {
        let current = match self.data.as_ref() {
            Some(current) => current,
            None => {
                debug!("save before hydrate is a no-op");
                return Ok(());
            }
        };

        let next = updater(current);
        self.repository.save_all(&next)?;
        self.data = Some(next);
        Ok(())
    }

    /// Replace the aggregate wholesale (used by import)
    pub fn replace(&mut self, data: AppData) -> TrackerResult<()> {
        self.save(|_| data)
    }

    /// Reset to empty defaults through the normal save cycle
    pub fn clear_data(&mut self) -> TrackerResult<()> {
        self.save(|_| AppData::empty())
    }

    /// The underlying repository
    pub fn repository(&self) -> &Repository<S> {
        &self.repository
    }
}
