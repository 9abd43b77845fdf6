//! Record Collector
//!
//! Keeps an owned copy of every changeset it is handed.

use super::ChangesetListener;
use crate::changeset::Changeset;

/// Listener that gathers processed changesets in order
#[derive(Debug, Default)]
pub struct RecordCollector {
    records: Vec<Changeset>,
    initialized: bool,
    finalized: bool,
}

impl RecordCollector {
    /// Create a new collector
    pub fn new() -> Self {
        Self::default()
    }

    /// The collected changesets as a slice
    pub fn records(&self) -> &[Changeset] {
        &self.records
    }

    /// Take the collected changesets
    pub fn take_records(&mut self) -> Vec<Changeset> {
        std::mem::take(&mut self.records)
    }

    /// Whether `finalize` has run since the last `initialize`
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Whether `initialize` has run
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl ChangesetListener for RecordCollector {
    fn initialize(&mut self) {
        self.records.clear();
        self.initialized = true;
        self.finalized = false;
    }

    fn process(&mut self, changeset: &Changeset) {
        self.records.push(changeset.clone());
    }

    fn finalize(&mut self) {
        self.finalized = true;
    }
}
