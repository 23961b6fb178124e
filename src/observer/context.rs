use std::time::Instant;

use crate::database::models::person::Person;
use crate::observer::traits::ObserverRing;
use crate::types::Operation;

/// One person queued for a commit, tagged with what the caller asked for
#[derive(Debug, Clone, PartialEq)]
pub struct PendingWrite {
    pub operation: Operation,
    pub person: Person,
}

impl PendingWrite {
    pub fn new(operation: Operation, person: Person) -> Self {
        Self { operation, person }
    }
}

/// Everything the pipeline knows about one commit.
/// Stores build it, enrichment observers rewrite the entries, and the store
/// persists whatever the entries hold once the before-commit rings are done.
#[derive(Debug)]
pub struct ObserverContext {
    pub entries: Vec<PendingWrite>,

    // Performance tracking
    pub start_time: Instant,
    pub current_ring: Option<ObserverRing>,
}

impl ObserverContext {
    pub fn new(entries: Vec<PendingWrite>) -> Self {
        Self {
            entries,
            start_time: Instant::now(),
            current_ring: None,
        }
    }

    /// Context for a single entry, the common case for facade calls
    pub fn single(operation: Operation, person: Person) -> Self {
        Self::new(vec![PendingWrite::new(operation, person)])
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get mutable entries by operation type
    pub fn entries_by_operation_mut(&mut self, operation: Operation) -> impl Iterator<Item = &mut PendingWrite> {
        self.entries.iter_mut().filter(move |e| e.operation == operation)
    }

    /// Count entries by operation type
    pub fn count_by_operation(&self, operation: Operation) -> usize {
        self.entries.iter().filter(|e| e.operation == operation).count()
    }

    /// Consume the context, returning the entries as the observers left them
    pub fn into_entries(self) -> Vec<PendingWrite> {
        self.entries
    }

    /// Get total execution time
    pub fn execution_time(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }
}
