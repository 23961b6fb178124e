use async_trait::async_trait;
use std::time::Duration;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::types::Operation;

/// Observer rings around a person store commit.
/// Rings below `Database` run before anything is written; rings above it
/// run after the commit succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ObserverRing {
    Enrichment = 4, // Computed fields, audit timestamps
    Database = 5,   // The store's own flush; no observers register here
    Audit = 7,      // Change tracking, compliance logging
}

impl ObserverRing {
    /// Check if ring executes before the commit (can abort it)
    pub fn is_before_commit(&self) -> bool {
        (*self as u8) < ObserverRing::Database as u8
    }

    /// Rings that run before the store writes
    pub fn before_commit() -> [Self; 1] {
        [ObserverRing::Enrichment]
    }

    /// Rings that run once the write is durable
    pub fn after_commit() -> [Self; 1] {
        [ObserverRing::Audit]
    }
}

/// Base trait for all observers with metadata and applicability checks
pub trait Observer: Send + Sync {
    /// Observer name for logging and debugging
    fn name(&self) -> &'static str;

    /// Which ring this observer belongs to
    fn ring(&self) -> ObserverRing;

    /// Check if observer applies to this operation
    fn applies_to_operation(&self, op: Operation) -> bool;

    /// Execution timeout; `None` uses the pipeline default
    fn timeout(&self) -> Option<Duration> {
        None
    }

    /// Priority within ring (lower numbers execute first)
    fn priority(&self) -> u8 {
        50
    }
}

/// Ring 4: Enrichment - may mutate pending entries, failures abort the save
#[async_trait]
pub trait EnrichmentObserver: Observer {
    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError>;
}

/// Ring 7: Audit - read-only view of what was committed
#[async_trait]
pub trait AuditObserver: Observer {
    async fn execute(&self, ctx: &ObserverContext) -> Result<(), ObserverError>;
}

pub enum ObserverBox {
    Enrichment(Box<dyn EnrichmentObserver>),
    Audit(Box<dyn AuditObserver>),
}

impl ObserverBox {
    pub fn name(&self) -> &'static str {
        match self {
            ObserverBox::Enrichment(o) => o.name(),
            ObserverBox::Audit(o) => o.name(),
        }
    }

    pub fn ring(&self) -> ObserverRing {
        match self {
            ObserverBox::Enrichment(o) => o.ring(),
            ObserverBox::Audit(o) => o.ring(),
        }
    }

    pub fn applies_to_operation(&self, op: Operation) -> bool {
        match self {
            ObserverBox::Enrichment(o) => o.applies_to_operation(op),
            ObserverBox::Audit(o) => o.applies_to_operation(op),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self {
            ObserverBox::Enrichment(o) => o.timeout(),
            ObserverBox::Audit(o) => o.timeout(),
        }
    }

    pub fn priority(&self) -> u8 {
        match self {
            ObserverBox::Enrichment(o) => o.priority(),
            ObserverBox::Audit(o) => o.priority(),
        }
    }

    pub async fn execute_before_commit(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        match self {
            ObserverBox::Enrichment(o) => o.execute(ctx).await,
            _ => Ok(()), // Audit observers don't execute before commit
        }
    }

    pub async fn execute_after_commit(&self, ctx: &ObserverContext) -> Result<(), ObserverError> {
        match self {
            ObserverBox::Audit(o) => o.execute(ctx).await,
            _ => Ok(()), // Enrichment observers don't execute after commit
        }
    }
}
