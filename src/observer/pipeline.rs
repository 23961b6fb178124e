// Observer pipeline: runs registered observers ring by ring around a store commit

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::clock::Clock;
use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::implementations::{AuditTimestamps, ChangeLog};
use crate::observer::traits::{ObserverBox, ObserverRing};

pub const DEFAULT_OBSERVER_TIMEOUT: Duration = Duration::from_secs(5);

/// Executes observers in ring order, priority order within a ring
pub struct ObserverPipeline {
    // Observer registry by ring
    observers: HashMap<ObserverRing, Vec<ObserverBox>>,

    default_timeout: Duration,
}

impl ObserverPipeline {
    /// Create new observer pipeline with empty observer registry
    pub fn new() -> Self {
        Self {
            observers: HashMap::new(),
            default_timeout: DEFAULT_OBSERVER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, default_timeout: Duration) -> Self {
        self.default_timeout = default_timeout;
        self
    }

    /// The pipeline every person store runs: audit timestamps always,
    /// change logging when enabled.
    pub fn standard(clock: Arc<dyn Clock>, default_timeout: Duration, audit_logging: bool) -> Self {
        let mut pipeline = Self::new().with_timeout(default_timeout);
        pipeline.register_observer(ObserverBox::Enrichment(Box::new(AuditTimestamps::new(clock))));
        if audit_logging {
            pipeline.register_observer(ObserverBox::Audit(Box::new(ChangeLog)));
        }
        pipeline
    }

    /// Register an observer (type-safe registration)
    pub fn register_observer(&mut self, observer: ObserverBox) {
        let ring = observer.ring();
        let name = observer.name();
        let ring_observers = self.observers.entry(ring).or_default();
        ring_observers.push(observer);
        // Stable sort keeps registration order for equal priorities
        ring_observers.sort_by_key(|o| o.priority());

        tracing::debug!("Registered observer '{}' for ring {:?}", name, ring);
    }

    pub fn observer_names(&self, ring: ObserverRing) -> Vec<&'static str> {
        self.observers
            .get(&ring)
            .map(|obs| obs.iter().map(|o| o.name()).collect())
            .unwrap_or_default()
    }

    /// Run the before-commit rings. The first failure aborts the commit.
    pub async fn before_commit(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        if ctx.is_empty() {
            return Ok(());
        }

        for ring in ObserverRing::before_commit() {
            ctx.current_ring = Some(ring);
            let Some(observers) = self.observers.get(&ring) else {
                continue;
            };

            for observer in observers {
                if !ctx.entries.iter().any(|e| observer.applies_to_operation(e.operation)) {
                    tracing::trace!("Observer {} skipped - no matching entries", observer.name());
                    continue;
                }

                let limit = observer.timeout().unwrap_or(self.default_timeout);
                let observer_start = Instant::now();

                match timeout(limit, observer.execute_before_commit(ctx)).await {
                    Ok(Ok(())) => {
                        tracing::debug!(
                            "Observer: {} completed successfully in {:?}",
                            observer.name(),
                            observer_start.elapsed()
                        );
                    }
                    Ok(Err(error)) => {
                        tracing::warn!("Observer: {} failed: {}", observer.name(), error);
                        return Err(error);
                    }
                    Err(_timeout) => {
                        tracing::error!("Observer: {} timed out after {:?}", observer.name(), limit);
                        return Err(ObserverError::TimeoutError {
                            observer: observer.name().to_string(),
                            elapsed: limit,
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// Run the after-commit rings. The data is already durable, so a failing
    /// or slow observer is logged and the remaining observers still run.
    pub async fn after_commit(&self, ctx: &ObserverContext) {
        if ctx.is_empty() {
            return;
        }

        for ring in ObserverRing::after_commit() {
            let Some(observers) = self.observers.get(&ring) else {
                continue;
            };

            for observer in observers {
                if !ctx.entries.iter().any(|e| observer.applies_to_operation(e.operation)) {
                    continue;
                }

                let limit = observer.timeout().unwrap_or(self.default_timeout);
                match timeout(limit, observer.execute_after_commit(ctx)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(error)) => {
                        tracing::warn!("Observer: {} failed after commit in ring {:?}: {}", observer.name(), ring, error)
                    }
                    Err(_timeout) => {
                        tracing::warn!("Observer: {} timed out after commit in ring {:?} ({:?})", observer.name(), ring, limit)
                    }
                }
            }
        }
    }
}

impl Default for ObserverPipeline {
    fn default() -> Self {
        Self::new()
    }
}
