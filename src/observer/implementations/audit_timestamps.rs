// Ring 4: Audit timestamps - stamps created_at / updated_at on pending person entries
use async_trait::async_trait;
use std::sync::Arc;

use crate::clock::Clock;
use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{EnrichmentObserver, Observer, ObserverRing};
use crate::types::Operation;

/// Stamps every pending create and update with one instant per commit.
///
/// - Create: `created_at = now`, `updated_at = Some(now)`
/// - Update: `updated_at = Some(now)`, `created_at` left alone
/// - Delete: untouched
pub struct AuditTimestamps {
    clock: Arc<dyn Clock>,
}

impl AuditTimestamps {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl Observer for AuditTimestamps {
    fn name(&self) -> &'static str {
        "AuditTimestamps"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::Enrichment
    }

    fn applies_to_operation(&self, op: Operation) -> bool {
        matches!(op, Operation::Create | Operation::Update)
    }

    // Other enrichment may depend on final timestamps
    fn priority(&self) -> u8 {
        10
    }
}

#[async_trait]
impl EnrichmentObserver for AuditTimestamps {
    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let now = self.clock.now();

        for entry in ctx.entries.iter_mut() {
            match entry.operation {
                Operation::Create => {
                    entry.person.created_at = now;
                    entry.person.updated_at = Some(now);
                }
                Operation::Update => {
                    entry.person.updated_at = Some(now);
                }
                Operation::Delete => {}
            }
        }

        tracing::debug!(
            "Stamped {} created / {} updated entries at {}",
            ctx.count_by_operation(Operation::Create),
            ctx.count_by_operation(Operation::Update),
            now
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::database::models::person::Person;
    use crate::observer::context::PendingWrite;
    use chrono::{Duration, TimeZone, Utc};

    #[tokio::test]
    async fn stamps_by_operation() {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let t1 = t0 + Duration::hours(1);
        let clock = Arc::new(ManualClock::new(t1));
        let observer = AuditTimestamps::new(clock);

        let mut existing = Person::new("Grace", "Hopper");
        existing.id = 7;
        existing.created_at = t0;
        existing.updated_at = Some(t0);

        let mut gone = existing.clone();
        gone.id = 8;

        let mut ctx = ObserverContext::new(vec![
            PendingWrite::new(Operation::Create, Person::new("Ada", "Lovelace")),
            PendingWrite::new(Operation::Update, existing),
            PendingWrite::new(Operation::Delete, gone),
        ]);
        observer.execute(&mut ctx).await.unwrap();

        let created = &ctx.entries[0].person;
        assert_eq!(created.created_at, t1);
        assert_eq!(created.updated_at, Some(t1));

        let updated = &ctx.entries[1].person;
        assert_eq!(updated.created_at, t0);
        assert_eq!(updated.updated_at, Some(t1));

        let deleted = &ctx.entries[2].person;
        assert_eq!(deleted.created_at, t0);
        assert_eq!(deleted.updated_at, Some(t0));
    }

    #[test]
    fn ignores_deletes() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let observer = AuditTimestamps::new(clock);
        assert!(observer.applies_to_operation(Operation::Create));
        assert!(observer.applies_to_operation(Operation::Update));
        assert!(!observer.applies_to_operation(Operation::Delete));
    }
}
