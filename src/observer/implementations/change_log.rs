// Ring 7: Change log - one structured event per committed person entry
use async_trait::async_trait;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{AuditObserver, Observer, ObserverRing};
use crate::types::Operation;

#[derive(Debug, Default)]
pub struct ChangeLog;

impl Observer for ChangeLog {
    fn name(&self) -> &'static str {
        "ChangeLog"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::Audit
    }

    fn applies_to_operation(&self, _op: Operation) -> bool {
        true
    }
}

#[async_trait]
impl AuditObserver for ChangeLog {
    async fn execute(&self, ctx: &ObserverContext) -> Result<(), ObserverError> {
        for entry in &ctx.entries {
            tracing::info!(
                target: "audit",
                operation = %entry.operation,
                person_id = entry.person.id,
                created_at = %entry.person.created_at,
                updated_at = ?entry.person.updated_at,
                "person {}", entry.operation
            );
        }
        Ok(())
    }
}
