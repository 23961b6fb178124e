mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use people_api::clock::ManualClock;
use people_api::config::StoreBackend;
use people_api::database::Person;
use people_api::observer::{
    AuditObserver, Observer, ObserverBox, ObserverContext, ObserverError, ObserverPipeline, ObserverRing,
};
use people_api::store::PersonService;
use people_api::types::Operation;

use common::{memory_db, t1, BACKENDS};

/// Records every committed entry the audit ring sees
#[derive(Default)]
struct Recorder {
    runs: AtomicUsize,
    seen: Mutex<Vec<(Operation, i64)>>,
}

struct RecordingAudit(Arc<Recorder>);

impl Observer for RecordingAudit {
    fn name(&self) -> &'static str {
        "RecordingAudit"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::Audit
    }

    fn applies_to_operation(&self, _op: Operation) -> bool {
        true
    }
}

#[async_trait]
impl AuditObserver for RecordingAudit {
    async fn execute(&self, ctx: &ObserverContext) -> Result<(), ObserverError> {
        self.0.runs.fetch_add(1, Ordering::SeqCst);
        let mut seen = self.0.seen.lock().unwrap();
        seen.extend(ctx.entries.iter().map(|e| (e.operation, e.person.id)));
        Ok(())
    }
}

async fn recorded_service(backend: StoreBackend) -> (PersonService, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let mut pipeline = ObserverPipeline::standard(Arc::new(ManualClock::new(t1())), Duration::from_secs(5), true);
    pipeline.register_observer(ObserverBox::Audit(Box::new(RecordingAudit(recorder.clone()))));
    let people = PersonService::compose(backend, memory_db().await, Arc::new(pipeline));
    (people, recorder)
}

#[tokio::test]
async fn audit_ring_sees_each_committed_write_once() {
    for backend in BACKENDS {
        let (people, recorder) = recorded_service(backend).await;

        let mut ada = Person::new("Ada", "Lovelace");
        people.add(&mut ada).await.unwrap();
        ada.last_name = "King".to_string();
        people.update(&mut ada).await.unwrap();
        people.delete(ada.id).await.unwrap();

        assert_eq!(recorder.runs.load(Ordering::SeqCst), 3, "{:?}", backend);
        assert_eq!(
            *recorder.seen.lock().unwrap(),
            vec![
                (Operation::Create, ada.id),
                (Operation::Update, ada.id),
                (Operation::Delete, ada.id),
            ],
            "{:?}",
            backend
        );
    }
}

#[tokio::test]
async fn writes_that_touch_no_row_are_not_audited() {
    for backend in BACKENDS {
        let (people, recorder) = recorded_service(backend).await;

        let mut ghost = Person::new("No", "One");
        ghost.id = 4242;
        people.update(&mut ghost).await.unwrap();
        people.delete(9999).await.unwrap();

        assert_eq!(recorder.runs.load(Ordering::SeqCst), 0, "{:?}", backend);
        assert!(recorder.seen.lock().unwrap().is_empty(), "{:?}", backend);
    }
}
