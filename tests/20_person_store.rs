mod common;

use std::collections::HashSet;

use chrono::Duration;

use people_api::clock::ManualClock;
use people_api::config::StoreBackend;
use people_api::database::Person;
use people_api::store::PersonService;

use common::{service, t1, t2, BACKENDS};

#[tokio::test]
async fn lovelace_lifecycle_on_every_backend() {
    for backend in BACKENDS {
        let clock = ManualClock::new(t1());
        let people = service(backend, &clock).await;

        let mut ada = Person::new("Ada", "Lovelace");
        people.add(&mut ada).await.unwrap();
        assert!(ada.id > 0, "{:?}: id not assigned", backend);

        let stored = people.get(ada.id).await.unwrap().unwrap();
        assert_eq!(stored.created_at, t1(), "{:?}", backend);
        assert_eq!(stored.updated_at, Some(t1()), "{:?}", backend);

        clock.set(t2());
        let mut renamed = stored.clone();
        renamed.last_name = "King".to_string();
        people.update(&mut renamed).await.unwrap();

        let stored = people.get(ada.id).await.unwrap().unwrap();
        assert_eq!(stored.last_name, "King");
        assert_eq!(stored.created_at, t1(), "{:?}: created_at moved", backend);
        assert_eq!(stored.updated_at, Some(t2()), "{:?}", backend);

        people.delete(ada.id).await.unwrap();
        assert!(people.get(ada.id).await.unwrap().is_none(), "{:?}", backend);
        assert!(people.get_all().await.unwrap().is_empty(), "{:?}", backend);
    }
}

#[tokio::test]
async fn add_writes_identity_and_timestamps_back() {
    for backend in BACKENDS {
        let clock = ManualClock::new(t1());
        let people = service(backend, &clock).await;

        let mut grace = Person::new("Grace", "Hopper");
        people.add(&mut grace).await.unwrap();

        assert!(!grace.is_new());
        assert_eq!(grace.created_at, t1());
        assert_eq!(grace.updated_at, Some(grace.created_at));
    }
}

#[tokio::test]
async fn update_ignores_caller_supplied_created_at() {
    for backend in BACKENDS {
        let clock = ManualClock::new(t1());
        let people = service(backend, &clock).await;

        let mut alan = Person::new("Alan", "Turing");
        people.add(&mut alan).await.unwrap();

        clock.advance(Duration::minutes(5));
        alan.created_at = t2() + Duration::days(30);
        people.update(&mut alan).await.unwrap();

        let stored = people.get(alan.id).await.unwrap().unwrap();
        assert_eq!(stored.created_at, t1(), "{:?}", backend);
        assert!(stored.updated_at.unwrap() > stored.created_at, "{:?}", backend);
    }
}

#[tokio::test]
async fn repeated_updates_keep_moving_updated_at() {
    for backend in BACKENDS {
        let clock = ManualClock::new(t1());
        let people = service(backend, &clock).await;

        let mut edsger = Person::new("Edsger", "Dijkstra");
        people.add(&mut edsger).await.unwrap();

        let mut previous = edsger.updated_at.unwrap();
        for _ in 0..3 {
            clock.advance(Duration::seconds(1));
            people.update(&mut edsger).await.unwrap();

            let stored = people.get(edsger.id).await.unwrap().unwrap();
            let current = stored.updated_at.unwrap();
            assert!(current > previous, "{:?}", backend);
            assert_eq!(stored.created_at, t1());
            previous = current;
        }
    }
}

#[tokio::test]
async fn missing_ids_are_quiet() {
    for backend in BACKENDS {
        let clock = ManualClock::new(t1());
        let people = service(backend, &clock).await;

        assert!(people.get(9999).await.unwrap().is_none());
        people.delete(9999).await.unwrap();

        // Update of an unknown id is a no-op at the store level
        let mut ghost = Person::new("No", "One");
        ghost.id = 4242;
        people.update(&mut ghost).await.unwrap();
        assert!(people.get(4242).await.unwrap().is_none(), "{:?}", backend);
    }
}

async fn run_sequence(people: &PersonService, clock: &ManualClock) -> HashSet<(String, String)> {
    let mut ids = Vec::new();
    for (first, last) in [("Ada", "Lovelace"), ("Grace", "Hopper"), ("Alan", "Turing")] {
        let mut person = Person::new(first, last);
        people.add(&mut person).await.unwrap();
        ids.push(person.id);
    }

    clock.advance(Duration::hours(1));
    let mut grace = people.get(ids[1]).await.unwrap().unwrap();
    grace.first_name = "Rear Admiral Grace".to_string();
    people.update(&mut grace).await.unwrap();

    people.delete(ids[2]).await.unwrap();

    people
        .get_all()
        .await
        .unwrap()
        .into_iter()
        .map(|p| (p.first_name, p.last_name))
        .collect()
}

#[tokio::test]
async fn backends_agree_on_the_same_sequence() {
    let tracked_clock = ManualClock::new(t1());
    let tracked = service(StoreBackend::Tracked, &tracked_clock).await;
    let sql_clock = ManualClock::new(t1());
    let sql = service(StoreBackend::Sql, &sql_clock).await;

    let from_tracked = run_sequence(&tracked, &tracked_clock).await;
    let from_sql = run_sequence(&sql, &sql_clock).await;

    assert_eq!(from_tracked, from_sql);
    assert_eq!(from_tracked.len(), 2);
    assert!(from_tracked.contains(&("Rear Admiral Grace".to_string(), "Hopper".to_string())));
}

#[tokio::test]
async fn facade_reports_its_backend() {
    let clock = ManualClock::new(t1());
    for backend in BACKENDS {
        assert_eq!(service(backend, &clock).await.backend(), backend);
    }
}
