#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use people_api::app::{app, AppState};
use people_api::auth::{generate_jwt, Claims};
use people_api::clock::ManualClock;
use people_api::config::{AppConfig, StoreBackend};
use people_api::database::Database;
use people_api::observer::ObserverPipeline;
use people_api::store::PersonService;

pub const BACKENDS: [StoreBackend; 2] = [StoreBackend::Tracked, StoreBackend::Sql];

pub fn t1() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn t2() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
}

/// Fresh in-memory database; the schema is applied on open
pub async fn memory_db() -> Database {
    Database::in_memory().await.expect("in-memory database")
}

/// Person facade over a fresh database, stamping time from `clock`
pub async fn service(backend: StoreBackend, clock: &ManualClock) -> PersonService {
    let pipeline = ObserverPipeline::standard(
        Arc::new(clock.clone()),
        std::time::Duration::from_secs(5),
        true,
    );
    PersonService::compose(backend, memory_db().await, Arc::new(pipeline))
}

pub fn test_config(backend: StoreBackend) -> AppConfig {
    let mut config = AppConfig::development();
    config.database.url = "sqlite::memory:".to_string();
    config.store.backend = backend;
    config.security.jwt_secret = "integration-test-secret".to_string();
    config
}

pub struct TestApp {
    pub router: Router,
    pub config: AppConfig,
    pub db: Database,
}

impl TestApp {
    pub async fn new(backend: StoreBackend) -> Self {
        let config = test_config(backend);
        let db = memory_db().await;
        let state = AppState::new(config.clone(), db.clone(), Arc::new(ManualClock::new(t1())));
        Self {
            router: app(state),
            config,
            db,
        }
    }

    pub fn token(&self, role: &str) -> String {
        let claims = Claims::new("tester", role, 1);
        generate_jwt(&claims, &self.config.security.jwt_secret).expect("token")
    }

    /// Send one request through the router and decode the body (Null when empty)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}
