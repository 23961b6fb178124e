//! Router assembly and shared handler state

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::clock::Clock;
use crate::config::AppConfig;
use crate::database::Database;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::store::PersonService;

/// Everything a handler can reach. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub people: PersonService,
    pub db: Database,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, db: Database, clock: Arc<dyn Clock>) -> Self {
        let people = PersonService::from_config(&config, db.clone(), clock);
        Self {
            people,
            db,
            config: Arc::new(config),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Protected
        .merge(people_routes(state.clone()));

    if state.config.security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn people_routes(state: AppState) -> Router<AppState> {
    use protected::people;

    Router::new()
        .route("/api/people", get(people::list).post(people::create))
        .route(
            "/api/people/:id",
            get(people::show).put(people::update).delete(people::delete),
        )
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}
