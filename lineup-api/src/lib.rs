//! lineup-api library - Livestock Lineup server
//!
//! Submission API, reference data, organizer lineups and the breed-call push
//! channel, served over HTTP.

use axum::Router;
use lineup_common::events::EventBus;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

pub use error::ApiError;

/// Event bus capacity; lagging SSE clients lose the oldest events
pub const EVENT_BUS_CAPACITY: usize = 1000;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Push channel feeding /api/events
    pub events: EventBus,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            events: EventBus::new(EVENT_BUS_CAPACITY),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let api = Router::new()
        .route(
            "/submissions",
            get(api::list_submissions).post(api::create_submission),
        )
        .route("/submissions/match", get(api::match_submissions))
        .route("/exhibitors", get(api::list_exhibitors))
        .route("/breeds", get(api::list_breeds))
        .route("/categories", get(api::list_categories))
        .route("/shows", get(api::list_shows))
        .route(
            "/lineups",
            get(api::list_lineups)
                .post(api::create_lineup)
                .delete(api::clear_lineups),
        )
        .route("/lineups/print", get(api::print_lineups))
        .route("/events", get(api::event_stream))
        .route("/push-config", get(api::push_config))
        .route("/buildinfo", get(api::get_build_info));

    Router::new()
        .nest("/api", api)
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Exhibitor and organizer pages are served from a different origin
        .layer(CorsLayer::permissive())
}
