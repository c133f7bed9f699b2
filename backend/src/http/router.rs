//! Route table. `/health` is open; everything under [`COURSES_PREFIX`]
//! needs a bearer token, enforced by the `RequestContext` extractor.

use axum::{routing::get, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use super::handlers::{get_course_by_id, get_courses_by_major, health_check, search_courses};
use super::state::AppState;

pub const COURSES_PREFIX: &str = "/v1/courses";

fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_courses))
        .route("/search/{course_id}", get(get_course_by_id))
        .route("/major/{major}", get(get_courses_by_major))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest(COURSES_PREFIX, course_routes())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
