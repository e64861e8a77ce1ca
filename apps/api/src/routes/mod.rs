pub mod health;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::grading::handlers::handle_grade;
use crate::state::AppState;

/// Permissive cross-origin policy: the grading endpoint is called straight
/// from a static front end on another origin. The layer also answers
/// OPTIONS preflights with 200 and an empty body.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/interview", post(handle_grade))
        .layer(cors_layer())
        .with_state(state)
}
