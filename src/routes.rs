// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{exam, statistics},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * All exam routes require a bearer token identifying the learner.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (exam service, config).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let lesson_routes = Router::new()
        .route("/{lesson_id}/exam", get(exam::start_exam))
        .route("/{lesson_id}/submit", post(exam::submit_exam))
        .route("/{lesson_id}/result", get(exam::get_result))
        .route("/{lesson_id}/submissions", get(exam::get_history))
        .route("/{lesson_id}/statistics", get(statistics::get_statistics))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/lessons", lesson_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
