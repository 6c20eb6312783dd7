// src/routes.rs

use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    docs,
    handlers::{attempt, health},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Mounts the attempt, submission and results routes under `/api/quiz-attempts`.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (services and config).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            axum::http::HeaderValue::from_static("http://localhost:3000"),
            axum::http::HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let attempt_routes = Router::new()
        .route("/start", post(attempt::start_attempt))
        .route("/{attempt_id}", get(attempt::get_attempt))
        .route("/{attempt_id}/answers", get(attempt::list_attempt_answers))
        .route(
            "/{attempt_id}/questions/{question_id}/submit-answer",
            post(attempt::submit_answer),
        )
        .route("/quizzes/{quiz_id}/results", get(attempt::get_quiz_results));

    Router::new()
        .route("/api/health", get(health::health))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .nest("/api/quiz-attempts", attempt_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
