// src/docs.rs

use axum::{Json, response::IntoResponse};
use utoipa::OpenApi;

use crate::{
    handlers::{attempt, health},
    models::{
        attempt::{AttemptResponse, StartAttemptRequest},
        question::Difficulty,
        result::{QuestionResult, QuizResultResponse},
        submission::{SubmissionResponse, SubmitAnswerRequest},
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        attempt::start_attempt,
        attempt::submit_answer,
        attempt::get_attempt,
        attempt::list_attempt_answers,
        attempt::get_quiz_results,
        health::health,
    ),
    components(schemas(
        StartAttemptRequest,
        AttemptResponse,
        SubmitAnswerRequest,
        SubmissionResponse,
        QuestionResult,
        QuizResultResponse,
        Difficulty,
    )),
    tags(
        (
            name = "quiz-attempts",
            description = "Quiz attempts, answer submissions and aggregated results"
        ),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// Serves the generated OpenAPI document.
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
