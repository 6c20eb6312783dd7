// src/handlers/attempt.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        attempt::{AttemptResponse, StartAttemptRequest},
        result::QuizResultResponse,
        submission::{SubmissionResponse, SubmitAnswerRequest},
    },
    services::{AttemptService, ResultService},
};

/// Starts a new attempt on a published quiz.
#[utoipa::path(
    post,
    path = "/api/quiz-attempts/start",
    tag = "quiz-attempts",
    request_body = StartAttemptRequest,
    responses(
        (status = 201, description = "Attempt started", body = AttemptResponse),
        (status = 400, description = "quizId missing or invalid"),
        (status = 404, description = "Quiz not found"),
        (status = 409, description = "Quiz is not published")
    )
)]
pub async fn start_attempt(
    State(service): State<AttemptService>,
    Json(payload): Json<StartAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }
    let quiz_id = payload
        .quiz_id
        .ok_or_else(|| AppError::BadRequest("quizId is required".to_string()))?;

    let attempt = service.start_attempt(quiz_id, payload.student_id).await?;

    Ok((StatusCode::CREATED, Json(attempt)))
}

/// Records one answer for a question within an attempt.
#[utoipa::path(
    post,
    path = "/api/quiz-attempts/{attempt_id}/questions/{question_id}/submit-answer",
    tag = "quiz-attempts",
    params(
        ("attempt_id" = i64, Path, description = "Attempt id"),
        ("question_id" = i64, Path, description = "Question id")
    ),
    request_body = SubmitAnswerRequest,
    responses(
        (status = 200, description = "Answer recorded", body = SubmissionResponse),
        (status = 400, description = "chosenOptionId missing, or ids do not belong together"),
        (status = 404, description = "Attempt, question or answer option not found"),
        (status = 409, description = "Question already answered (reject policy) or write conflict")
    )
)]
pub async fn submit_answer(
    State(service): State<AttemptService>,
    Path((attempt_id, question_id)): Path<(i64, i64)>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }
    let chosen_option_id = payload
        .chosen_option_id
        .ok_or_else(|| AppError::BadRequest("chosenOptionId is required".to_string()))?;

    let submission = service
        .submit_answer(attempt_id, question_id, chosen_option_id)
        .await?;

    Ok(Json(submission))
}

/// Returns an attempt handle.
#[utoipa::path(
    get,
    path = "/api/quiz-attempts/{attempt_id}",
    tag = "quiz-attempts",
    params(("attempt_id" = i64, Path, description = "Attempt id")),
    responses(
        (status = 200, description = "Attempt found", body = AttemptResponse),
        (status = 404, description = "Attempt not found")
    )
)]
pub async fn get_attempt(
    State(service): State<AttemptService>,
    Path(attempt_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.get_attempt(attempt_id).await?))
}

/// Lists every answer recorded in an attempt.
#[utoipa::path(
    get,
    path = "/api/quiz-attempts/{attempt_id}/answers",
    tag = "quiz-attempts",
    params(("attempt_id" = i64, Path, description = "Attempt id")),
    responses(
        (status = 200, description = "Recorded answers, oldest first", body = [SubmissionResponse]),
        (status = 404, description = "Attempt not found")
    )
)]
pub async fn list_attempt_answers(
    State(service): State<AttemptService>,
    Path(attempt_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.list_attempt_answers(attempt_id).await?))
}

/// Per-question statistics across all attempts on a quiz.
#[utoipa::path(
    get,
    path = "/api/quiz-attempts/quizzes/{quiz_id}/results",
    tag = "quiz-attempts",
    params(("quiz_id" = i64, Path, description = "Quiz id")),
    responses(
        (status = 200, description = "Aggregated results", body = QuizResultResponse),
        (status = 404, description = "Quiz not found")
    )
)]
pub async fn get_quiz_results(
    State(service): State<ResultService>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.get_quiz_results(quiz_id).await?))
}
