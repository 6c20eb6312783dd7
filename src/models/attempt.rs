// src/models/attempt.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::quiz::Quiz;

/// Represents the 'quiz_attempts' table in the database.
/// An attempt is bound to its quiz once and never re-pointed.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Attempt {
    pub id: i64,
    pub quiz_id: i64,

    /// Opaque student reference, stored as given.
    pub student_id: Option<i64>,

    pub attempt_date: DateTime<Utc>,

    /// Reserved; nothing in this service computes it.
    pub score: Option<f32>,
}

/// Values for a new attempt row. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewAttempt {
    pub quiz_id: i64,
    pub student_id: Option<i64>,
    pub attempt_date: DateTime<Utc>,
}

/// DTO for starting a quiz attempt.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartAttemptRequest {
    #[validate(required(message = "quizId is required"), range(min = 1))]
    pub quiz_id: Option<i64>,
    pub student_id: Option<i64>,
}

/// Attempt handle returned to the client.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResponse {
    pub attempt_id: i64,
    pub quiz_id: i64,
    pub quiz_title: String,
    pub attempt_date: DateTime<Utc>,
    pub score: Option<f32>,
}

impl AttemptResponse {
    pub fn new(attempt: &Attempt, quiz: &Quiz) -> Self {
        Self {
            attempt_id: attempt.id,
            quiz_id: quiz.id,
            quiz_title: quiz.title.clone(),
            attempt_date: attempt.attempt_date,
            score: attempt.score,
        }
    }
}
