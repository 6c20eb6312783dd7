// src/models/submission.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::question::{AnswerOption, Question};

/// Represents the 'answer_submissions' table in the database.
/// Rows are append-only; `correct` is copied from the chosen option when written.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AnswerSubmission {
    pub id: i64,
    pub attempt_id: i64,
    pub question_id: i64,
    pub chosen_option_id: i64,
    pub correct: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub attempt_id: i64,
    pub question_id: i64,
    pub chosen_option_id: i64,
    pub correct: bool,
    pub submitted_at: DateTime<Utc>,
}

/// DTO for submitting one answer within an attempt.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    #[validate(required(message = "chosenOptionId is required"), range(min = 1))]
    pub chosen_option_id: Option<i64>,
}

/// Denormalized view of a recorded submission.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub submission_id: i64,
    pub attempt_id: i64,
    pub question_id: i64,
    pub question_text: String,
    pub chosen_option_id: i64,
    pub chosen_option_text: String,
    pub correct: bool,
    pub created_at: DateTime<Utc>,
}

impl SubmissionResponse {
    pub fn new(submission: &AnswerSubmission, question: &Question, option: &AnswerOption) -> Self {
        Self {
            submission_id: submission.id,
            attempt_id: submission.attempt_id,
            question_id: question.id,
            question_text: question.question_text.clone(),
            chosen_option_id: option.id,
            chosen_option_text: option.text.clone(),
            correct: submission.correct,
            created_at: submission.created_at,
        }
    }
}
