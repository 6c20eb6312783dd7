// src/models/result.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-question statistics over every submission ever recorded for the quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question_id: i64,
    pub question_text: String,

    /// "EASY", "MEDIUM", "HARD" or "N/A".
    pub difficulty: String,

    pub total: u64,
    pub correct: u64,
    pub wrong: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultResponse {
    pub quiz_id: i64,
    pub quiz_title: String,
    pub question_results: Vec<QuestionResult>,
}
