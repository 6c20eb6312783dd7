// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'quizzes' table in the database.
/// Owned by the quiz CRUD layer; this service only reads it.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,
    pub title: String,

    /// Only published quizzes accept new attempts.
    pub published: bool,
}
