// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use super::{QuizStore, SubmissionWrite};
use crate::{
    config::ResubmissionPolicy,
    error::AppError,
    models::{
        attempt::{Attempt, NewAttempt},
        question::{AnswerOption, Question},
        quiz::Quiz,
        submission::{AnswerSubmission, NewSubmission},
    },
};

/// Helper struct for reading questions; difficulty is stored as free text.
#[derive(FromRow)]
struct QuestionRow {
    id: i64,
    quiz_id: i64,
    question_text: String,
    difficulty_level: Option<String>,
}

impl From<QuestionRow> for Question {
    fn from(row: QuestionRow) -> Self {
        let difficulty = row.difficulty_level.as_deref().and_then(|raw| {
            raw.parse()
                .map_err(|e| tracing::warn!("Question {} has {}", row.id, e))
                .ok()
        });

        Question {
            id: row.id,
            quiz_id: row.quiz_id,
            question_text: row.question_text,
            difficulty,
        }
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuizStore for PgStore {
    async fn find_quiz(&self, id: i64) -> Result<Option<Quiz>, AppError> {
        let quiz =
            sqlx::query_as::<_, Quiz>("SELECT id, title, published FROM quizzes WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(quiz)
    }

    async fn find_question(&self, id: i64) -> Result<Option<Question>, AppError> {
        let row = sqlx::query_as::<_, QuestionRow>(
            "SELECT id, quiz_id, question_text, difficulty_level FROM questions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Question::from))
    }

    async fn find_answer_option(&self, id: i64) -> Result<Option<AnswerOption>, AppError> {
        let option = sqlx::query_as::<_, AnswerOption>(
            "SELECT id, question_id, option_text, is_correct FROM answer_options WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(option)
    }

    async fn find_attempt(&self, id: i64) -> Result<Option<Attempt>, AppError> {
        let attempt = sqlx::query_as::<_, Attempt>(
            "SELECT id, quiz_id, student_id, attempt_date, score FROM quiz_attempts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(attempt)
    }

    async fn find_questions_by_quiz(&self, quiz_id: i64) -> Result<Vec<Question>, AppError> {
        let rows = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, quiz_id, question_text, difficulty_level
            FROM questions
            WHERE quiz_id = $1
            ORDER BY id
            "#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Question::from).collect())
    }

    async fn find_attempts_by_ids(&self, ids: &[i64]) -> Result<Vec<Attempt>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let attempts = sqlx::query_as::<_, Attempt>(
            r#"
            SELECT id, quiz_id, student_id, attempt_date, score
            FROM quiz_attempts
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(attempts)
    }

    async fn find_submissions_by_attempt(
        &self,
        attempt_id: i64,
    ) -> Result<Vec<AnswerSubmission>, AppError> {
        let submissions = sqlx::query_as::<_, AnswerSubmission>(
            r#"
            SELECT id, attempt_id, question_id, chosen_option_id, correct, created_at, updated_at
            FROM answer_submissions
            WHERE attempt_id = $1
            ORDER BY id
            "#,
        )
        .bind(attempt_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(submissions)
    }

    async fn find_submissions_by_questions(
        &self,
        question_ids: &[i64],
    ) -> Result<Vec<AnswerSubmission>, AppError> {
        if question_ids.is_empty() {
            return Ok(Vec::new());
        }
        let submissions = sqlx::query_as::<_, AnswerSubmission>(
            r#"
            SELECT id, attempt_id, question_id, chosen_option_id, correct, created_at, updated_at
            FROM answer_submissions
            WHERE question_id = ANY($1)
            "#,
        )
        .bind(question_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(submissions)
    }

    async fn insert_attempt(&self, attempt: NewAttempt) -> Result<Attempt, AppError> {
        let attempt = sqlx::query_as::<_, Attempt>(
            r#"
            INSERT INTO quiz_attempts (quiz_id, student_id, attempt_date)
            VALUES ($1, $2, $3)
            RETURNING id, quiz_id, student_id, attempt_date, score
            "#,
        )
        .bind(attempt.quiz_id)
        .bind(attempt.student_id)
        .bind(attempt.attempt_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(attempt)
    }

    async fn insert_submission(
        &self,
        submission: NewSubmission,
        policy: ResubmissionPolicy,
    ) -> Result<SubmissionWrite, AppError> {
        // The duplicate check and the insert share one serializable transaction;
        // a racing writer fails with 40001, which maps to `AppError::Conflict`.
        let mut tx = self.pool.begin().await?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;

        if policy == ResubmissionPolicy::Reject {
            let answered: bool = sqlx::query_scalar(
                r#"
                SELECT EXISTS (
                    SELECT 1 FROM answer_submissions
                    WHERE attempt_id = $1 AND question_id = $2
                )
                "#,
            )
            .bind(submission.attempt_id)
            .bind(submission.question_id)
            .fetch_one(&mut *tx)
            .await?;

            if answered {
                tx.rollback().await?;
                return Ok(SubmissionWrite::AlreadyAnswered);
            }
        }

        let submission = sqlx::query_as::<_, AnswerSubmission>(
            r#"
            INSERT INTO answer_submissions
                (attempt_id, question_id, chosen_option_id, correct, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, attempt_id, question_id, chosen_option_id, correct, created_at, updated_at
            "#,
        )
        .bind(submission.attempt_id)
        .bind(submission.question_id)
        .bind(submission.chosen_option_id)
        .bind(submission.correct)
        .bind(submission.submitted_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(SubmissionWrite::Recorded(submission))
    }
}
