// src/store/mod.rs

//! Data-access boundary for the attempt and results operations.
//!
//! Entities reference each other only through id fields, so every
//! cross-entity check in the services is a plain id comparison.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

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

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Result of a guarded submission write.
#[derive(Debug)]
pub enum SubmissionWrite {
    Recorded(AnswerSubmission),
    /// Nothing written: under `ResubmissionPolicy::Reject` the attempt
    /// already answered the question.
    AlreadyAnswered,
}

#[async_trait]
pub trait QuizStore: Send + Sync {
    async fn find_quiz(&self, id: i64) -> Result<Option<Quiz>, AppError>;

    async fn find_question(&self, id: i64) -> Result<Option<Question>, AppError>;

    async fn find_answer_option(&self, id: i64) -> Result<Option<AnswerOption>, AppError>;

    async fn find_attempt(&self, id: i64) -> Result<Option<Attempt>, AppError>;

    /// Questions of a quiz, ordered by id.
    async fn find_questions_by_quiz(&self, quiz_id: i64) -> Result<Vec<Question>, AppError>;

    /// Attempts whose id is in `ids`. Unknown ids are skipped.
    async fn find_attempts_by_ids(&self, ids: &[i64]) -> Result<Vec<Attempt>, AppError>;

    /// Submissions of one attempt, ordered by id.
    async fn find_submissions_by_attempt(
        &self,
        attempt_id: i64,
    ) -> Result<Vec<AnswerSubmission>, AppError>;

    /// Submissions answering any of `question_ids`.
    async fn find_submissions_by_questions(
        &self,
        question_ids: &[i64],
    ) -> Result<Vec<AnswerSubmission>, AppError>;

    async fn insert_attempt(&self, attempt: NewAttempt) -> Result<Attempt, AppError>;

    /// Records a submission. The duplicate check for `policy` and the insert are atomic.
    async fn insert_submission(
        &self,
        submission: NewSubmission,
        policy: ResubmissionPolicy,
    ) -> Result<SubmissionWrite, AppError>;
}
