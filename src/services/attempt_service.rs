// src/services/attempt_service.rs

use std::sync::Arc;

use chrono::Utc;

use super::retry::retry_on_conflict;
use crate::{
    config::{Config, ResubmissionPolicy, RetryConfig},
    error::{AppError, EntityKind},
    models::{
        attempt::{AttemptResponse, NewAttempt},
        submission::{NewSubmission, SubmissionResponse},
    },
    store::{QuizStore, SubmissionWrite},
};

/// Opens attempts and records answer submissions.
#[derive(Clone)]
pub struct AttemptService {
    store: Arc<dyn QuizStore>,
    resubmission: ResubmissionPolicy,
    retry: RetryConfig,
}

impl AttemptService {
    pub fn new(store: Arc<dyn QuizStore>, config: &Config) -> Self {
        Self {
            store,
            resubmission: config.resubmission_policy,
            retry: config.write_retry,
        }
    }

    /// Opens a new attempt on a published quiz.
    ///
    /// `student_id` is stored as given and never resolved.
    pub async fn start_attempt(
        &self,
        quiz_id: i64,
        student_id: Option<i64>,
    ) -> Result<AttemptResponse, AppError> {
        let quiz = self
            .store
            .find_quiz(quiz_id)
            .await?
            .ok_or(AppError::NotFound(EntityKind::Quiz, quiz_id))?;

        if !quiz.published {
            return Err(AppError::InvalidState(format!(
                "quiz {} is not published and cannot be attempted",
                quiz_id
            )));
        }

        let new_attempt = NewAttempt {
            quiz_id: quiz.id,
            student_id,
            attempt_date: Utc::now(),
        };

        let attempt = self.store.insert_attempt(new_attempt).await?;

        tracing::info!("Attempt {} started on quiz {}", attempt.id, quiz.id);

        Ok(AttemptResponse::new(&attempt, &quiz))
    }

    /// Validates one answer against the attempt's quiz and the question's options, then records it.
    ///
    /// Checks run in a fixed order: attempt, question and option must exist, the question
    /// must belong to the attempt's quiz, and the option must belong to the question.
    /// Under `ResubmissionPolicy::Reject` the store refuses a second answer atomically.
    pub async fn submit_answer(
        &self,
        attempt_id: i64,
        question_id: i64,
        chosen_option_id: i64,
    ) -> Result<SubmissionResponse, AppError> {
        let attempt = self
            .store
            .find_attempt(attempt_id)
            .await?
            .ok_or(AppError::NotFound(EntityKind::Attempt, attempt_id))?;

        let question = self
            .store
            .find_question(question_id)
            .await?
            .ok_or(AppError::NotFound(EntityKind::Question, question_id))?;

        let option = self
            .store
            .find_answer_option(chosen_option_id)
            .await?
            .ok_or(AppError::NotFound(EntityKind::AnswerOption, chosen_option_id))?;

        if question.quiz_id != attempt.quiz_id {
            tracing::warn!(
                "Question {} (quiz {}) submitted to attempt {} (quiz {})",
                question.id,
                question.quiz_id,
                attempt.id,
                attempt.quiz_id
            );
            return Err(AppError::ConsistencyViolation(
                "question not in attempt's quiz".to_string(),
            ));
        }

        if option.question_id != question.id {
            tracing::warn!(
                "Option {} (question {}) submitted for question {}",
                option.id,
                option.question_id,
                question.id
            );
            return Err(AppError::ConsistencyViolation(
                "option not in question".to_string(),
            ));
        }

        let new_submission = NewSubmission {
            attempt_id: attempt.id,
            question_id: question.id,
            chosen_option_id: option.id,
            correct: option.is_correct,
            submitted_at: Utc::now(),
        };

        let store = &self.store;
        let policy = self.resubmission;
        let write = retry_on_conflict(self.retry, "insert_submission", move || {
            store.insert_submission(new_submission.clone(), policy)
        })
        .await?;

        let submission = match write {
            SubmissionWrite::Recorded(submission) => submission,
            SubmissionWrite::AlreadyAnswered => {
                return Err(AppError::InvalidState(format!(
                    "question {} was already answered in attempt {}",
                    question.id, attempt.id
                )));
            }
        };

        tracing::info!(
            "Submission {} recorded for attempt {}, question {} (correct: {})",
            submission.id,
            attempt.id,
            question.id,
            submission.correct
        );

        Ok(SubmissionResponse::new(&submission, &question, &option))
    }

    /// Returns the handle of an existing attempt.
    pub async fn get_attempt(&self, attempt_id: i64) -> Result<AttemptResponse, AppError> {
        let attempt = self
            .store
            .find_attempt(attempt_id)
            .await?
            .ok_or(AppError::NotFound(EntityKind::Attempt, attempt_id))?;

        // An attempt cannot outlive its quiz in the schema, so a miss here is a broken store.
        let quiz = self.store.find_quiz(attempt.quiz_id).await?.ok_or_else(|| {
            AppError::InternalServerError(format!(
                "attempt {} references missing quiz {}",
                attempt.id, attempt.quiz_id
            ))
        })?;

        Ok(AttemptResponse::new(&attempt, &quiz))
    }

    /// Lists the recorded submissions of one attempt in the order they were made.
    pub async fn list_attempt_answers(
        &self,
        attempt_id: i64,
    ) -> Result<Vec<SubmissionResponse>, AppError> {
        let attempt = self
            .store
            .find_attempt(attempt_id)
            .await?
            .ok_or(AppError::NotFound(EntityKind::Attempt, attempt_id))?;

        let submissions = self.store.find_submissions_by_attempt(attempt.id).await?;

        let mut answers = Vec::with_capacity(submissions.len());
        for submission in &submissions {
            let question = self
                .store
                .find_question(submission.question_id)
                .await?
                .ok_or(AppError::NotFound(EntityKind::Question, submission.question_id))?;
            let option = self
                .store
                .find_answer_option(submission.chosen_option_id)
                .await?
                .ok_or(AppError::NotFound(
                    EntityKind::AnswerOption,
                    submission.chosen_option_id,
                ))?;
            answers.push(SubmissionResponse::new(submission, &question, &option));
        }

        Ok(answers)
    }
}
