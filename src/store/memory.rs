// src/store/memory.rs

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{QuizStore, SubmissionWrite};
use crate::{
    config::ResubmissionPolicy,
    error::AppError,
    models::{
        attempt::{Attempt, NewAttempt},
        question::{AnswerOption, Difficulty, Question},
        quiz::Quiz,
        submission::{AnswerSubmission, NewSubmission},
    },
};

#[derive(Default)]
struct Tables {
    next_id: i64,
    quizzes: BTreeMap<i64, Quiz>,
    questions: BTreeMap<i64, Question>,
    options: BTreeMap<i64, AnswerOption>,
    attempts: BTreeMap<i64, Attempt>,
    submissions: BTreeMap<i64, AnswerSubmission>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Arena-backed store used by the test-suite and by runs without `DATABASE_URL`.
///
/// Ids come from one shared counter, so ids are unique across entity kinds.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_quiz(&self, title: &str, published: bool) -> Quiz {
        let mut tables = self.tables.write().await;
        let quiz = Quiz {
            id: tables.allocate_id(),
            title: title.to_string(),
            published,
        };
        tables.quizzes.insert(quiz.id, quiz.clone());
        quiz
    }

    /// Flips the publication flag of an existing quiz. Returns `false` if the quiz is unknown.
    pub async fn set_published(&self, quiz_id: i64, published: bool) -> bool {
        let mut tables = self.tables.write().await;
        match tables.quizzes.get_mut(&quiz_id) {
            Some(quiz) => {
                quiz.published = published;
                true
            }
            None => false,
        }
    }

    pub async fn add_question(
        &self,
        quiz_id: i64,
        text: &str,
        difficulty: Option<Difficulty>,
    ) -> Question {
        let mut tables = self.tables.write().await;
        let question = Question {
            id: tables.allocate_id(),
            quiz_id,
            question_text: text.to_string(),
            difficulty,
        };
        tables.questions.insert(question.id, question.clone());
        question
    }

    pub async fn add_answer_option(
        &self,
        question_id: i64,
        text: &str,
        is_correct: bool,
    ) -> AnswerOption {
        let mut tables = self.tables.write().await;
        let option = AnswerOption {
            id: tables.allocate_id(),
            question_id,
            text: text.to_string(),
            is_correct,
        };
        tables.options.insert(option.id, option.clone());
        option
    }

    /// Number of attempts recorded so far, across all quizzes.
    pub async fn attempt_count(&self) -> usize {
        self.tables.read().await.attempts.len()
    }
}

#[async_trait]
impl QuizStore for MemoryStore {
    async fn find_quiz(&self, id: i64) -> Result<Option<Quiz>, AppError> {
        Ok(self.tables.read().await.quizzes.get(&id).cloned())
    }

    async fn find_question(&self, id: i64) -> Result<Option<Question>, AppError> {
        Ok(self.tables.read().await.questions.get(&id).cloned())
    }

    async fn find_answer_option(&self, id: i64) -> Result<Option<AnswerOption>, AppError> {
        Ok(self.tables.read().await.options.get(&id).cloned())
    }

    async fn find_attempt(&self, id: i64) -> Result<Option<Attempt>, AppError> {
        Ok(self.tables.read().await.attempts.get(&id).cloned())
    }

    async fn find_questions_by_quiz(&self, quiz_id: i64) -> Result<Vec<Question>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .values()
            .filter(|q| q.quiz_id == quiz_id)
            .cloned()
            .collect())
    }

    async fn find_attempts_by_ids(&self, ids: &[i64]) -> Result<Vec<Attempt>, AppError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.attempts.get(id))
            .cloned()
            .collect())
    }

    async fn find_submissions_by_attempt(
        &self,
        attempt_id: i64,
    ) -> Result<Vec<AnswerSubmission>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .submissions
            .values()
            .filter(|s| s.attempt_id == attempt_id)
            .cloned()
            .collect())
    }

    async fn find_submissions_by_questions(
        &self,
        question_ids: &[i64],
    ) -> Result<Vec<AnswerSubmission>, AppError> {
        let wanted: HashSet<i64> = question_ids.iter().copied().collect();
        let tables = self.tables.read().await;
        Ok(tables
            .submissions
            .values()
            .filter(|s| wanted.contains(&s.question_id))
            .cloned()
            .collect())
    }

    async fn insert_attempt(&self, attempt: NewAttempt) -> Result<Attempt, AppError> {
        let mut tables = self.tables.write().await;
        let attempt = Attempt {
            id: tables.allocate_id(),
            quiz_id: attempt.quiz_id,
            student_id: attempt.student_id,
            attempt_date: attempt.attempt_date,
            score: None,
        };
        tables.attempts.insert(attempt.id, attempt.clone());
        Ok(attempt)
    }

    async fn insert_submission(
        &self,
        submission: NewSubmission,
        policy: ResubmissionPolicy,
    ) -> Result<SubmissionWrite, AppError> {
        // Check and insert under one write lock.
        let mut tables = self.tables.write().await;

        if policy == ResubmissionPolicy::Reject
            && tables.submissions.values().any(|s| {
                s.attempt_id == submission.attempt_id && s.question_id == submission.question_id
            })
        {
            return Ok(SubmissionWrite::AlreadyAnswered);
        }

        let submission = AnswerSubmission {
            id: tables.allocate_id(),
            attempt_id: submission.attempt_id,
            question_id: submission.question_id,
            chosen_option_id: submission.chosen_option_id,
            correct: submission.correct,
            created_at: submission.submitted_at,
            updated_at: submission.submitted_at,
        };
        tables.submissions.insert(submission.id, submission.clone());
        Ok(SubmissionWrite::Recorded(submission))
    }
}
