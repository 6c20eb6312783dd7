// src/services/result_service.rs

use std::{collections::HashMap, sync::Arc};

use crate::{
    error::{AppError, EntityKind},
    models::{
        question::{Difficulty, Question},
        result::{QuestionResult, QuizResultResponse},
        submission::AnswerSubmission,
    },
    store::QuizStore,
};

/// Aggregates recorded submissions into per-question statistics.
#[derive(Clone)]
pub struct ResultService {
    store: Arc<dyn QuizStore>,
}

impl ResultService {
    pub fn new(store: Arc<dyn QuizStore>) -> Self {
        Self { store }
    }

    /// Builds the all-time, all-students result summary of a quiz.
    ///
    /// Publication state is not checked. Every question of the quiz gets an entry,
    /// including questions nobody has answered yet.
    pub async fn get_quiz_results(&self, quiz_id: i64) -> Result<QuizResultResponse, AppError> {
        let quiz = self
            .store
            .find_quiz(quiz_id)
            .await?
            .ok_or(AppError::NotFound(EntityKind::Quiz, quiz_id))?;

        let questions = self.store.find_questions_by_quiz(quiz.id).await?;
        if questions.is_empty() {
            return Ok(QuizResultResponse {
                quiz_id: quiz.id,
                quiz_title: quiz.title,
                question_results: Vec::new(),
            });
        }

        let question_ids: Vec<i64> = questions.iter().map(|q| q.id).collect();
        let submissions = self.store.find_submissions_by_questions(&question_ids).await?;

        let mut attempt_ids: Vec<i64> = submissions.iter().map(|s| s.attempt_id).collect();
        attempt_ids.sort_unstable();
        attempt_ids.dedup();

        let attempt_quiz: HashMap<i64, i64> = self
            .store
            .find_attempts_by_ids(&attempt_ids)
            .await?
            .into_iter()
            .map(|a| (a.id, a.quiz_id))
            .collect();

        let question_results = aggregate(quiz.id, &questions, &submissions, &attempt_quiz);

        tracing::debug!(
            "Aggregated {} submissions over {} questions for quiz {}",
            submissions.len(),
            questions.len(),
            quiz.id
        );

        Ok(QuizResultResponse {
            quiz_id: quiz.id,
            quiz_title: quiz.title,
            question_results,
        })
    }
}

#[derive(Default, Clone, Copy)]
struct Tally {
    total: u64,
    correct: u64,
}

/// Reduces submissions into one `QuestionResult` per question, in `questions` order.
///
/// Submissions whose attempt is not bound to `quiz_id` (or whose attempt is unknown)
/// are ignored.
pub fn aggregate(
    quiz_id: i64,
    questions: &[Question],
    submissions: &[AnswerSubmission],
    attempt_quiz: &HashMap<i64, i64>,
) -> Vec<QuestionResult> {
    let mut tallies: HashMap<i64, Tally> = HashMap::new();

    for submission in submissions
        .iter()
        .filter(|s| attempt_quiz.get(&s.attempt_id) == Some(&quiz_id))
    {
        let tally = tallies.entry(submission.question_id).or_default();
        tally.total += 1;
        if submission.correct {
            tally.correct += 1;
        }
    }

    questions
        .iter()
        .map(|question| {
            let tally = tallies.get(&question.id).copied().unwrap_or_default();
            QuestionResult {
                question_id: question.id,
                question_text: question.question_text.clone(),
                difficulty: Difficulty::label(question.difficulty),
                total: tally.total,
                correct: tally.correct,
                wrong: tally.total - tally.correct,
            }
        })
        .collect()
}
