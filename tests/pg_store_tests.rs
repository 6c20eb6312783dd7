// tests/pg_store_tests.rs
//
// Runs the attempt and results flows against Postgres.
// Skipped unless DATABASE_URL points at a database the tests may write to.

use std::{sync::Arc, time::Duration};

use quiz_attempts::{
    config::{Config, ResubmissionPolicy, RetryConfig},
    error::{AppError, EntityKind},
    services::{AttemptService, ResultService},
    store::{PgStore, QuizStore},
};
use sqlx::{PgPool, postgres::PgPoolOptions};

struct PgFixture {
    pool: PgPool,
    attempts: AttemptService,
    results: ResultService,
}

/// Connects and migrates, or returns `None` when no database is configured.
async fn pg_fixture(policy: ResubmissionPolicy) -> Option<PgFixture> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping Postgres test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DATABASE_URL");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let config = Config {
        resubmission_policy: policy,
        write_retry: RetryConfig {
            max_attempts: 10,
            backoff: Duration::from_millis(10),
        },
        ..Config::default()
    };
    let store: Arc<dyn QuizStore> = Arc::new(PgStore::new(pool.clone()));

    Some(PgFixture {
        attempts: AttemptService::new(store.clone(), &config),
        results: ResultService::new(store),
        pool,
    })
}

async fn insert_quiz(pool: &PgPool, title: &str, published: bool) -> i64 {
    sqlx::query_scalar("INSERT INTO quizzes (title, published) VALUES ($1, $2) RETURNING id")
        .bind(title)
        .bind(published)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn insert_question(pool: &PgPool, quiz_id: i64, text: &str, difficulty: &str) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO questions (quiz_id, question_text, difficulty_level)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(quiz_id)
    .bind(text)
    .bind(difficulty)
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn insert_option(pool: &PgPool, question_id: i64, text: &str, is_correct: bool) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO answer_options (question_id, option_text, is_correct)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(question_id)
    .bind(text)
    .bind(is_correct)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Published quiz, one EASY question, options "2x" (correct) and "x".
/// Returns (quiz, question, right option, wrong option).
async fn derivative_quiz(pool: &PgPool) -> (i64, i64, i64, i64) {
    let quiz_id = insert_quiz(pool, "Derivatives", true).await;
    let question_id = insert_question(pool, quiz_id, "What is d/dx of x^2?", "EASY").await;
    let right = insert_option(pool, question_id, "2x", true).await;
    let wrong = insert_option(pool, question_id, "x", false).await;
    (quiz_id, question_id, right, wrong)
}

async fn count_rows(pool: &PgPool, sql: &str, id: i64) -> i64 {
    sqlx::query_scalar(sql).bind(id).fetch_one(pool).await.unwrap()
}

#[tokio::test]
async fn pg_correct_answer_is_aggregated() {
    let Some(fx) = pg_fixture(ResubmissionPolicy::Append).await else {
        return;
    };
    let (quiz_id, question_id, right, _) = derivative_quiz(&fx.pool).await;

    let attempt = fx.attempts.start_attempt(quiz_id, Some(1)).await.unwrap();
    let submission = fx
        .attempts
        .submit_answer(attempt.attempt_id, question_id, right)
        .await
        .unwrap();
    assert!(submission.correct);
    assert_eq!(submission.chosen_option_text, "2x");

    let results = fx.results.get_quiz_results(quiz_id).await.unwrap();
    assert_eq!(results.quiz_title, "Derivatives");
    assert_eq!(results.question_results.len(), 1);
    let row = &results.question_results[0];
    assert_eq!(row.question_id, question_id);
    assert_eq!(row.difficulty, "EASY");
    assert_eq!((row.total, row.correct, row.wrong), (1, 1, 0));
}

#[tokio::test]
async fn pg_unpublished_quiz_creates_no_attempt() {
    let Some(fx) = pg_fixture(ResubmissionPolicy::Append).await else {
        return;
    };
    let quiz_id = insert_quiz(&fx.pool, "Draft", false).await;

    let err = fx.attempts.start_attempt(quiz_id, Some(1)).await.unwrap_err();

    assert!(matches!(err, AppError::InvalidState(_)), "got {:?}", err);
    let attempts = count_rows(
        &fx.pool,
        "SELECT COUNT(*) FROM quiz_attempts WHERE quiz_id = $1",
        quiz_id,
    )
    .await;
    assert_eq!(attempts, 0);
}

#[tokio::test]
async fn pg_question_from_another_quiz_is_rejected() {
    let Some(fx) = pg_fixture(ResubmissionPolicy::Append).await else {
        return;
    };
    let (quiz_id, _, _, _) = derivative_quiz(&fx.pool).await;
    let (_, foreign_question, foreign_option, _) = derivative_quiz(&fx.pool).await;
    let attempt = fx.attempts.start_attempt(quiz_id, None).await.unwrap();

    let err = fx
        .attempts
        .submit_answer(attempt.attempt_id, foreign_question, foreign_option)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ConsistencyViolation(_)), "got {:?}", err);
    let submissions = count_rows(
        &fx.pool,
        "SELECT COUNT(*) FROM answer_submissions WHERE attempt_id = $1",
        attempt.attempt_id,
    )
    .await;
    assert_eq!(submissions, 0);
}

#[tokio::test]
async fn pg_results_count_every_attempt() {
    let Some(fx) = pg_fixture(ResubmissionPolicy::Append).await else {
        return;
    };
    let (quiz_id, question_id, right, wrong) = derivative_quiz(&fx.pool).await;

    for (student, option) in [(1, wrong), (2, wrong), (3, right)] {
        let attempt = fx.attempts.start_attempt(quiz_id, Some(student)).await.unwrap();
        fx.attempts
            .submit_answer(attempt.attempt_id, question_id, option)
            .await
            .unwrap();
    }

    let results = fx.results.get_quiz_results(quiz_id).await.unwrap();
    let row = &results.question_results[0];
    assert_eq!((row.total, row.correct, row.wrong), (3, 1, 2));
}

#[tokio::test]
async fn pg_quiz_without_questions_has_empty_results() {
    let Some(fx) = pg_fixture(ResubmissionPolicy::Append).await else {
        return;
    };
    let quiz_id = insert_quiz(&fx.pool, "Empty", true).await;

    let results = fx.results.get_quiz_results(quiz_id).await.unwrap();

    assert_eq!(results.quiz_id, quiz_id);
    assert!(results.question_results.is_empty());
}

#[tokio::test]
async fn pg_unknown_ids_are_not_found() {
    let Some(fx) = pg_fixture(ResubmissionPolicy::Append).await else {
        return;
    };

    let err = fx.results.get_quiz_results(-1).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(EntityKind::Quiz, -1)));

    let err = fx.attempts.submit_answer(-1, -2, -3).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(EntityKind::Attempt, -1)));
}

#[tokio::test]
async fn pg_reject_policy_records_one_answer_under_concurrency() {
    let Some(fx) = pg_fixture(ResubmissionPolicy::Reject).await else {
        return;
    };
    let (quiz_id, question_id, right, _) = derivative_quiz(&fx.pool).await;
    let attempt_id = fx.attempts.start_attempt(quiz_id, None).await.unwrap().attempt_id;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let attempts = fx.attempts.clone();
        handles.push(tokio::spawn(async move {
            attempts.submit_answer(attempt_id, question_id, right).await
        }));
    }

    let mut recorded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => recorded += 1,
            // Conflict only if a writer lost the race more often than the retry allows.
            Err(AppError::InvalidState(_)) | Err(AppError::Conflict(_)) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(recorded, 1);
    let rows = count_rows(
        &fx.pool,
        "SELECT COUNT(*) FROM answer_submissions WHERE attempt_id = $1",
        attempt_id,
    )
    .await;
    assert_eq!(rows, 1);
}
