use sqlx::{FromRow, PgPool};

use crate::db::models::CompletedTest;
use crate::services::scoring::ScoredQuestion;

const COLUMNS: &str =
    "id, user_id, product_id, started_at, completed_at, time_spent_seconds";

pub(crate) struct CreateCompletedTest<'a> {
    pub(crate) id: &'a str,
    pub(crate) user_id: &'a str,
    pub(crate) product_id: &'a str,
    pub(crate) started_at: Option<time::PrimitiveDateTime>,
    pub(crate) completed_at: time::PrimitiveDateTime,
    pub(crate) time_spent_seconds: i64,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateCompletedTest<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO completed_tests (
            id, user_id, product_id, started_at, completed_at, time_spent_seconds
        ) VALUES ($1,$2,$3,$4,$5,$6)",
    )
    .bind(params.id)
    .bind(params.user_id)
    .bind(params.product_id)
    .bind(params.started_at)
    .bind(params.completed_at)
    .bind(params.time_spent_seconds)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) async fn link_test(
    executor: impl sqlx::PgExecutor<'_>,
    completed_test_id: &str,
    test_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO completed_test_links (completed_test_id, test_id) VALUES ($1,$2)
         ON CONFLICT DO NOTHING",
    )
    .bind(completed_test_id)
    .bind(test_id)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) struct CreateCompletedQuestion<'a> {
    pub(crate) id: &'a str,
    pub(crate) completed_test_id: &'a str,
    pub(crate) test_id: &'a str,
    pub(crate) question_id: &'a str,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create_question(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateCompletedQuestion<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO completed_questions (
            id, completed_test_id, test_id, question_id, created_at
        ) VALUES ($1,$2,$3,$4,$5)",
    )
    .bind(params.id)
    .bind(params.completed_test_id)
    .bind(params.test_id)
    .bind(params.question_id)
    .bind(params.created_at)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) async fn link_option(
    executor: impl sqlx::PgExecutor<'_>,
    completed_question_id: &str,
    option_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO completed_question_options (completed_question_id, option_id)
         VALUES ($1,$2)
         ON CONFLICT DO NOTHING",
    )
    .bind(completed_question_id)
    .bind(option_id)
    .execute(executor)
    .await?;
    Ok(())
}

/// Owner-scoped lookup; a foreign caller sees no row at all.
pub(crate) async fn find_by_id_for_user(
    pool: &PgPool,
    id: &str,
    user_id: &str,
) -> Result<Option<CompletedTest>, sqlx::Error> {
    sqlx::query_as::<_, CompletedTest>(&format!(
        "SELECT {COLUMNS} FROM completed_tests WHERE id = $1 AND user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_by_user(
    pool: &PgPool,
    user_id: &str,
    skip: i64,
    limit: i64,
) -> Result<Vec<CompletedTest>, sqlx::Error> {
    sqlx::query_as::<_, CompletedTest>(&format!(
        "SELECT {COLUMNS} FROM completed_tests
         WHERE user_id = $1
         ORDER BY completed_at DESC
         OFFSET $2 LIMIT $3"
    ))
    .bind(user_id)
    .bind(skip.max(0))
    .bind(limit.clamp(1, 1000))
    .fetch_all(pool)
    .await
}

pub(crate) async fn count_by_user(pool: &PgPool, user_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM completed_tests WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

/// Correctness is read live from the current option flags; there is no
/// snapshot taken at submission time.
pub(crate) async fn scored_questions(
    pool: &PgPool,
    completed_test_id: &str,
) -> Result<Vec<ScoredQuestion>, sqlx::Error> {
    sqlx::query_as::<_, ScoredQuestion>(
        "SELECT cq.test_id,
                EXISTS(
                    SELECT 1
                    FROM completed_question_options cqo
                    JOIN answer_options ao ON ao.id = cqo.option_id
                    WHERE cqo.completed_question_id = cq.id
                      AND ao.is_correct
                ) AS correct
         FROM completed_questions cq
         WHERE cq.completed_test_id = $1
         ORDER BY cq.created_at, cq.id",
    )
    .bind(completed_test_id)
    .fetch_all(pool)
    .await
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct AttemptTotals {
    pub(crate) completed_test_id: String,
    pub(crate) total: i64,
    pub(crate) correct: i64,
}

pub(crate) async fn totals_for_attempts(
    pool: &PgPool,
    completed_test_ids: &[String],
) -> Result<Vec<AttemptTotals>, sqlx::Error> {
    sqlx::query_as::<_, AttemptTotals>(
        "SELECT cq.completed_test_id,
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE EXISTS(
                    SELECT 1
                    FROM completed_question_options cqo
                    JOIN answer_options ao ON ao.id = cqo.option_id
                    WHERE cqo.completed_question_id = cq.id
                      AND ao.is_correct
                )) AS correct
         FROM completed_questions cq
         WHERE cq.completed_test_id = ANY($1)
         GROUP BY cq.completed_test_id",
    )
    .bind(completed_test_ids)
    .fetch_all(pool)
    .await
}
