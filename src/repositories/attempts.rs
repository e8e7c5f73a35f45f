use crate::db::models::AttemptSession;

const COLUMNS: &str = "user_id, product_id, started_at, total_time_minutes, created_at";

pub(crate) struct CreateAttemptSession<'a> {
    pub(crate) user_id: &'a str,
    pub(crate) product_id: &'a str,
    pub(crate) started_at: time::PrimitiveDateTime,
    pub(crate) total_time_minutes: i32,
    pub(crate) created_at: time::PrimitiveDateTime,
}

/// Conditional insert: a user already InProgress keeps their session and the
/// insert reports false, which the caller surfaces as a conflict.
pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    session: CreateAttemptSession<'_>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO attempt_sessions (
            user_id, product_id, started_at, total_time_minutes, created_at
        ) VALUES ($1,$2,$3,$4,$5)
        ON CONFLICT DO NOTHING",
    )
    .bind(session.user_id)
    .bind(session.product_id)
    .bind(session.started_at)
    .bind(session.total_time_minutes)
    .bind(session.created_at)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Removes the user's session and hands back its row, so submission can read
/// the start timestamp and reset the state in one statement.
pub(crate) async fn delete_by_user(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: &str,
) -> Result<Option<AttemptSession>, sqlx::Error> {
    sqlx::query_as::<_, AttemptSession>(&format!(
        "DELETE FROM attempt_sessions WHERE user_id = $1 RETURNING {COLUMNS}"
    ))
    .bind(user_id)
    .fetch_optional(executor)
    .await
}
