use sqlx::PgPool;

use crate::db::models::{AnswerOption, Question};

const COLUMNS: &str = "\
    id, test_id, text, text2, text3, image, task_type, level, status, \
    category, subcategory, theme, subtheme, source_text, in_use, created_at";

const OPTION_COLUMNS: &str = "id, question_id, text, image, is_correct";

pub(crate) async fn list_for_test(
    pool: &PgPool,
    test_id: &str,
    include_unused: bool,
) -> Result<Vec<Question>, sqlx::Error> {
    let filter = if include_unused { "" } else { " AND in_use = TRUE" };
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {COLUMNS} FROM questions WHERE test_id = $1{filter} ORDER BY created_at"
    ))
    .bind(test_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_options_for_questions(
    pool: &PgPool,
    question_ids: &[String],
) -> Result<Vec<AnswerOption>, sqlx::Error> {
    sqlx::query_as::<_, AnswerOption>(&format!(
        "SELECT {OPTION_COLUMNS} FROM answer_options WHERE question_id = ANY($1)"
    ))
    .bind(question_ids)
    .fetch_all(pool)
    .await
}

pub(crate) async fn exists_in_test(
    executor: impl sqlx::PgExecutor<'_>,
    question_id: &str,
    test_id: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM questions WHERE id = $1 AND test_id = $2)",
    )
    .bind(question_id)
    .bind(test_id)
    .fetch_one(executor)
    .await
}

pub(crate) async fn option_exists_in_question(
    executor: impl sqlx::PgExecutor<'_>,
    option_id: &str,
    question_id: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM answer_options WHERE id = $1 AND question_id = $2)",
    )
    .bind(option_id)
    .bind(question_id)
    .fetch_one(executor)
    .await
}
