use serde::Serialize;

use crate::core::time::format_primitive;
use crate::db::models::CompletedTest;
use crate::services::scoring::TestBreakdown;

#[derive(Debug, Serialize)]
pub(crate) struct CompletedTestDetail {
    pub(crate) id: String,
    pub(crate) product_id: String,
    pub(crate) started_at: Option<String>,
    pub(crate) completed_at: String,
    pub(crate) time_spent_seconds: i64,
    pub(crate) per_test: Vec<TestBreakdown>,
    pub(crate) total_correct: i64,
    pub(crate) total_incorrect: i64,
    pub(crate) total_questions: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct CompletedTestSummary {
    pub(crate) id: String,
    pub(crate) product_id: String,
    pub(crate) completed_at: String,
    pub(crate) time_spent_seconds: i64,
    pub(crate) total_questions: i64,
    pub(crate) correct_answers: i64,
}

impl CompletedTestSummary {
    pub(crate) fn from_db(record: CompletedTest, total: i64, correct: i64) -> Self {
        Self {
            id: record.id,
            product_id: record.product_id,
            completed_at: format_primitive(record.completed_at),
            time_spent_seconds: record.time_spent_seconds,
            total_questions: total,
            correct_answers: correct,
        }
    }
}
