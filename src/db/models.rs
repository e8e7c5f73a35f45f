use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{ProductType, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) iin: String,
    pub(crate) email: String,
    pub(crate) hashed_password: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) school: Option<String>,
    pub(crate) phone_number: Option<String>,
    pub(crate) balance: i64,
    pub(crate) role: UserRole,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Product {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) price: i64,
    pub(crate) time_minutes: i32,
    pub(crate) subject_limit: i32,
    pub(crate) product_type: ProductType,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Test {
    pub(crate) id: String,
    pub(crate) product_id: String,
    pub(crate) title: String,
    pub(crate) question_count: i32,
    pub(crate) time_minutes: i32,
    pub(crate) grade: Option<i32>,
    pub(crate) is_required: bool,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Question {
    pub(crate) id: String,
    pub(crate) test_id: String,
    pub(crate) text: String,
    pub(crate) text2: Option<String>,
    pub(crate) text3: Option<String>,
    pub(crate) image: Option<String>,
    pub(crate) task_type: Option<i32>,
    pub(crate) level: Option<i32>,
    pub(crate) status: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) subcategory: Option<String>,
    pub(crate) theme: Option<String>,
    pub(crate) subtheme: Option<String>,
    pub(crate) source_text: Option<String>,
    pub(crate) in_use: bool,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct AnswerOption {
    pub(crate) id: String,
    pub(crate) question_id: String,
    pub(crate) text: String,
    pub(crate) image: Option<String>,
    pub(crate) is_correct: bool,
}

/// A row here means the user has a purchased attempt in flight.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct AttemptSession {
    pub(crate) user_id: String,
    pub(crate) product_id: String,
    pub(crate) started_at: PrimitiveDateTime,
    pub(crate) total_time_minutes: i32,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct CompletedTest {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) product_id: String,
    pub(crate) started_at: Option<PrimitiveDateTime>,
    pub(crate) completed_at: PrimitiveDateTime,
    pub(crate) time_spent_seconds: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct CompletedQuestion {
    pub(crate) id: String,
    pub(crate) completed_test_id: String,
    pub(crate) test_id: String,
    pub(crate) question_id: String,
    pub(crate) created_at: PrimitiveDateTime,
}
