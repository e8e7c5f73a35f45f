use serde::Serialize;

use crate::core::time::format_primitive;
use crate::db::models::{Product, Test};
use crate::db::types::ProductType;

#[derive(Debug, Serialize)]
pub(crate) struct ProductResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) price: i64,
    pub(crate) time_minutes: i32,
    pub(crate) subject_limit: i32,
    pub(crate) product_type: ProductType,
    pub(crate) created_at: String,
}

impl ProductResponse {
    pub(crate) fn from_db(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            description: product.description,
            price: product.price,
            time_minutes: product.time_minutes,
            subject_limit: product.subject_limit,
            product_type: product.product_type,
            created_at: format_primitive(product.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TestSummary {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) question_count: i32,
    pub(crate) time_minutes: i32,
    pub(crate) grade: Option<i32>,
    pub(crate) is_required: bool,
}

impl TestSummary {
    pub(crate) fn from_db(test: Test) -> Self {
        Self {
            id: test.id,
            title: test.title,
            question_count: test.question_count,
            time_minutes: test.time_minutes,
            grade: test.grade,
            is_required: test.is_required,
        }
    }
}

/// Required tests grouped by grade mark (0, 4, 9).
#[derive(Debug, Serialize)]
pub(crate) struct GradeGroup {
    pub(crate) grade: i32,
    pub(crate) tests: Vec<TestSummary>,
}
