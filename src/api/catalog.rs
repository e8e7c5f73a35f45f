use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentAdmin, CurrentUser};
use crate::api::pagination::default_limit;
use crate::core::state::AppState;
use crate::db::models::{AnswerOption, Question};
use crate::db::types::ProductType;
use crate::repositories;
use crate::schemas::catalog::{GradeGroup, ProductResponse, TestSummary};
use crate::services::question_selector;

/// Grade marks that carry required tests.
const REQUIRED_GRADES: [i32; 3] = [0, 4, 9];

#[derive(Debug, Deserialize)]
pub(crate) struct ProductListQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    #[serde(alias = "productType")]
    product_type: Option<ProductType>,
}

pub(crate) fn products_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/:product_id", get(get_product))
        .route("/:product_id/tests", get(list_required_tests))
}

pub(crate) fn tests_router() -> Router<AppState> {
    Router::new().route("/:test_id/questions", get(preview_questions))
}

async fn list_products(
    Query(params): Query<ProductListQuery>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products =
        repositories::products::list(state.db(), params.product_type, params.skip, params.limit)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list products"))?;

    Ok(Json(products.into_iter().map(ProductResponse::from_db).collect()))
}

async fn get_product(
    Path(product_id): Path<String>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = repositories::products::find_by_id(state.db(), &product_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch product"))?;

    let Some(product) = product else {
        return Err(ApiError::NotFound("Product not found".to_string()));
    };

    Ok(Json(ProductResponse::from_db(product)))
}

async fn list_required_tests(
    Path(product_id): Path<String>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<GradeGroup>>, ApiError> {
    let product = repositories::products::find_by_id(state.db(), &product_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch product"))?;

    if product.is_none() {
        return Err(ApiError::NotFound("Product not found".to_string()));
    }

    let tests =
        repositories::tests::list_by_grades(state.db(), &product_id, &REQUIRED_GRADES[..])
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list required tests"))?;

    let mut groups: Vec<GradeGroup> = REQUIRED_GRADES
        .iter()
        .map(|grade| GradeGroup { grade: *grade, tests: Vec::new() })
        .collect();

    for test in tests {
        let Some(grade) = test.grade else {
            continue;
        };
        if let Some(group) = groups.iter_mut().find(|group| group.grade == grade) {
            group.tests.push(TestSummary::from_db(test));
        }
    }

    Ok(Json(groups))
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionPreview {
    #[serde(flatten)]
    pub(crate) question: Question,
    pub(crate) options: Vec<AnswerOption>,
}

/// Full-pool preview for audit: unfiltered, unsampled, stored option order.
async fn preview_questions(
    Path(test_id): Path<String>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<QuestionPreview>>, ApiError> {
    let test = repositories::tests::find_by_id(state.db(), &test_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch test"))?;

    if test.is_none() {
        return Err(ApiError::NotFound("Test not found".to_string()));
    }

    let pool = repositories::questions::list_for_test(state.db(), &test_id, true)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list questions"))?;

    let mut rng = StdRng::from_entropy();
    let questions = question_selector::select_questions(pool, 0, true, &mut rng);

    let question_ids: Vec<String> =
        questions.iter().map(|question| question.id.clone()).collect();
    let options =
        repositories::questions::list_options_for_questions(state.db(), &question_ids)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list answer options"))?;

    let mut by_question: HashMap<String, Vec<AnswerOption>> = HashMap::new();
    for option in options {
        by_question.entry(option.question_id.clone()).or_default().push(option);
    }

    let previews = questions
        .into_iter()
        .map(|question| {
            let options = by_question.remove(&question.id).unwrap_or_default();
            QuestionPreview { question, options }
        })
        .collect();

    Ok(Json(previews))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use crate::db::types::UserRole;
    use crate::test_support;

    #[tokio::test]
    async fn required_tests_group_by_grade_not_by_flag() {
        let Some(ctx) = test_support::test_context().await else { return };

        let (_user, token) =
            test_support::create_user(&ctx, "111111111111", 0, UserRole::Student).await;
        let product_id = test_support::seed_product(&ctx, 1500).await;

        // Grade decides membership; the is_required flag does not.
        let reading_id =
            test_support::seed_test(&ctx, &product_id, "Reading", 40, 60, Some(4), false).await;
        let algebra_id =
            test_support::seed_test(&ctx, &product_id, "Algebra", 40, 60, Some(9), true).await;
        test_support::seed_test(&ctx, &product_id, "Practice", 10, 20, None, true).await;

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::get_request(
                &format!("/api/v1/products/{product_id}/tests"),
                &token,
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = test_support::response_json(response).await;
        let groups = body.as_array().expect("groups");
        assert_eq!(groups.len(), 3);

        let group = |grade: i64| {
            groups.iter().find(|group| group["grade"] == grade).expect("grade group")
        };

        assert!(group(0)["tests"].as_array().expect("tests").is_empty());

        let grade_four: Vec<&str> = group(4)["tests"]
            .as_array()
            .expect("tests")
            .iter()
            .map(|test| test["id"].as_str().expect("id"))
            .collect();
        assert_eq!(grade_four, vec![reading_id.as_str()]);

        let grade_nine: Vec<&str> = group(9)["tests"]
            .as_array()
            .expect("tests")
            .iter()
            .map(|test| test["id"].as_str().expect("id"))
            .collect();
        assert_eq!(grade_nine, vec![algebra_id.as_str()]);
    }
}
