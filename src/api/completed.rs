use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::pagination::{default_limit, PaginatedResponse};
use crate::core::state::AppState;
use crate::core::time::format_primitive;
use crate::repositories;
use crate::schemas::completed::{CompletedTestDetail, CompletedTestSummary};
use crate::services::scoring;

#[derive(Debug, Deserialize)]
pub(crate) struct CompletedListQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_completed_tests))
        .route("/:completed_test_id", get(get_completed_test))
}

async fn list_completed_tests(
    Query(params): Query<CompletedListQuery>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<PaginatedResponse<CompletedTestSummary>>, ApiError> {
    let records = repositories::completed_tests::list_by_user(
        state.db(),
        &user.id,
        params.skip,
        params.limit,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list completed tests"))?;

    let total_count = repositories::completed_tests::count_by_user(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count completed tests"))?;

    let ids: Vec<String> = records.iter().map(|record| record.id.clone()).collect();
    let totals = repositories::completed_tests::totals_for_attempts(state.db(), &ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to score completed tests"))?;

    let by_attempt: HashMap<String, (i64, i64)> = totals
        .into_iter()
        .map(|row| (row.completed_test_id, (row.total, row.correct)))
        .collect();

    let items = records
        .into_iter()
        .map(|record| {
            let (total, correct) =
                by_attempt.get(&record.id).copied().unwrap_or((0, 0));
            CompletedTestSummary::from_db(record, total, correct)
        })
        .collect();

    Ok(Json(PaginatedResponse::new(items, total_count, params.skip, params.limit)))
}

/// Scoped to the caller: a transcript owned by someone else reads as absent.
async fn get_completed_test(
    Path(completed_test_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<CompletedTestDetail>, ApiError> {
    let record = repositories::completed_tests::find_by_id_for_user(
        state.db(),
        &completed_test_id,
        &user.id,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to fetch completed test"))?;

    let Some(record) = record else {
        return Err(ApiError::NotFound("Completed test not found".to_string()));
    };

    let rows = repositories::completed_tests::scored_questions(state.db(), &record.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to score completed test"))?;

    let score = scoring::aggregate(&rows);

    Ok(Json(CompletedTestDetail {
        id: record.id,
        product_id: record.product_id,
        started_at: record.started_at.map(format_primitive),
        completed_at: format_primitive(record.completed_at),
        time_spent_seconds: record.time_spent_seconds,
        per_test: score.per_test,
        total_correct: score.total_correct,
        total_incorrect: score.total_incorrect,
        total_questions: score.total_questions,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use crate::db::types::UserRole;
    use crate::test_support;

    #[tokio::test]
    async fn completed_test_of_another_user_reads_as_absent() {
        let Some(ctx) = test_support::test_context().await else { return };

        let (owner, owner_token) =
            test_support::create_user(&ctx, "111111111111", 0, UserRole::Student).await;
        let (_other, other_token) =
            test_support::create_user(&ctx, "222222222222", 0, UserRole::Student).await;
        let product_id = test_support::seed_product(&ctx, 1500).await;
        let completed_id =
            test_support::seed_completed_test(&ctx, &owner.id, &product_id).await;

        let uri = format!("/api/v1/completed-tests/{completed_id}");

        let denied = ctx
            .app
            .clone()
            .oneshot(test_support::get_request(&uri, &other_token))
            .await
            .expect("response");
        assert_eq!(denied.status(), StatusCode::NOT_FOUND);

        let allowed = ctx
            .app
            .clone()
            .oneshot(test_support::get_request(&uri, &owner_token))
            .await
            .expect("response");
        assert_eq!(allowed.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn listing_only_shows_own_transcripts() {
        let Some(ctx) = test_support::test_context().await else { return };

        let (owner, _owner_token) =
            test_support::create_user(&ctx, "111111111111", 0, UserRole::Student).await;
        let (_other, other_token) =
            test_support::create_user(&ctx, "222222222222", 0, UserRole::Student).await;
        let product_id = test_support::seed_product(&ctx, 1500).await;
        test_support::seed_completed_test(&ctx, &owner.id, &product_id).await;

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::get_request("/api/v1/completed-tests", &other_token))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = test_support::response_json(response).await;
        assert_eq!(body["total_count"], 0);
        assert!(body["items"].as_array().expect("items").is_empty());
    }
}
