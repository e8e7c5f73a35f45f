use std::collections::HashMap;

use axum::{extract::State, routing::post, Json, Router};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{AnswerOption, Test};
use crate::repositories;
use crate::schemas::attempt::{
    DeliveredOption, DeliveredQuestion, DeliveredTest, StartAttemptRequest,
    StartAttemptResponse, SubmitAttemptRequest, SubmitAttemptResponse,
};
use crate::services::question_selector;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/start", post(start_attempt)).route("/submit", post(submit_attempt))
}

/// Idle -> InProgress. One transaction covers the session insert and the
/// balance debit so a refused start leaves both untouched.
async fn start_attempt(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<StartAttemptRequest>,
) -> Result<Json<StartAttemptResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let product = repositories::products::find_by_id(state.db(), &payload.product_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch product"))?;

    let Some(product) = product else {
        return Err(ApiError::NotFound("Product not found".to_string()));
    };

    let tests = repositories::tests::list_by_ids_in_product(
        state.db(),
        &product.id,
        &payload.test_ids,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to fetch tests"))?;

    for test_id in &payload.test_ids {
        if !tests.iter().any(|test| &test.id == test_id) {
            return Err(ApiError::NotFound(format!("Test not found: {test_id}")));
        }
    }

    let allotted_time: i32 = tests.iter().map(|test| test.time_minutes).sum();
    let now = primitive_now_utc();

    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to open transaction"))?;

    let inserted = repositories::attempts::create(
        &mut *tx,
        repositories::attempts::CreateAttemptSession {
            user_id: &user.id,
            product_id: &product.id,
            started_at: now,
            total_time_minutes: allotted_time,
            created_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create attempt session"))?;

    if !inserted {
        return Err(ApiError::Conflict("An attempt is already in progress".to_string()));
    }

    let debited = repositories::users::debit_balance_if_sufficient(
        &mut *tx,
        &user.id,
        product.price,
        now,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to debit balance"))?;

    if !debited {
        return Err(ApiError::InsufficientBalance(
            "Balance is insufficient for this product".to_string(),
        ));
    }

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit attempt start"))?;

    tracing::info!(
        user_id = %user.id,
        product_id = %product.id,
        allotted_time,
        action = "attempt_start",
        "Attempt started"
    );

    let delivered = assemble_delivery(&state, tests).await?;

    Ok(Json(StartAttemptResponse { allotted_time, started: true, tests: delivered }))
}

async fn assemble_delivery(
    state: &AppState,
    tests: Vec<Test>,
) -> Result<Vec<DeliveredTest>, ApiError> {
    // StdRng rather than the thread-local rng: the handle lives across the
    // repository awaits, so it has to be Send.
    let mut rng = StdRng::from_entropy();
    let mut delivered = Vec::with_capacity(tests.len());

    for test in tests {
        let pool = repositories::questions::list_for_test(state.db(), &test.id, false)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list questions"))?;

        let target = test.question_count.max(0) as usize;
        let selected = question_selector::select_questions(pool, target, false, &mut rng);

        let question_ids: Vec<String> =
            selected.iter().map(|question| question.id.clone()).collect();
        let options =
            repositories::questions::list_options_for_questions(state.db(), &question_ids)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to list answer options"))?;

        let mut by_question: HashMap<String, Vec<AnswerOption>> = HashMap::new();
        for option in options {
            by_question.entry(option.question_id.clone()).or_default().push(option);
        }

        let questions = selected
            .into_iter()
            .map(|question| {
                let mut options = by_question.remove(&question.id).unwrap_or_default();
                // Option order is shuffled independently per question.
                options.shuffle(&mut rng);
                let options = options.into_iter().map(DeliveredOption::from_db).collect();
                DeliveredQuestion::from_db(question, options)
            })
            .collect();

        delivered.push(DeliveredTest::from_db(test, questions));
    }

    Ok(delivered)
}

/// InProgress -> Idle. The transcript writes and the session reset share one
/// transaction; any referential violation aborts the whole call.
async fn submit_attempt(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<SubmitAttemptRequest>,
) -> Result<Json<SubmitAttemptResponse>, ApiError> {
    let product = repositories::products::find_by_id(state.db(), &payload.product_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch product"))?;

    let Some(product) = product else {
        return Err(ApiError::NotFound("Product not found".to_string()));
    };

    validate_submission(&state, &product.id, &payload).await?;

    let now = primitive_now_utc();
    let completed_test_id = Uuid::new_v4().to_string();

    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to open transaction"))?;

    let session = repositories::attempts::delete_by_user(&mut *tx, &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to close attempt session"))?;

    // No session on record means the attempt never properly started;
    // elapsed time falls back to zero instead of failing.
    let started_at = session.as_ref().map(|session| session.started_at);
    let time_spent_seconds = started_at
        .map(|started| (now - started).whole_seconds().max(0))
        .unwrap_or(0);

    repositories::completed_tests::create(
        &mut *tx,
        repositories::completed_tests::CreateCompletedTest {
            id: &completed_test_id,
            user_id: &user.id,
            product_id: &product.id,
            started_at,
            completed_at: now,
            time_spent_seconds,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create completed test"))?;

    for test in &payload.tests {
        repositories::completed_tests::link_test(&mut *tx, &completed_test_id, &test.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to link test"))?;

        for question in &test.questions {
            let completed_question_id = Uuid::new_v4().to_string();
            repositories::completed_tests::create_question(
                &mut *tx,
                repositories::completed_tests::CreateCompletedQuestion {
                    id: &completed_question_id,
                    completed_test_id: &completed_test_id,
                    test_id: &test.id,
                    question_id: &question.id,
                    created_at: now,
                },
            )
            .await
            .map_err(|e| ApiError::internal(e, "Failed to create completed question"))?;

            for option_id in &question.option_ids {
                repositories::completed_tests::link_option(
                    &mut *tx,
                    &completed_question_id,
                    option_id,
                )
                .await
                .map_err(|e| ApiError::internal(e, "Failed to link selected option"))?;
            }
        }
    }

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit submission"))?;

    tracing::info!(
        user_id = %user.id,
        product_id = %product.id,
        completed_test_id = %completed_test_id,
        time_spent_seconds,
        action = "attempt_submit",
        "Attempt submitted"
    );

    Ok(Json(SubmitAttemptResponse {
        completed_test_id,
        time_spent_minutes: minutes_from_seconds(time_spent_seconds),
    }))
}

fn minutes_from_seconds(seconds: i64) -> f64 {
    (seconds as f64 / 60.0 * 100.0).round() / 100.0
}

/// Referential integrity pass: test in product, question in test, option in
/// question. The first violation aborts the call naming the offending id.
async fn validate_submission(
    state: &AppState,
    product_id: &str,
    payload: &SubmitAttemptRequest,
) -> Result<(), ApiError> {
    for test in &payload.tests {
        let test_ok = repositories::tests::exists_in_product(state.db(), &test.id, product_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to validate test"))?;
        if !test_ok {
            return Err(ApiError::NotFound(format!("Test not found: {}", test.id)));
        }

        for question in &test.questions {
            let question_ok =
                repositories::questions::exists_in_test(state.db(), &question.id, &test.id)
                    .await
                    .map_err(|e| ApiError::internal(e, "Failed to validate question"))?;
            if !question_ok {
                return Err(ApiError::NotFound(format!(
                    "Question not found: {}",
                    question.id
                )));
            }

            for option_id in &question.option_ids {
                let option_ok = repositories::questions::option_exists_in_question(
                    state.db(),
                    option_id,
                    &question.id,
                )
                .await
                .map_err(|e| ApiError::internal(e, "Failed to validate option"))?;
                if !option_ok {
                    return Err(ApiError::NotFound(format!("Option not found: {option_id}")));
                }
            }
        }
    }

    Ok(())
}
