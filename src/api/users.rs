use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentAdmin, CurrentUser};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::user::{BalanceCredit, BalanceResponse, ProfileUpdate, UserResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me).patch(update_me))
        .route("/:user_id/balance", post(credit_balance))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from_db(user))
}

async fn update_me(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<UserResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    repositories::users::update_profile(
        state.db(),
        &user.id,
        repositories::users::UpdateProfile {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            school: payload.school,
            phone_number: payload.phone_number,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update profile"))?;

    let updated = repositories::users::fetch_one_by_id(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated user"))?;

    Ok(Json(UserResponse::from_db(updated)))
}

/// Admin-side balance top-up, the counterpart of the attempt-start debit.
/// Both sides are single-statement arithmetic updates so they interleave
/// safely.
async fn credit_balance(
    Path(user_id): Path<String>,
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<BalanceCredit>,
) -> Result<Json<BalanceResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let balance = repositories::users::credit_balance(
        state.db(),
        &user_id,
        payload.amount,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to credit balance"))?;

    let Some(balance) = balance else {
        return Err(ApiError::NotFound("User not found".to_string()));
    };

    tracing::info!(
        admin_id = %admin.id,
        user_id = %user_id,
        amount = payload.amount,
        action = "balance_credit",
        "Admin credited balance"
    );

    Ok(Json(BalanceResponse { user_id, balance }))
}
