use axum::{extract::State, routing::get, Json, Router};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::security;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::user::{ProfileUpdate, UserResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(get_profile).patch(update_profile))
}

async fn get_profile(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from_db(user))
}

async fn update_profile(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<UserResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let hashed = match payload.password.as_deref() {
        Some(password) => Some(
            security::hash_password(password)
                .map_err(|e| ApiError::internal(e, "Failed to hash password"))?,
        ),
        None => None,
    };

    let updated = repositories::users::update(
        state.db(),
        &user.id,
        repositories::users::UpdateUser {
            hashed_password: hashed.as_deref(),
            first_name: payload.first_name.as_deref(),
            last_name: payload.last_name.as_deref(),
            email: payload.email.as_deref(),
            telegram: payload.telegram.as_deref(),
            discord: payload.discord.as_deref(),
            ..Default::default()
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update profile"))?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from_db(updated)))
}
