use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::core::security;
use crate::core::state::AppState;
use crate::repositories::{self, is_unique_violation};
use crate::schemas::user::{AdminUserCreate, AdminUserUpdate, UserListQuery, UserResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:user_id", get(get_user).patch(update_user))
}

async fn list_users(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = repositories::users::list(state.db(), query.role)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list users"))?;

    Ok(Json(users.into_iter().map(UserResponse::from_db).collect()))
}

async fn create_user(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<AdminUserCreate>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let hashed = security::hash_password(&payload.password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let created = repositories::users::insert(
        state.db(),
        repositories::users::CreateUser {
            username: &payload.username,
            hashed_password: &hashed,
            first_name: &payload.first_name,
            last_name: &payload.last_name,
            email: &payload.email,
            role: payload.role,
            telegram: payload.telegram.as_deref(),
            discord: payload.discord.as_deref(),
            is_active: payload.is_active,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("Username already taken".to_string())
        } else {
            ApiError::internal(e, "Failed to create user")
        }
    })?;

    Ok((StatusCode::CREATED, Json(UserResponse::from_db(created))))
}

async fn get_user(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = repositories::users::find_by_id(state.db(), &user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from_db(user)))
}

async fn update_user(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<AdminUserUpdate>,
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
        &user_id,
        repositories::users::UpdateUser {
            hashed_password: hashed.as_deref(),
            first_name: payload.first_name.as_deref(),
            last_name: payload.last_name.as_deref(),
            email: payload.email.as_deref(),
            role: payload.role,
            telegram: payload.telegram.as_deref(),
            discord: payload.discord.as_deref(),
            is_active: payload.is_active,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update user"))?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from_db(updated)))
}
