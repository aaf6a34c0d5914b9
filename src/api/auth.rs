use axum::{
    extract::State,
    routing::{get, post},
    Form, Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::security;
use crate::core::state::AppState;
use crate::db::models::User;
use crate::repositories;
use crate::schemas::auth::{LoginRequest, TokenForm, TokenResponse};
use crate::schemas::user::UserResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/token", post(token))
        .route("/me", get(me))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    issue_token(&state, &payload.username, &payload.password).await.map(Json)
}

/// OAuth2 password-grant compatible variant of `login`.
async fn token(
    State(state): State<AppState>,
    Form(payload): Form<TokenForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    issue_token(&state, &payload.username, &payload.password).await.map(Json)
}

async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from_db(user))
}

async fn issue_token(
    state: &AppState,
    username: &str,
    password: &str,
) -> Result<TokenResponse, ApiError> {
    let user = repositories::users::find_by_username(state.db(), username)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?;

    let Some(user) = user else {
        return Err(ApiError::Unauthorized("Incorrect username or password"));
    };

    if !verify(password, &user)? || !user.is_active {
        return Err(ApiError::Unauthorized("Incorrect username or password"));
    }

    let access_token = security::create_access_token(&user.id, state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    Ok(TokenResponse::bearer(access_token, UserResponse::from_db(user)))
}

fn verify(password: &str, user: &User) -> Result<bool, ApiError> {
    security::verify_password(password, &user.hashed_password)
        .map_err(|e| ApiError::internal(e, "Failed to verify password"))
}
