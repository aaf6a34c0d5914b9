use serde::{Deserialize, Serialize};

use crate::schemas::user::UserResponse;

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) username: String,
    pub(crate) password: String,
}

/// OAuth2 password-grant form body for `POST /auth/token`.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenForm {
    pub(crate) username: String,
    pub(crate) password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: String,
    pub(crate) token_type: String,
    pub(crate) user: UserResponse,
}

impl TokenResponse {
    pub(crate) fn bearer(access_token: String, user: UserResponse) -> Self {
        Self { access_token, token_type: "bearer".to_string(), user }
    }
}
