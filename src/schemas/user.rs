use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::types::UserRole;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AdminUserCreate {
    #[validate(length(min = 1, message = "username must not be empty"))]
    pub(crate) username: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub(crate) password: String,
    #[serde(default)]
    #[serde(alias = "firstName")]
    pub(crate) first_name: String,
    #[serde(default)]
    #[serde(alias = "lastName")]
    pub(crate) last_name: String,
    #[serde(default)]
    pub(crate) email: String,
    #[serde(default = "default_user_role")]
    pub(crate) role: UserRole,
    #[serde(default)]
    pub(crate) telegram: Option<String>,
    #[serde(default)]
    pub(crate) discord: Option<String>,
    #[serde(default = "default_true")]
    #[serde(alias = "isActive")]
    pub(crate) is_active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AdminUserUpdate {
    #[serde(default)]
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub(crate) password: Option<String>,
    #[serde(default)]
    #[serde(alias = "firstName")]
    pub(crate) first_name: Option<String>,
    #[serde(default)]
    #[serde(alias = "lastName")]
    pub(crate) last_name: Option<String>,
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) role: Option<UserRole>,
    #[serde(default)]
    pub(crate) telegram: Option<String>,
    #[serde(default)]
    pub(crate) discord: Option<String>,
    #[serde(default)]
    #[serde(alias = "isActive")]
    pub(crate) is_active: Option<bool>,
}

/// Self-service profile update. Role and activity are deliberately absent.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ProfileUpdate {
    #[serde(default)]
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub(crate) password: Option<String>,
    #[serde(default)]
    #[serde(alias = "firstName")]
    pub(crate) first_name: Option<String>,
    #[serde(default)]
    #[serde(alias = "lastName")]
    pub(crate) last_name: Option<String>,
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) telegram: Option<String>,
    #[serde(default)]
    pub(crate) discord: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserListQuery {
    #[serde(default)]
    pub(crate) role: Option<UserRole>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) id: String,
    pub(crate) username: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    pub(crate) role: UserRole,
    pub(crate) telegram: Option<String>,
    pub(crate) discord: Option<String>,
    pub(crate) is_active: bool,
    pub(crate) created_at: String,
}

impl UserResponse {
    pub(crate) fn from_db(user: crate::db::models::User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
            telegram: user.telegram,
            discord: user.discord,
            is_active: user.is_active,
            created_at: format_primitive(user.created_at),
        }
    }
}

fn default_user_role() -> UserRole {
    UserRole::Student
}

fn default_true() -> bool {
    true
}
