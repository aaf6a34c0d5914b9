use sqlx::PgPool;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::User;
use crate::db::types::UserRole;

const COLUMNS: &str = "id, username, hashed_password, first_name, last_name, email, role, \
                       telegram, discord, is_active, created_at, updated_at";

pub(crate) struct CreateUser<'a> {
    pub(crate) username: &'a str,
    pub(crate) hashed_password: &'a str,
    pub(crate) first_name: &'a str,
    pub(crate) last_name: &'a str,
    pub(crate) email: &'a str,
    pub(crate) role: UserRole,
    pub(crate) telegram: Option<&'a str>,
    pub(crate) discord: Option<&'a str>,
    pub(crate) is_active: bool,
}

#[derive(Default)]
pub(crate) struct UpdateUser<'a> {
    pub(crate) hashed_password: Option<&'a str>,
    pub(crate) first_name: Option<&'a str>,
    pub(crate) last_name: Option<&'a str>,
    pub(crate) email: Option<&'a str>,
    pub(crate) role: Option<UserRole>,
    pub(crate) telegram: Option<&'a str>,
    pub(crate) discord: Option<&'a str>,
    pub(crate) is_active: Option<bool>,
}

pub(crate) async fn insert(pool: &PgPool, params: CreateUser<'_>) -> Result<User, sqlx::Error> {
    let now = primitive_now_utc();
    let query = format!(
        "INSERT INTO users \
         (id, username, hashed_password, first_name, last_name, email, role, telegram, discord, \
          is_active, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11) \
         RETURNING {COLUMNS}"
    );

    sqlx::query_as::<_, User>(&query)
        .bind(Uuid::new_v4().to_string())
        .bind(params.username)
        .bind(params.hashed_password)
        .bind(params.first_name)
        .bind(params.last_name)
        .bind(params.email)
        .bind(params.role)
        .bind(params.telegram)
        .bind(params.discord)
        .bind(params.is_active)
        .bind(now)
        .fetch_one(pool)
        .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
    sqlx::query_as::<_, User>(&query).bind(id).fetch_optional(pool).await
}

pub(crate) async fn find_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
    sqlx::query_as::<_, User>(&query).bind(username).fetch_optional(pool).await
}

pub(crate) async fn list(
    pool: &PgPool,
    role: Option<UserRole>,
) -> Result<Vec<User>, sqlx::Error> {
    let query = format!(
        "SELECT {COLUMNS} FROM users \
         WHERE ($1::userrole IS NULL OR role = $1) \
         ORDER BY created_at, id"
    );
    sqlx::query_as::<_, User>(&query).bind(role).fetch_all(pool).await
}

/// Partial update. `None` fields keep their current value.
pub(crate) async fn update(
    pool: &PgPool,
    id: &str,
    params: UpdateUser<'_>,
) -> Result<Option<User>, sqlx::Error> {
    let now = primitive_now_utc();
    let query = format!(
        "UPDATE users SET \
         hashed_password = COALESCE($2, hashed_password), \
         first_name = COALESCE($3, first_name), \
         last_name = COALESCE($4, last_name), \
         email = COALESCE($5, email), \
         role = COALESCE($6, role), \
         telegram = COALESCE($7, telegram), \
         discord = COALESCE($8, discord), \
         is_active = COALESCE($9, is_active), \
         updated_at = $10 \
         WHERE id = $1 \
         RETURNING {COLUMNS}"
    );

    sqlx::query_as::<_, User>(&query)
        .bind(id)
        .bind(params.hashed_password)
        .bind(params.first_name)
        .bind(params.last_name)
        .bind(params.email)
        .bind(params.role)
        .bind(params.telegram)
        .bind(params.discord)
        .bind(params.is_active)
        .bind(now)
        .fetch_optional(pool)
        .await
}

