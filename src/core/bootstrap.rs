use sqlx::PgPool;

use crate::core::config::Settings;
use crate::core::security;
use crate::db::types::UserRole;
use crate::repositories::users::{self, CreateUser};

/// Creates the first admin account on startup when it does not exist yet.
pub(crate) async fn ensure_superuser(pool: &PgPool, settings: &Settings) -> anyhow::Result<()> {
    let admin = settings.admin();
    if admin.first_superuser_password.is_empty() {
        tracing::warn!("FIRST_SUPERUSER_PASSWORD is empty, skipping superuser bootstrap");
        return Ok(());
    }

    if users::find_by_username(pool, &admin.first_superuser_username).await?.is_some() {
        return Ok(());
    }

    let hashed = security::hash_password(&admin.first_superuser_password)?;
    let created = users::insert(
        pool,
        CreateUser {
            username: &admin.first_superuser_username,
            hashed_password: &hashed,
            first_name: "Admin",
            last_name: "",
            email: "",
            role: UserRole::Admin,
            telegram: None,
            discord: None,
            is_active: true,
        },
    )
    .await?;

    tracing::info!(username = %created.username, "created first superuser");
    Ok(())
}
