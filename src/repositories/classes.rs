use sqlx::PgPool;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::SchoolClass;

const COLUMNS: &str = "id, name, teacher_id, is_active, created_at, updated_at";

pub(crate) struct CreateClass<'a> {
    pub(crate) name: &'a str,
    pub(crate) teacher_id: &'a str,
    pub(crate) is_active: bool,
}

#[derive(Default)]
pub(crate) struct UpdateClass<'a> {
    pub(crate) name: Option<&'a str>,
    pub(crate) teacher_id: Option<&'a str>,
    pub(crate) is_active: Option<bool>,
}

pub(crate) async fn insert(
    pool: &PgPool,
    params: CreateClass<'_>,
) -> Result<SchoolClass, sqlx::Error> {
    let now = primitive_now_utc();
    let query = format!(
        "INSERT INTO classes (id, name, teacher_id, is_active, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $5) \
         RETURNING {COLUMNS}"
    );

    sqlx::query_as::<_, SchoolClass>(&query)
        .bind(Uuid::new_v4().to_string())
        .bind(params.name)
        .bind(params.teacher_id)
        .bind(params.is_active)
        .bind(now)
        .fetch_one(pool)
        .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<SchoolClass>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM classes WHERE id = $1");
    sqlx::query_as::<_, SchoolClass>(&query).bind(id).fetch_optional(pool).await
}

pub(crate) async fn list_all(pool: &PgPool) -> Result<Vec<SchoolClass>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM classes ORDER BY created_at, id");
    sqlx::query_as::<_, SchoolClass>(&query).fetch_all(pool).await
}

pub(crate) async fn update(
    pool: &PgPool,
    id: &str,
    params: UpdateClass<'_>,
) -> Result<Option<SchoolClass>, sqlx::Error> {
    let now = primitive_now_utc();
    let query = format!(
        "UPDATE classes SET \
         name = COALESCE($2, name), \
         teacher_id = COALESCE($3, teacher_id), \
         is_active = COALESCE($4, is_active), \
         updated_at = $5 \
         WHERE id = $1 \
         RETURNING {COLUMNS}"
    );

    sqlx::query_as::<_, SchoolClass>(&query)
        .bind(id)
        .bind(params.name)
        .bind(params.teacher_id)
        .bind(params.is_active)
        .bind(now)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM classes WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

/// Idempotent: enrolling an already enrolled student is a no-op.
pub(crate) async fn enroll(
    pool: &PgPool,
    class_id: &str,
    student_id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO class_students (class_id, student_id, enrolled_at) \
         VALUES ($1, $2, $3) \
         ON CONFLICT (class_id, student_id) DO NOTHING",
    )
    .bind(class_id)
    .bind(student_id)
    .bind(primitive_now_utc())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub(crate) async fn is_enrolled(
    pool: &PgPool,
    class_id: &str,
    student_id: &str,
) -> Result<bool, sqlx::Error> {
    let row: Option<(i32,)> = sqlx::query_as(
        "SELECT 1 FROM class_students WHERE class_id = $1 AND student_id = $2",
    )
    .bind(class_id)
    .bind(student_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.is_some())
}
