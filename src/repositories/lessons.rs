use sqlx::PgPool;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::{Lesson, SchoolClass};

const COLUMNS: &str =
    "id, title, content, module_id, start_time, end_time, created_at, updated_at";

pub(crate) struct CreateLesson<'a> {
    pub(crate) title: &'a str,
    pub(crate) content: &'a str,
    pub(crate) module_id: &'a str,
    pub(crate) start_time: Option<PrimitiveDateTime>,
    pub(crate) end_time: Option<PrimitiveDateTime>,
}

pub(crate) async fn insert(
    pool: &PgPool,
    params: CreateLesson<'_>,
) -> Result<Lesson, sqlx::Error> {
    let now = primitive_now_utc();
    let query = format!(
        "INSERT INTO lessons \
         (id, title, content, module_id, start_time, end_time, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $7) \
         RETURNING {COLUMNS}"
    );

    sqlx::query_as::<_, Lesson>(&query)
        .bind(Uuid::new_v4().to_string())
        .bind(params.title)
        .bind(params.content)
        .bind(params.module_id)
        .bind(params.start_time)
        .bind(params.end_time)
        .bind(now)
        .fetch_one(pool)
        .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Lesson>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM lessons WHERE id = $1");
    sqlx::query_as::<_, Lesson>(&query).bind(id).fetch_optional(pool).await
}

pub(crate) async fn list_by_module(
    pool: &PgPool,
    module_id: &str,
) -> Result<Vec<Lesson>, sqlx::Error> {
    let query = format!(
        "SELECT {COLUMNS} FROM lessons WHERE module_id = $1 ORDER BY start_time NULLS LAST, id"
    );
    sqlx::query_as::<_, Lesson>(&query).bind(module_id).fetch_all(pool).await
}

/// The class a lesson belongs to, through its module.
pub(crate) async fn class_of_lesson(
    pool: &PgPool,
    lesson_id: &str,
) -> Result<Option<SchoolClass>, sqlx::Error> {
    sqlx::query_as::<_, SchoolClass>(
        "SELECT c.id, c.name, c.teacher_id, c.is_active, c.created_at, c.updated_at \
         FROM classes c \
         JOIN modules m ON m.school_class_id = c.id \
         JOIN lessons l ON l.module_id = m.id \
         WHERE l.id = $1",
    )
    .bind(lesson_id)
    .fetch_optional(pool)
    .await
}
