use sqlx::PgPool;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::Module;

const COLUMNS: &str = "id, title, description, school_class_id, created_at, updated_at";

pub(crate) struct CreateModule<'a> {
    pub(crate) title: &'a str,
    pub(crate) description: &'a str,
    pub(crate) school_class_id: &'a str,
}

pub(crate) async fn insert(
    pool: &PgPool,
    params: CreateModule<'_>,
) -> Result<Module, sqlx::Error> {
    let now = primitive_now_utc();
    let query = format!(
        "INSERT INTO modules (id, title, description, school_class_id, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $5) \
         RETURNING {COLUMNS}"
    );

    sqlx::query_as::<_, Module>(&query)
        .bind(Uuid::new_v4().to_string())
        .bind(params.title)
        .bind(params.description)
        .bind(params.school_class_id)
        .bind(now)
        .fetch_one(pool)
        .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Module>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM modules WHERE id = $1");
    sqlx::query_as::<_, Module>(&query).bind(id).fetch_optional(pool).await
}

/// Modules of every class taught by the given teacher.
pub(crate) async fn list_for_teacher(
    pool: &PgPool,
    teacher_id: &str,
) -> Result<Vec<Module>, sqlx::Error> {
    sqlx::query_as::<_, Module>(
        "SELECT m.id, m.title, m.description, m.school_class_id, m.created_at, m.updated_at \
         FROM modules m \
         JOIN classes c ON c.id = m.school_class_id \
         WHERE c.teacher_id = $1 \
         ORDER BY m.created_at, m.id",
    )
    .bind(teacher_id)
    .fetch_all(pool)
    .await
}

/// Modules of every class the given student is enrolled in.
pub(crate) async fn list_for_student(
    pool: &PgPool,
    student_id: &str,
) -> Result<Vec<Module>, sqlx::Error> {
    sqlx::query_as::<_, Module>(
        "SELECT m.id, m.title, m.description, m.school_class_id, m.created_at, m.updated_at \
         FROM modules m \
         JOIN class_students cs ON cs.class_id = m.school_class_id \
         WHERE cs.student_id = $1 \
         ORDER BY m.created_at, m.id",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM modules WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
