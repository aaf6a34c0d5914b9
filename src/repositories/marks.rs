use sqlx::{FromRow, PgPool};
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::Mark;

const COLUMNS: &str =
    "id, student_id, lesson_id, score, answer_key, created_at, updated_at";

const JOINED_COLUMNS: &str =
    "mk.id, mk.student_id, mk.lesson_id, mk.score, mk.answer_key, mk.created_at, mk.updated_at, \
     u.username AS student_username, u.first_name AS student_first_name, \
     u.last_name AS student_last_name";

pub(crate) struct CreateMark<'a> {
    pub(crate) student_id: &'a str,
    pub(crate) lesson_id: &'a str,
    pub(crate) score: Option<i16>,
}

/// A mark row joined with the identifying fields of its student.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct MarkWithStudent {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) lesson_id: String,
    pub(crate) score: Option<i16>,
    pub(crate) answer_key: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
    pub(crate) student_username: String,
    pub(crate) student_first_name: String,
    pub(crate) student_last_name: String,
}

/// One student of a lesson's class with their mark for that lesson, if any.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct RosterRow {
    pub(crate) student_id: String,
    pub(crate) username: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) mark_id: Option<String>,
    pub(crate) score: Option<i16>,
    pub(crate) answer_key: Option<String>,
}

pub(crate) async fn insert(pool: &PgPool, params: CreateMark<'_>) -> Result<Mark, sqlx::Error> {
    let now = primitive_now_utc();
    let query = format!(
        "INSERT INTO marks (id, student_id, lesson_id, score, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $5) \
         RETURNING {COLUMNS}"
    );

    sqlx::query_as::<_, Mark>(&query)
        .bind(Uuid::new_v4().to_string())
        .bind(params.student_id)
        .bind(params.lesson_id)
        .bind(params.score)
        .bind(now)
        .fetch_one(pool)
        .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Mark>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM marks WHERE id = $1");
    sqlx::query_as::<_, Mark>(&query).bind(id).fetch_optional(pool).await
}

pub(crate) async fn find_for_student(
    pool: &PgPool,
    student_id: &str,
    lesson_id: &str,
) -> Result<Option<Mark>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM marks WHERE student_id = $1 AND lesson_id = $2");
    sqlx::query_as::<_, Mark>(&query)
        .bind(student_id)
        .bind(lesson_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn update_score(
    pool: &PgPool,
    id: &str,
    score: i16,
) -> Result<Option<Mark>, sqlx::Error> {
    let query = format!(
        "UPDATE marks SET score = $2, updated_at = $3 WHERE id = $1 RETURNING {COLUMNS}"
    );

    sqlx::query_as::<_, Mark>(&query)
        .bind(id)
        .bind(score)
        .bind(primitive_now_utc())
        .fetch_optional(pool)
        .await
}

pub(crate) async fn update_answer_key(
    pool: &PgPool,
    id: &str,
    answer_key: &str,
) -> Result<Option<Mark>, sqlx::Error> {
    let query = format!(
        "UPDATE marks SET answer_key = $2, updated_at = $3 WHERE id = $1 RETURNING {COLUMNS}"
    );

    sqlx::query_as::<_, Mark>(&query)
        .bind(id)
        .bind(answer_key)
        .bind(primitive_now_utc())
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_by_lesson(
    pool: &PgPool,
    lesson_id: &str,
) -> Result<Vec<MarkWithStudent>, sqlx::Error> {
    let query = format!(
        "SELECT {JOINED_COLUMNS} FROM marks mk \
         JOIN users u ON u.id = mk.student_id \
         WHERE mk.lesson_id = $1 \
         ORDER BY u.last_name, u.first_name, mk.id"
    );

    sqlx::query_as::<_, MarkWithStudent>(&query).bind(lesson_id).fetch_all(pool).await
}

/// Every student enrolled in the lesson's class, left-joined with their mark
/// for that lesson.
pub(crate) async fn roster_for_lesson(
    pool: &PgPool,
    lesson_id: &str,
) -> Result<Vec<RosterRow>, sqlx::Error> {
    sqlx::query_as::<_, RosterRow>(
        "SELECT u.id AS student_id, u.username, u.first_name, u.last_name, \
                mk.id AS mark_id, mk.score, mk.answer_key \
         FROM class_students cs \
         JOIN users u ON u.id = cs.student_id \
         JOIN modules m ON m.school_class_id = cs.class_id \
         JOIN lessons l ON l.module_id = m.id AND l.id = $1 \
         LEFT JOIN marks mk ON mk.lesson_id = l.id AND mk.student_id = u.id \
         ORDER BY u.last_name, u.first_name, u.id",
    )
    .bind(lesson_id)
    .fetch_all(pool)
    .await
}
