use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::db::types::UserRole;
use crate::repositories::{self, is_unique_violation};
use crate::schemas::mark::{MarkCreate, MarkResponse, MarkWithStudentResponse, MarksQuery};
use crate::services::visibility::{self, MarkDenied, MarkMutation};
use crate::services::{answer_files, storage::StorageService};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_marks).post(create_mark))
        .route("/:mark_id", patch(update_mark))
}

/// Marks filtered by the `lesson` query parameter. A missing or blank filter
/// yields an empty list rather than the whole table.
async fn list_marks(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<MarksQuery>,
) -> Result<Json<Vec<MarkWithStudentResponse>>, ApiError> {
    let lesson_id = match query.lesson.as_deref() {
        Some(lesson) if !lesson.trim().is_empty() => lesson.to_string(),
        _ => return Ok(Json(Vec::new())),
    };

    let rows = repositories::marks::list_by_lesson(state.db(), &lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list marks"))?;

    let mut responses = Vec::with_capacity(rows.len());
    for row in rows {
        let answer_url = answer_files::presigned_answer_url(&state, row.answer_key.as_deref()).await;
        responses.push(MarkWithStudentResponse::from_row(row, answer_url));
    }

    Ok(Json(responses))
}

async fn create_mark(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<MarkCreate>,
) -> Result<(StatusCode, Json<MarkResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let class = repositories::lessons::class_of_lesson(state.db(), &payload.lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load lesson class"))?
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;

    let allowed = user.role == UserRole::Admin
        || (user.role == UserRole::Teacher && class.teacher_id == user.id);
    if !allowed {
        return Err(ApiError::Forbidden("Not enough permissions for this lesson"));
    }

    let student = repositories::users::find_by_id(state.db(), &payload.student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load student"))?;
    if !matches!(student, Some(ref found) if found.role == UserRole::Student) {
        return Err(ApiError::BadRequest(
            "student_id must reference a user with the student role".to_string(),
        ));
    }

    let created = repositories::marks::insert(
        state.db(),
        repositories::marks::CreateMark {
            student_id: &payload.student_id,
            lesson_id: &payload.lesson_id,
            score: payload.score,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("Mark already exists for this student and lesson".to_string())
        } else {
            ApiError::internal(e, "Failed to create mark")
        }
    })?;

    Ok((StatusCode::CREATED, Json(MarkResponse::from_db(created, None))))
}

/// Multipart mutation carrying exactly one of a `score` text field or an
/// `answer` file field.
async fn update_mark(
    Path(mark_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<MarkResponse>, ApiError> {
    let fields = read_mutation_fields(&state, multipart).await?;

    let (mutation, score_text, answer) = match (fields.score, fields.answer) {
        (Some(score), None) => (MarkMutation::Score, Some(score), None),
        (None, Some(answer)) => (MarkMutation::Answer, None, Some(answer)),
        _ => {
            return Err(ApiError::BadRequest(
                "Provide exactly one of score or answer".to_string(),
            ))
        }
    };

    let mark = repositories::marks::find_by_id(state.db(), &mark_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load mark"))?
        .ok_or_else(|| ApiError::NotFound("Mark not found".to_string()))?;

    visibility::authorize_mark_mutation(&user, &mark.student_id, mutation).map_err(
        |denied| match denied {
            MarkDenied::NotOwned => ApiError::Forbidden("You can only modify your own mark"),
            MarkDenied::RoleNotAllowed => {
                ApiError::Forbidden("Not enough permissions for this mark")
            }
        },
    )?;

    let updated = match mutation {
        MarkMutation::Score => {
            let raw: i64 = score_text
                .as_deref()
                .unwrap_or_default()
                .trim()
                .parse()
                .map_err(|_| ApiError::BadRequest("score must be an integer".to_string()))?;
            let score = visibility::validate_score(raw).map_err(ApiError::BadRequest)?;

            repositories::marks::update_score(state.db(), &mark_id, score)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to update score"))?
        }
        MarkMutation::Answer => {
            let answer = answer.unwrap_or_default();
            let storage = state.storage().ok_or_else(|| {
                ApiError::ServiceUnavailable("S3 storage is not configured".to_string())
            })?;

            let key = upload_answer(storage, &mark_id, answer).await?;
            repositories::marks::update_answer_key(state.db(), &mark_id, &key)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to store answer key"))?
        }
    }
    .ok_or_else(|| ApiError::NotFound("Mark not found".to_string()))?;

    let answer_url = answer_files::presigned_answer_url(&state, updated.answer_key.as_deref()).await;
    Ok(Json(MarkResponse::from_db(updated, answer_url)))
}

#[derive(Default)]
struct MutationFields {
    score: Option<String>,
    answer: Option<AnswerUpload>,
}

#[derive(Default)]
struct AnswerUpload {
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
}

async fn read_mutation_fields(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<MutationFields, ApiError> {
    let max_bytes = state.settings().storage().max_upload_size_mb * 1024 * 1024;
    let mut fields = MutationFields::default();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart data".to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "score" {
            let text = field
                .text()
                .await
                .map_err(|_| ApiError::BadRequest("Invalid score field".to_string()))?;
            fields.score = Some(text);
        } else if name == "answer" {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();

            let mut bytes = Vec::new();
            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(|_| ApiError::BadRequest("Failed to read answer file".to_string()))?
            {
                let next_size = bytes.len() as u64 + chunk.len() as u64;
                if next_size > max_bytes {
                    return Err(ApiError::BadRequest(format!(
                        "File size exceeds {}MB limit",
                        state.settings().storage().max_upload_size_mb
                    )));
                }
                bytes.extend_from_slice(&chunk);
            }

            fields.answer = Some(AnswerUpload { filename, content_type, bytes });
        }
    }

    Ok(fields)
}

async fn upload_answer(
    storage: &StorageService,
    mark_id: &str,
    answer: AnswerUpload,
) -> Result<String, ApiError> {
    if answer.bytes.is_empty() {
        return Err(ApiError::BadRequest("Answer file is empty".to_string()));
    }

    let key = answer_files::answer_object_key(mark_id, &answer.filename);
    let (size, sha256) = storage
        .upload_bytes(&key, &answer.content_type, answer.bytes)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to upload answer file"))?;
    tracing::debug!(key = %key, size, sha256 = %sha256, "stored answer file");

    Ok(key)
}

#[cfg(test)]
mod tests;
