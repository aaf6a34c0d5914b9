use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::core::time::parse_wallclock;
use crate::db::models::User;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::lesson::{LessonCreate, LessonResponse};
use crate::schemas::mark::{MarkWithStudentResponse, RosterStudentResponse};
use crate::services::{answer_files, visibility};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::post(create_lesson))
        .route("/:lesson_id", get(get_lesson))
        .route("/:lesson_id/students", get(lesson_roster))
        .route("/:lesson_id/marks", get(lesson_marks))
}

async fn get_lesson(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(lesson_id): Path<String>,
) -> Result<Json<LessonResponse>, ApiError> {
    let lesson = repositories::lessons::find_by_id(state.db(), &lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load lesson"))?
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;

    let student_mark = own_score(&state, &user, &lesson.id).await?;
    Ok(Json(LessonResponse::from_db(lesson, student_mark)))
}

/// Enrolled students with marks and answer links. Everyone except the class
/// teacher gets an empty list rather than an error.
async fn lesson_roster(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(lesson_id): Path<String>,
) -> Result<Json<Vec<RosterStudentResponse>>, ApiError> {
    let Some(class) = repositories::lessons::class_of_lesson(state.db(), &lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load lesson class"))?
    else {
        return Ok(Json(Vec::new()));
    };

    if !visibility::can_view_roster(&user, &class.teacher_id) {
        return Ok(Json(Vec::new()));
    }

    let rows = repositories::marks::roster_for_lesson(state.db(), &lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load roster"))?;

    let mut responses = Vec::with_capacity(rows.len());
    for row in rows {
        let answer_url = answer_files::presigned_answer_url(&state, row.answer_key.as_deref()).await;
        responses.push(RosterStudentResponse::from_row(row, answer_url));
    }

    Ok(Json(responses))
}

async fn lesson_marks(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Path(lesson_id): Path<String>,
) -> Result<Json<Vec<MarkWithStudentResponse>>, ApiError> {
    let rows = repositories::marks::list_by_lesson(state.db(), &lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load marks"))?;

    let mut responses = Vec::with_capacity(rows.len());
    for row in rows {
        let answer_url = answer_files::presigned_answer_url(&state, row.answer_key.as_deref()).await;
        responses.push(MarkWithStudentResponse::from_row(row, answer_url));
    }

    Ok(Json(responses))
}

async fn create_lesson(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<LessonCreate>,
) -> Result<(StatusCode, Json<LessonResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let module = repositories::modules::find_by_id(state.db(), &payload.module_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load module"))?
        .ok_or_else(|| ApiError::NotFound("Module not found".to_string()))?;

    let class = repositories::classes::find_by_id(state.db(), &module.school_class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load class"))?
        .ok_or_else(|| ApiError::NotFound("Module not found".to_string()))?;

    let allowed = user.role == UserRole::Admin
        || (user.role == UserRole::Teacher && class.teacher_id == user.id);
    if !allowed {
        return Err(ApiError::Forbidden("Not enough permissions for this class"));
    }

    let start_time = payload
        .start_time
        .as_deref()
        .map(parse_wallclock)
        .transpose()
        .map_err(ApiError::BadRequest)?;
    let end_time = payload
        .end_time
        .as_deref()
        .map(parse_wallclock)
        .transpose()
        .map_err(ApiError::BadRequest)?;

    let created = repositories::lessons::insert(
        state.db(),
        repositories::lessons::CreateLesson {
            title: &payload.title,
            content: &payload.content,
            module_id: &payload.module_id,
            start_time,
            end_time,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create lesson"))?;

    let student_mark = own_score(&state, &user, &created.id).await?;
    Ok((StatusCode::CREATED, Json(LessonResponse::from_db(created, student_mark))))
}

/// The calling student's own score for a lesson; `None` for other roles.
pub(crate) async fn own_score(
    state: &AppState,
    actor: &User,
    lesson_id: &str,
) -> Result<Option<i16>, ApiError> {
    if actor.role != UserRole::Student {
        return Ok(None);
    }

    let mark = repositories::marks::find_for_student(state.db(), &actor.id, lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load mark"))?;

    Ok(mark.and_then(|m| m.score))
}

pub(crate) async fn lesson_responses_for(
    state: &AppState,
    actor: &User,
    module_id: &str,
) -> Result<Vec<LessonResponse>, ApiError> {
    let lessons = repositories::lessons::list_by_module(state.db(), module_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list lessons"))?;

    let mut responses = Vec::with_capacity(lessons.len());
    for lesson in lessons {
        let student_mark = own_score(state, actor, &lesson.id).await?;
        responses.push(LessonResponse::from_db(lesson, student_mark));
    }

    Ok(responses)
}

#[cfg(test)]
mod tests;
