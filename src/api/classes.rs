use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::core::state::AppState;
use crate::db::types::UserRole;
use crate::repositories::{self, is_unique_violation};
use crate::schemas::class::{ClassCreate, ClassResponse, ClassUpdate, EnrollRequest};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_classes).post(create_class))
        .route("/:class_id", axum::routing::patch(update_class).delete(delete_class))
        .route("/:class_id/students", post(enroll_student))
}

async fn list_classes(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<ClassResponse>>, ApiError> {
    let classes = repositories::classes::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list classes"))?;

    Ok(Json(classes.into_iter().map(ClassResponse::from_db).collect()))
}

async fn create_class(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<ClassCreate>,
) -> Result<(StatusCode, Json<ClassResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let teacher = repositories::users::find_by_id(state.db(), &payload.teacher_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load teacher"))?;

    match teacher {
        Some(user) if user.role == UserRole::Teacher => {}
        Some(_) => {
            return Err(ApiError::BadRequest(
                "teacher_id must reference a user with the teacher role".to_string(),
            ))
        }
        None => return Err(ApiError::BadRequest("teacher_id not found".to_string())),
    }

    let created = repositories::classes::insert(
        state.db(),
        repositories::classes::CreateClass {
            name: &payload.name,
            teacher_id: &payload.teacher_id,
            is_active: payload.is_active,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("Class name already taken".to_string())
        } else {
            ApiError::internal(e, "Failed to create class")
        }
    })?;

    Ok((StatusCode::CREATED, Json(ClassResponse::from_db(created))))
}

async fn update_class(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Path(class_id): Path<String>,
    Json(payload): Json<ClassUpdate>,
) -> Result<Json<ClassResponse>, ApiError> {
    if let Some(teacher_id) = payload.teacher_id.as_deref() {
        let teacher = repositories::users::find_by_id(state.db(), teacher_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load teacher"))?;

        if !matches!(teacher, Some(ref user) if user.role == UserRole::Teacher) {
            return Err(ApiError::BadRequest(
                "teacher_id must reference a user with the teacher role".to_string(),
            ));
        }
    }

    let updated = repositories::classes::update(
        state.db(),
        &class_id,
        repositories::classes::UpdateClass {
            name: payload.name.as_deref(),
            teacher_id: payload.teacher_id.as_deref(),
            is_active: payload.is_active,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("Class name already taken".to_string())
        } else {
            ApiError::internal(e, "Failed to update class")
        }
    })?
    .ok_or_else(|| ApiError::NotFound("Class not found".to_string()))?;

    Ok(Json(ClassResponse::from_db(updated)))
}

async fn delete_class(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Path(class_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::classes::delete(state.db(), &class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete class"))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Class not found".to_string()))
    }
}

async fn enroll_student(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Path(class_id): Path<String>,
    Json(payload): Json<EnrollRequest>,
) -> Result<StatusCode, ApiError> {
    let class = repositories::classes::find_by_id(state.db(), &class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load class"))?;
    if class.is_none() {
        return Err(ApiError::NotFound("Class not found".to_string()));
    }

    let student = repositories::users::find_by_id(state.db(), &payload.student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load student"))?;

    match student {
        Some(user) if user.role == UserRole::Student => {}
        Some(_) => {
            return Err(ApiError::BadRequest("Only students can be enrolled".to_string()))
        }
        None => return Err(ApiError::NotFound("Student not found".to_string())),
    }

    repositories::classes::enroll(state.db(), &class_id, &payload.student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to enroll student"))?;

    Ok(StatusCode::NO_CONTENT)
}
