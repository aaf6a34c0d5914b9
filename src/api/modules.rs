use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentAdmin, CurrentUser};
use crate::api::lessons::lesson_responses_for;
use crate::core::state::AppState;
use crate::db::models::{Module, User};
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::module::{ModuleCreate, ModuleResponse};
use crate::services::visibility::{self, ModuleScope};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_modules).post(create_module))
        .route("/:module_id", get(get_module).delete(delete_module))
}

async fn list_modules(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ModuleResponse>>, ApiError> {
    let modules = match visibility::module_scope(&user) {
        ModuleScope::TaughtClasses => {
            repositories::modules::list_for_teacher(state.db(), &user.id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to list modules"))?
        }
        ModuleScope::EnrolledClasses => {
            repositories::modules::list_for_student(state.db(), &user.id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to list modules"))?
        }
        ModuleScope::Empty => Vec::new(),
    };

    let mut responses = Vec::with_capacity(modules.len());
    for module in modules {
        responses.push(module_response(&state, &user, module).await?);
    }

    Ok(Json(responses))
}

async fn get_module(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> Result<Json<ModuleResponse>, ApiError> {
    let module = repositories::modules::find_by_id(state.db(), &module_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load module"))?
        .ok_or_else(|| ApiError::NotFound("Module not found".to_string()))?;

    let class = repositories::classes::find_by_id(state.db(), &module.school_class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load class"))?
        .ok_or_else(|| ApiError::NotFound("Module not found".to_string()))?;

    let enrolled = if user.role == UserRole::Student {
        repositories::classes::is_enrolled(state.db(), &class.id, &user.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check enrollment"))?
    } else {
        false
    };

    // Invisible modules are indistinguishable from missing ones.
    if !visibility::can_view_module(&user, &class.teacher_id, enrolled) {
        return Err(ApiError::NotFound("Module not found".to_string()));
    }

    Ok(Json(module_response(&state, &user, module).await?))
}

async fn create_module(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<ModuleCreate>,
) -> Result<(StatusCode, Json<ModuleResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let class = repositories::classes::find_by_id(state.db(), &payload.school_class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load class"))?
        .ok_or_else(|| ApiError::NotFound("Class not found".to_string()))?;

    let allowed = user.role == UserRole::Admin
        || (user.role == UserRole::Teacher && class.teacher_id == user.id);
    if !allowed {
        return Err(ApiError::Forbidden("Not enough permissions for this class"));
    }

    let created = repositories::modules::insert(
        state.db(),
        repositories::modules::CreateModule {
            title: &payload.title,
            description: &payload.description,
            school_class_id: &payload.school_class_id,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create module"))?;

    Ok((StatusCode::CREATED, Json(module_response(&state, &user, created).await?)))
}

async fn delete_module(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::modules::delete(state.db(), &module_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete module"))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Module not found".to_string()))
    }
}

async fn module_response(
    state: &AppState,
    actor: &User,
    module: Module,
) -> Result<ModuleResponse, ApiError> {
    let lessons = lesson_responses_for(state, actor, &module.id).await?;
    Ok(ModuleResponse::from_db(module, lessons))
}
