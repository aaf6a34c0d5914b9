use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Module;
use crate::schemas::lesson::LessonResponse;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ModuleCreate {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(alias = "schoolClassId")]
    #[validate(length(min = 1, message = "school_class_id must not be empty"))]
    pub(crate) school_class_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ModuleResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) school_class_id: String,
    pub(crate) lessons: Vec<LessonResponse>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl ModuleResponse {
    pub(crate) fn from_db(module: Module, lessons: Vec<LessonResponse>) -> Self {
        Self {
            id: module.id,
            title: module.title,
            description: module.description,
            school_class_id: module.school_class_id,
            lessons,
            created_at: format_primitive(module.created_at),
            updated_at: format_primitive(module.updated_at),
        }
    }
}
