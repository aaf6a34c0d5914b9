use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ClassCreate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub(crate) name: String,
    #[serde(alias = "teacherId")]
    #[validate(length(min = 1, message = "teacher_id must not be empty"))]
    pub(crate) teacher_id: String,
    #[serde(default = "default_true")]
    #[serde(alias = "isActive")]
    pub(crate) is_active: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClassUpdate {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    #[serde(alias = "teacherId")]
    pub(crate) teacher_id: Option<String>,
    #[serde(default)]
    #[serde(alias = "isActive")]
    pub(crate) is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnrollRequest {
    #[serde(alias = "studentId")]
    pub(crate) student_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ClassResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) teacher_id: String,
    pub(crate) is_active: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl ClassResponse {
    pub(crate) fn from_db(class: crate::db::models::SchoolClass) -> Self {
        Self {
            id: class.id,
            name: class.name,
            teacher_id: class.teacher_id,
            is_active: class.is_active,
            created_at: format_primitive(class.created_at),
            updated_at: format_primitive(class.updated_at),
        }
    }
}

fn default_true() -> bool {
    true
}
