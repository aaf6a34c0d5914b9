use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::{format_local_wallclock, format_primitive};
use crate::db::models::Lesson;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct LessonCreate {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) content: String,
    #[serde(alias = "moduleId")]
    #[validate(length(min = 1, message = "module_id must not be empty"))]
    pub(crate) module_id: String,
    #[serde(default)]
    #[serde(alias = "startTime")]
    pub(crate) start_time: Option<String>,
    #[serde(default)]
    #[serde(alias = "endTime")]
    pub(crate) end_time: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LessonResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) module_id: String,
    /// Local wall-clock time with a +06:00 offset, or null.
    pub(crate) start_time: Option<String>,
    pub(crate) end_time: Option<String>,
    /// The calling student's own score for this lesson, if any.
    pub(crate) student_mark: Option<i16>,
    pub(crate) created_at: String,
}

impl LessonResponse {
    pub(crate) fn from_db(lesson: Lesson, student_mark: Option<i16>) -> Self {
        Self {
            id: lesson.id,
            title: lesson.title,
            content: lesson.content,
            module_id: lesson.module_id,
            start_time: lesson.start_time.map(format_local_wallclock),
            end_time: lesson.end_time.map(format_local_wallclock),
            student_mark,
            created_at: format_primitive(lesson.created_at),
        }
    }
}
