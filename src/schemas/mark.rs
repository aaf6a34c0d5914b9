use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Mark;
use crate::repositories::marks::{MarkWithStudent, RosterRow};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct MarkCreate {
    #[serde(alias = "studentId")]
    #[validate(length(min = 1, message = "student_id must not be empty"))]
    pub(crate) student_id: String,
    #[serde(alias = "lessonId")]
    #[validate(length(min = 1, message = "lesson_id must not be empty"))]
    pub(crate) lesson_id: String,
    #[serde(default)]
    #[validate(range(min = 0, max = 100, message = "score must be between 0 and 100"))]
    pub(crate) score: Option<i16>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MarksQuery {
    #[serde(default)]
    pub(crate) lesson: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct MarkResponse {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) lesson_id: String,
    pub(crate) score: Option<i16>,
    pub(crate) answer_url: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl MarkResponse {
    pub(crate) fn from_db(mark: Mark, answer_url: Option<String>) -> Self {
        Self {
            id: mark.id,
            student_id: mark.student_id,
            lesson_id: mark.lesson_id,
            score: mark.score,
            answer_url,
            created_at: format_primitive(mark.created_at),
            updated_at: format_primitive(mark.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MarkStudent {
    pub(crate) id: String,
    pub(crate) username: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct MarkWithStudentResponse {
    pub(crate) id: String,
    pub(crate) student: MarkStudent,
    pub(crate) lesson_id: String,
    pub(crate) score: Option<i16>,
    pub(crate) answer_url: Option<String>,
    pub(crate) created_at: String,
}

impl MarkWithStudentResponse {
    pub(crate) fn from_row(row: MarkWithStudent, answer_url: Option<String>) -> Self {
        Self {
            id: row.id,
            student: MarkStudent {
                id: row.student_id,
                username: row.student_username,
                first_name: row.student_first_name,
                last_name: row.student_last_name,
            },
            lesson_id: row.lesson_id,
            score: row.score,
            answer_url,
            created_at: format_primitive(row.created_at),
        }
    }
}

/// One row of the teacher-facing roster for a lesson.
#[derive(Debug, Serialize)]
pub(crate) struct RosterStudentResponse {
    pub(crate) id: String,
    pub(crate) username: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) mark_id: Option<String>,
    pub(crate) mark: Option<i16>,
    pub(crate) answer_url: Option<String>,
}

impl RosterStudentResponse {
    pub(crate) fn from_row(row: RosterRow, answer_url: Option<String>) -> Self {
        Self {
            id: row.student_id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            mark_id: row.mark_id,
            mark: row.score,
            answer_url,
        }
    }
}
