//! Role-based access decisions for classes, modules and marks.
//!
//! Every function here is a pure predicate over the acting user and the
//! already-loaded rows it needs. Handlers fetch the rows, this module
//! decides, and the handlers translate a denial into a status code.

use crate::db::models::User;
use crate::db::types::UserRole;

/// Which classes feed a user's module and lesson listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ModuleScope {
    /// Classes where the user is the assigned teacher.
    TaughtClasses,
    /// Classes the user is enrolled in as a student.
    EnrolledClasses,
    /// No classes at all. Listings come back empty, never as an error.
    Empty,
}

pub(crate) fn module_scope(actor: &User) -> ModuleScope {
    match actor.role {
        UserRole::Teacher => ModuleScope::TaughtClasses,
        UserRole::Student => ModuleScope::EnrolledClasses,
        UserRole::Admin => ModuleScope::Empty,
    }
}

/// Whether the actor may see a single module (and its lessons) belonging to
/// a class with the given teacher. `enrolled` is the actor's membership in
/// that class, looked up by the caller.
pub(crate) fn can_view_module(actor: &User, class_teacher_id: &str, enrolled: bool) -> bool {
    match actor.role {
        UserRole::Teacher => actor.id == class_teacher_id,
        UserRole::Student => enrolled,
        UserRole::Admin => false,
    }
}

/// The roster is visible only to the teacher who teaches the class.
pub(crate) fn can_view_roster(actor: &User, class_teacher_id: &str) -> bool {
    actor.role == UserRole::Teacher && actor.id == class_teacher_id
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MarkMutation {
    Score,
    Answer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MarkDenied {
    /// A student touched a mark that belongs to someone else.
    NotOwned,
    /// The actor's role never performs this mutation.
    RoleNotAllowed,
}

/// Teachers set scores, students attach answers to their own marks.
///
/// For students, ownership is checked before the mutation kind: a student
/// poking at another student's mark is told "not yours" even when the
/// mutation would be out of role anyway.
pub(crate) fn authorize_mark_mutation(
    actor: &User,
    mark_student_id: &str,
    mutation: MarkMutation,
) -> Result<(), MarkDenied> {
    match actor.role {
        UserRole::Teacher => match mutation {
            MarkMutation::Score => Ok(()),
            MarkMutation::Answer => Err(MarkDenied::RoleNotAllowed),
        },
        UserRole::Student => {
            if actor.id != mark_student_id {
                return Err(MarkDenied::NotOwned);
            }
            match mutation {
                MarkMutation::Answer => Ok(()),
                MarkMutation::Score => Err(MarkDenied::RoleNotAllowed),
            }
        }
        UserRole::Admin => Err(MarkDenied::RoleNotAllowed),
    }
}

/// Scores live on a 0..=100 scale.
pub(crate) fn validate_score(score: i64) -> Result<i16, String> {
    if !(0..=100).contains(&score) {
        return Err(format!("score must be between 0 and 100, got {score}"));
    }

    Ok(score as i16)
}
