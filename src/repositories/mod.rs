pub(crate) mod classes;
pub(crate) mod lessons;
pub(crate) mod marks;
pub(crate) mod modules;
pub(crate) mod users;

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}
