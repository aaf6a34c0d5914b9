pub(crate) mod auth;
pub(crate) mod classes;
pub(crate) mod errors;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod lessons;
pub(crate) mod marks;
pub(crate) mod modules;
pub(crate) mod profile;
pub(crate) mod router;
pub(crate) mod users;
