use serde::Serialize;
use std::collections::HashMap;

pub(crate) mod auth;
pub(crate) mod class;
pub(crate) mod lesson;
pub(crate) mod mark;
pub(crate) mod module;
pub(crate) mod user;

#[derive(Debug, Serialize)]
pub(crate) struct RootResponse {
    pub(crate) message: String,
    pub(crate) version: String,
    pub(crate) docs_url: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) service: String,
    pub(crate) status: String,
    pub(crate) components: HashMap<String, String>,
}
