use std::collections::HashMap;

use serde::Serialize;

pub(crate) mod business_case;
pub(crate) mod course;
pub(crate) mod exercise;
pub(crate) mod flashcard;
pub(crate) mod forum;
pub(crate) mod portfolio;
pub(crate) mod project;
pub(crate) mod user;

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) service: String,
    pub(crate) status: String,
    pub(crate) components: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RootResponse {
    pub(crate) message: String,
    pub(crate) version: String,
    pub(crate) environment: String,
}
