use axum::{extract::State, Json};
use std::collections::HashMap;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::repositories::stats;
use crate::schemas::{HealthResponse, RootResponse};

pub(crate) async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    let response = RootResponse {
        message: "Data Science Hub API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.settings().runtime().environment.as_str().to_string(),
    };

    Json(response)
}

pub(crate) async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut status = "healthy".to_string();
    let mut components = HashMap::new();

    match sqlx::query("SELECT 1").execute(state.db()).await {
        Ok(_) => {
            components.insert("database".to_string(), "healthy".to_string());
        }
        Err(err) => {
            components.insert("database".to_string(), format!("unhealthy: {err}"));
            status = "unhealthy".to_string();
        }
    }

    // Generation being unconfigured is a reduced mode, not an outage.
    let generator = if state.generator().status().configured { "configured" } else { "disabled" };
    components.insert("exercise_generator".to_string(), generator.to_string());

    Json(HealthResponse { service: "dshub-api".to_string(), status, components })
}

pub(crate) async fn database_stats(
    State(state): State<AppState>,
) -> Result<Json<stats::DatabaseStats>, ApiError> {
    let stats = stats::collect(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to collect database stats"))?;
    Ok(Json(stats))
}
