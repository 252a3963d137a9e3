use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::repositories::{portfolios, projects};
use crate::services::exports;

const MAX_DATASET_ROWS: usize = 10_000;

#[derive(Debug, Deserialize)]
pub(crate) struct DatasetQuery {
    #[serde(default = "default_rows")]
    rows: usize,
    #[serde(default)]
    seed: Option<u64>,
}

fn default_rows() -> usize {
    100
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectsExportQuery {
    #[serde(default)]
    user_id: Option<i64>,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/dataset.csv", get(dataset_csv))
        .route("/projects.csv", get(projects_csv))
        .route("/portfolio/:user_id", get(portfolio_html))
}

fn attachment(content_type: &'static str, filename: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
        ],
        body,
    )
        .into_response()
}

async fn dataset_csv(Query(params): Query<DatasetQuery>) -> Result<Response, ApiError> {
    if params.rows == 0 || params.rows > MAX_DATASET_ROWS {
        return Err(ApiError::BadRequest(format!(
            "rows must be between 1 and {MAX_DATASET_ROWS}"
        )));
    }

    let csv = exports::synthetic_dataset_csv(params.rows, params.seed);
    Ok(attachment("text/csv; charset=utf-8", "dataset.csv", csv))
}

async fn projects_csv(
    Query(params): Query<ProjectsExportQuery>,
    state: State<AppState>,
) -> Result<Response, ApiError> {
    let projects = projects::list(
        state.db(),
        projects::ProjectFilter { user_id: params.user_id, status: None },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list projects"))?;

    let csv = exports::projects_csv(&projects);
    Ok(attachment("text/csv; charset=utf-8", "projects.csv", csv))
}

async fn portfolio_html(
    Path(user_id): Path<i64>,
    state: State<AppState>,
) -> Result<Response, ApiError> {
    let portfolio = portfolios::find_by_user(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch portfolio"))?
        .ok_or_else(|| ApiError::NotFound("Portfolio not found".to_string()))?;

    let projects = portfolios::list_projects(state.db(), portfolio.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list portfolio projects"))?;
    let skills = portfolios::list_skills(state.db(), portfolio.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list skills"))?;

    let html = exports::portfolio_html(&portfolio, &projects, &skills);
    Ok(attachment("text/html; charset=utf-8", "portfolio.html", html))
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::test_support;

    #[tokio::test]
    async fn dataset_export_has_requested_rows() {
        let context = test_support::setup_test_context().await;

        let response = context
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::GET,
                "/api/v1/exports/dataset.csv?rows=10&seed=7",
                None,
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get("content-disposition")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.contains("dataset.csv"))
            .unwrap_or(false));

        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let text = String::from_utf8(body.to_vec()).expect("utf8");
        assert_eq!(text.lines().count(), 11);
        assert!(text.starts_with("observation,normal,uniform"));
    }

    #[tokio::test]
    async fn oversized_dataset_request_is_rejected() {
        let context = test_support::setup_test_context().await;

        let response = context
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::GET,
                "/api/v1/exports/dataset.csv?rows=999999",
                None,
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn portfolio_export_is_a_standalone_document() {
        let context = test_support::setup_test_context().await;
        let user = test_support::insert_user(context.state.db(), "zoe", "zoe@uco.fr").await;

        context
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::PUT,
                &format!("/api/v1/portfolio/{}", user.id),
                Some(json!({"full_name": "Zoé Petit", "headline": "Data Analyst"})),
            ))
            .await
            .expect("response");

        let response = context
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::GET,
                &format!("/api/v1/exports/portfolio/{}", user.id),
                None,
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let html = String::from_utf8(body.to_vec()).expect("utf8");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Zoé Petit"));
    }
}
