use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories::business_cases;
use crate::schemas::business_case::{SubmissionCreate, SubmissionResponse};
use crate::services::business_cases::{self as catalog, CaseStudy};

#[derive(Debug, Deserialize)]
pub(crate) struct CaseListQuery {
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    domain: Option<String>,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cases))
        .route("/submissions", get(list_submissions).post(create_submission))
        .route("/:case_id", get(get_case))
}

/// The catalog is static in-code data; only submissions touch the store.
async fn list_cases(Query(params): Query<CaseListQuery>) -> Json<Vec<CaseStudy>> {
    let cases = catalog::filtered(params.level.as_deref(), params.domain.as_deref())
        .into_iter()
        .cloned()
        .collect();
    Json(cases)
}

async fn get_case(Path(case_id): Path<i64>) -> Result<Json<CaseStudy>, ApiError> {
    catalog::find(case_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Case study not found".to_string()))
}

async fn create_submission(
    state: State<AppState>,
    Json(payload): Json<SubmissionCreate>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    payload.validate().map_err(ApiError::validation)?;

    let case = catalog::find(payload.case_id)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown case study {}", payload.case_id)))?;

    let submission = business_cases::create(
        state.db(),
        business_cases::CreateSubmission {
            student_id: payload.student_id,
            case_id: case.id,
            title: payload.title.trim(),
            description: payload.description.as_deref(),
            results: payload.results.as_deref(),
            level: Some(case.level),
            submitted_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create submission"))?;

    Ok((StatusCode::CREATED, Json(SubmissionResponse::from_db(submission))))
}

async fn list_submissions(
    state: State<AppState>,
) -> Result<Json<Vec<SubmissionResponse>>, ApiError> {
    let submissions = business_cases::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list submissions"))?;

    Ok(Json(submissions.into_iter().map(SubmissionResponse::from_db).collect()))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::test_support;

    #[tokio::test]
    async fn catalog_filters_by_level() {
        let context = test_support::setup_test_context().await;

        let body = test_support::read_json(
            context
                .app
                .clone()
                .oneshot(test_support::json_request(Method::GET, "/api/v1/cases?level=B1", None))
                .await
                .expect("response"),
        )
        .await;

        let cases = body.as_array().expect("array");
        assert_eq!(cases.len(), 2);
        assert!(cases.iter().all(|case| case["level"] == "B1"));
    }

    #[tokio::test]
    async fn submission_inherits_the_case_level() {
        let context = test_support::setup_test_context().await;

        let response = context
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/cases/submissions",
                Some(json!({"case_id": 2, "title": "Churn model v1", "results": "AUC 0.81"})),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);

        let created = test_support::read_json(response).await;
        assert_eq!(created["level"], "B2");

        let listed = test_support::read_json(
            context
                .app
                .clone()
                .oneshot(test_support::json_request(Method::GET, "/api/v1/cases/submissions", None))
                .await
                .expect("response"),
        )
        .await;
        assert_eq!(listed.as_array().expect("array").len(), 1);
    }

    #[tokio::test]
    async fn unknown_case_is_rejected() {
        let context = test_support::setup_test_context().await;

        let response = context
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/cases/submissions",
                Some(json!({"case_id": 999, "title": "Nope"})),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
