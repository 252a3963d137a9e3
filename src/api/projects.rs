use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use time::macros::format_description;
use time::Date;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::ProjectStatus;
use crate::repositories::projects;
use crate::schemas::project::{ProjectCreate, ProjectResponse, ProjectUpdate, TaskCreate};
use crate::services::study_session;

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectListQuery {
    #[serde(default)]
    user_id: Option<i64>,
    #[serde(default)]
    status: Option<ProjectStatus>,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route("/:project_id", get(get_project).patch(update_project).delete(delete_project))
        .route("/:project_id/tasks", post(add_task))
        .route("/:project_id/tasks/:task_index", patch(toggle_task).delete(remove_task))
}

fn parse_date(field: &str, value: Option<&str>) -> Result<Option<Date>, ApiError> {
    let format = format_description!("[year]-[month]-[day]");
    match value {
        None => Ok(None),
        Some(raw) => Date::parse(raw, &format)
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("{field} must be YYYY-MM-DD, got {raw}"))),
    }
}

async fn create_project(
    state: State<AppState>,
    Json(payload): Json<ProjectCreate>,
) -> Result<(StatusCode, Json<ProjectResponse>), ApiError> {
    payload.validate().map_err(ApiError::validation)?;

    let start_date = parse_date("start_date", payload.start_date.as_deref())?;
    let end_date = parse_date("end_date", payload.end_date.as_deref())?;

    let project = projects::create(
        state.db(),
        projects::CreateProject {
            user_id: payload.user_id,
            name: payload.name.trim(),
            kind: payload.kind.trim(),
            description: payload.description.as_deref(),
            start_date,
            end_date,
            status: payload.status,
            technologies: payload.technologies,
            tasks: payload.tasks,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create project"))?;

    Ok((StatusCode::CREATED, Json(ProjectResponse::from_db(project))))
}

async fn list_projects(
    Query(params): Query<ProjectListQuery>,
    state: State<AppState>,
) -> Result<Json<Vec<ProjectResponse>>, ApiError> {
    let projects = projects::list(
        state.db(),
        projects::ProjectFilter { user_id: params.user_id, status: params.status },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list projects"))?;

    Ok(Json(projects.into_iter().map(ProjectResponse::from_db).collect()))
}

async fn get_project(
    Path(project_id): Path<i64>,
    state: State<AppState>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let project = fetch_project(&state, project_id).await?;
    Ok(Json(ProjectResponse::from_db(project)))
}

async fn update_project(
    Path(project_id): Path<i64>,
    state: State<AppState>,
    Json(payload): Json<ProjectUpdate>,
) -> Result<Json<ProjectResponse>, ApiError> {
    fetch_project(&state, project_id).await?;

    projects::update(
        state.db(),
        project_id,
        projects::UpdateProject {
            name: payload.name,
            kind: payload.kind,
            description: payload.description,
            status: payload.status,
            technologies: payload.technologies,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update project"))?;

    let project = fetch_project(&state, project_id).await?;
    Ok(Json(ProjectResponse::from_db(project)))
}

/// Takes effect immediately; there is no confirmation step and no undo.
async fn delete_project(
    Path(project_id): Path<i64>,
    state: State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = projects::delete(state.db(), project_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete project"))?;

    if !deleted {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn add_task(
    Path(project_id): Path<i64>,
    state: State<AppState>,
    Json(payload): Json<TaskCreate>,
) -> Result<Json<ProjectResponse>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Task name must not be empty".to_string()));
    }

    let project = fetch_project(&state, project_id).await?;
    let tasks = study_session::add_task(project.tasks.0, payload.name.trim());

    projects::set_tasks(state.db(), project_id, tasks, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to store tasks"))?;

    let project = fetch_project(&state, project_id).await?;
    Ok(Json(ProjectResponse::from_db(project)))
}

async fn toggle_task(
    Path((project_id, task_index)): Path<(i64, usize)>,
    state: State<AppState>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let project = fetch_project(&state, project_id).await?;

    let tasks = study_session::toggle_task(project.tasks.0, task_index)
        .ok_or_else(|| ApiError::NotFound(format!("No task at index {task_index}")))?;

    projects::set_tasks(state.db(), project_id, tasks, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to store tasks"))?;

    let project = fetch_project(&state, project_id).await?;
    Ok(Json(ProjectResponse::from_db(project)))
}

async fn remove_task(
    Path((project_id, task_index)): Path<(i64, usize)>,
    state: State<AppState>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let project = fetch_project(&state, project_id).await?;

    let tasks = study_session::remove_task(project.tasks.0, task_index)
        .ok_or_else(|| ApiError::NotFound(format!("No task at index {task_index}")))?;

    projects::set_tasks(state.db(), project_id, tasks, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to store tasks"))?;

    let project = fetch_project(&state, project_id).await?;
    Ok(Json(ProjectResponse::from_db(project)))
}

async fn fetch_project(
    state: &AppState,
    project_id: i64,
) -> Result<crate::db::models::Project, ApiError> {
    projects::find_by_id(state.db(), project_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch project"))?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::test_support;

    #[tokio::test]
    async fn json_fields_round_trip_with_order() {
        let context = test_support::setup_test_context().await;

        let response = context
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/projects",
                Some(json!({
                    "name": "Churn",
                    "kind": "ML",
                    "status": "in_progress",
                    "technologies": ["Python", "SQL"],
                    "tasks": [{"nom": "a", "done": false}],
                })),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = test_support::read_json(response).await;
        let id = created["id"].as_i64().expect("id");

        let fetched = test_support::read_json(
            context
                .app
                .clone()
                .oneshot(test_support::json_request(Method::GET, &format!("/api/v1/projects/{id}"), None))
                .await
                .expect("response"),
        )
        .await;

        assert_eq!(fetched["technologies"], json!(["Python", "SQL"]));
        assert_eq!(fetched["tasks"], json!([{"nom": "a", "done": false}]));
    }

    #[tokio::test]
    async fn task_lifecycle_add_toggle_remove() {
        let context = test_support::setup_test_context().await;

        let created = test_support::read_json(
            context
                .app
                .clone()
                .oneshot(test_support::json_request(
                    Method::POST,
                    "/api/v1/projects",
                    Some(json!({"name": "P", "kind": "ML", "status": "in_progress"})),
                ))
                .await
                .expect("response"),
        )
        .await;
        let id = created["id"].as_i64().expect("id");

        for name in ["collect", "clean"] {
            let response = context
                .app
                .clone()
                .oneshot(test_support::json_request(
                    Method::POST,
                    &format!("/api/v1/projects/{id}/tasks"),
                    Some(json!({"name": name})),
                ))
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::OK);
        }

        let toggled = test_support::read_json(
            context
                .app
                .clone()
                .oneshot(test_support::json_request(
                    Method::PATCH,
                    &format!("/api/v1/projects/{id}/tasks/1"),
                    None,
                ))
                .await
                .expect("response"),
        )
        .await;
        assert_eq!(toggled["tasks"], json!([{"nom": "collect", "done": false}, {"nom": "clean", "done": true}]));

        let removed = test_support::read_json(
            context
                .app
                .clone()
                .oneshot(test_support::json_request(
                    Method::DELETE,
                    &format!("/api/v1/projects/{id}/tasks/0"),
                    None,
                ))
                .await
                .expect("response"),
        )
        .await;
        assert_eq!(removed["tasks"], json!([{"nom": "clean", "done": true}]));

        let missing = context
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::PATCH,
                &format!("/api/v1/projects/{id}/tasks/9"),
                None,
            ))
            .await
            .expect("response");
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn bad_date_is_rejected() {
        let context = test_support::setup_test_context().await;

        let response = context
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/projects",
                Some(json!({
                    "name": "P", "kind": "ML", "status": "in_progress",
                    "start_date": "03/01/2025",
                })),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_is_immediate() {
        let context = test_support::setup_test_context().await;

        let created = test_support::read_json(
            context
                .app
                .clone()
                .oneshot(test_support::json_request(
                    Method::POST,
                    "/api/v1/projects",
                    Some(json!({"name": "Gone", "kind": "ML", "status": "done"})),
                ))
                .await
                .expect("response"),
        )
        .await;
        let id = created["id"].as_i64().expect("id");

        let delete = context
            .app
            .clone()
            .oneshot(test_support::json_request(Method::DELETE, &format!("/api/v1/projects/{id}"), None))
            .await
            .expect("response");
        assert_eq!(delete.status(), StatusCode::NO_CONTENT);

        let gone = context
            .app
            .clone()
            .oneshot(test_support::json_request(Method::GET, &format!("/api/v1/projects/{id}"), None))
            .await
            .expect("response");
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    }
}
