use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories::{exercises, progress, users};
use crate::schemas::exercise::{AttemptRequest, ExerciseResponse, ProgressResponse};
use crate::services::exercise_gen::GeneratorStatus;

#[derive(Debug, Deserialize)]
pub(crate) struct ExerciseListQuery {
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    course_id: Option<i64>,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_exercises))
        .route("/generator/status", get(generator_status))
        .route("/:exercise_id", get(get_exercise))
        .route("/:exercise_id/attempts", post(record_attempt))
        .route("/progress/:user_id", get(user_progress))
}

async fn list_exercises(
    Query(params): Query<ExerciseListQuery>,
    state: State<AppState>,
) -> Result<Json<Vec<ExerciseResponse>>, ApiError> {
    let exercises = exercises::list(
        state.db(),
        exercises::ExerciseFilter {
            subject: params.subject,
            level: params.level,
            kind: params.kind,
            course_id: params.course_id,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list exercises"))?;

    Ok(Json(exercises.into_iter().map(ExerciseResponse::from_db).collect()))
}

async fn get_exercise(
    Path(exercise_id): Path<i64>,
    state: State<AppState>,
) -> Result<Json<ExerciseResponse>, ApiError> {
    let exercise = exercises::find_by_id(state.db(), exercise_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch exercise"))?
        .ok_or_else(|| ApiError::NotFound("Exercise not found".to_string()))?;

    Ok(Json(ExerciseResponse::from_db(exercise)))
}

/// The status badge shown next to the generation button: whether a
/// credential resolved. Failure causes are otherwise indistinguishable.
async fn generator_status(state: State<AppState>) -> Json<GeneratorStatus> {
    Json(state.generator().status())
}

async fn record_attempt(
    Path(exercise_id): Path<i64>,
    state: State<AppState>,
    Json(payload): Json<AttemptRequest>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let exercise = exercises::find_by_id(state.db(), exercise_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch exercise"))?;
    if exercise.is_none() {
        return Err(ApiError::NotFound("Exercise not found".to_string()));
    }

    let user = users::find_by_id(state.db(), payload.user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?;
    if user.is_none() {
        return Err(ApiError::BadRequest(format!("Unknown user id {}", payload.user_id)));
    }

    let record = progress::record_attempt(
        state.db(),
        progress::RecordAttempt {
            user_id: payload.user_id,
            exercise_id,
            completed: payload.completed,
            score: payload.score,
            attempted_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to record attempt"))?;

    Ok(Json(ProgressResponse::from_db(record)))
}

async fn user_progress(
    Path(user_id): Path<i64>,
    state: State<AppState>,
) -> Result<Json<Vec<ProgressResponse>>, ApiError> {
    let records = progress::list_for_user(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list progress"))?;

    Ok(Json(records.into_iter().map(ProgressResponse::from_db).collect()))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::test_support;

    #[tokio::test]
    async fn generator_status_reports_unconfigured() {
        let context = test_support::setup_test_context().await;

        let response = context
            .app
            .clone()
            .oneshot(test_support::json_request(Method::GET, "/api/v1/exercises/generator/status", None))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = test_support::read_json(response).await;
        assert_eq!(body["configured"], false);
    }

    #[tokio::test]
    async fn repeated_attempts_upsert_a_single_progress_row() {
        let context = test_support::setup_test_context().await;
        let user = test_support::insert_user(context.state.db(), "lea", "lea@uco.fr").await;
        let exercise = test_support::insert_exercise(context.state.db(), None, "qcm1").await;

        let first = context
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/exercises/{}/attempts", exercise.id),
                Some(json!({"user_id": user.id, "completed": false, "score": 40.0})),
            ))
            .await
            .expect("response");
        assert_eq!(first.status(), StatusCode::OK);
        let first = test_support::read_json(first).await;
        assert_eq!(first["attempts"], 1);

        let second = context
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/exercises/{}/attempts", exercise.id),
                Some(json!({"user_id": user.id, "completed": true, "score": 90.0})),
            ))
            .await
            .expect("response");
        let second = test_support::read_json(second).await;
        assert_eq!(second["attempts"], 2);
        assert_eq!(second["completed"], true);
        assert_eq!(second["score"], 90.0);

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM student_progress")
            .fetch_one(context.state.db())
            .await
            .expect("count");
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn filters_are_anded() {
        let context = test_support::setup_test_context().await;
        test_support::insert_exercise(context.state.db(), None, "a").await;
        let target = test_support::insert_exercise(context.state.db(), None, "b").await;

        sqlx::query("UPDATE exercises SET subject = 'SQL', kind = 'sql' WHERE id = ?")
            .bind(target.id)
            .execute(context.state.db())
            .await
            .expect("update");

        let body = test_support::read_json(
            context
                .app
                .clone()
                .oneshot(test_support::json_request(
                    Method::GET,
                    "/api/v1/exercises?subject=SQL&kind=sql",
                    None,
                ))
                .await
                .expect("response"),
        )
        .await;

        let items = body.as_array().expect("array");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"].as_i64(), Some(target.id));
    }
}
