use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories::{courses, exercises, users};
use crate::schemas::course::{
    CourseCreate, CourseResponse, GenerateExercisesRequest, GenerateExercisesResponse,
    VisibilityUpdate,
};
use crate::schemas::exercise::ExerciseResponse;
use crate::services::exercise_gen::GenerateRequest;
use crate::services::keywords;

#[derive(Debug, Deserialize)]
pub(crate) struct CourseListQuery {
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    teacher: Option<String>,
    #[serde(default)]
    include_hidden: bool,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/:course_id", get(get_course).delete(delete_course))
        .route("/:course_id/visibility", patch(update_visibility))
        .route("/:course_id/generate-exercises", post(generate_exercises))
}

async fn create_course(
    state: State<AppState>,
    Json(payload): Json<CourseCreate>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    payload.validate().map_err(ApiError::validation)?;

    if let Some(teacher_id) = payload.teacher_id {
        let teacher = users::find_by_id(state.db(), teacher_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to fetch teacher"))?;
        if teacher.is_none() {
            return Err(ApiError::BadRequest(format!("Unknown teacher id {teacher_id}")));
        }
    }

    let keywords = keywords::extract(&payload.content);
    let course_code = Uuid::new_v4().to_string();

    let course = courses::create(
        state.db(),
        courses::CreateCourse {
            course_code: &course_code,
            teacher_id: payload.teacher_id,
            teacher_name: payload.teacher_name.trim(),
            subject: payload.subject.trim(),
            chapter: payload.chapter.trim(),
            level: payload.level.trim(),
            content: &payload.content,
            keywords,
            visible: payload.visible,
            uploaded_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create course"))?;

    Ok((StatusCode::CREATED, Json(CourseResponse::from_db(course))))
}

async fn list_courses(
    Query(params): Query<CourseListQuery>,
    state: State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = courses::list(
        state.db(),
        courses::CourseFilter {
            subject: params.subject,
            teacher_name: params.teacher,
            visible_only: !params.include_hidden,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;

    Ok(Json(courses.into_iter().map(CourseResponse::from_db).collect()))
}

async fn get_course(
    Path(course_id): Path<i64>,
    state: State<AppState>,
) -> Result<Json<CourseResponse>, ApiError> {
    let course = courses::find_by_id(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    Ok(Json(CourseResponse::from_db(course)))
}

async fn delete_course(
    Path(course_id): Path<i64>,
    state: State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = courses::delete(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete course"))?;

    if !deleted {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn update_visibility(
    Path(course_id): Path<i64>,
    state: State<AppState>,
    Json(payload): Json<VisibilityUpdate>,
) -> Result<Json<CourseResponse>, ApiError> {
    courses::set_visibility(state.db(), course_id, payload.visible)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update visibility"))?;

    let course = courses::find_by_id(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    Ok(Json(CourseResponse::from_db(course)))
}

/// Run the exercise generator against the course content and persist
/// whatever it accepted. An empty result is a valid outcome (no credential,
/// call failure, or unusable model output all land here) and persists
/// nothing.
async fn generate_exercises(
    Path(course_id): Path<i64>,
    state: State<AppState>,
    Json(payload): Json<GenerateExercisesRequest>,
) -> Result<Json<GenerateExercisesResponse>, ApiError> {
    if payload.count == 0 || payload.count > 20 {
        return Err(ApiError::BadRequest("count must be between 1 and 20".to_string()));
    }

    let course = courses::find_by_id(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    let generated = state
        .generator()
        .generate(GenerateRequest {
            course_content: course.content.clone(),
            subject: course.subject.clone(),
            level: course.level.clone(),
            count: payload.count,
            kinds: payload.kinds,
        })
        .await;

    let mut stored = Vec::with_capacity(generated.len());
    for exercise in &generated {
        // Generated codes repeat across runs (subject + ordinal); a short
        // random suffix keeps the stored code unique.
        let suffix = Uuid::new_v4().simple().to_string();
        let exercise_code = format!("{}_{}", exercise.code, &suffix[..8]);

        let created = exercises::create(
            state.db(),
            exercises::CreateExercise {
                exercise_code: &exercise_code,
                course_id: Some(course.id),
                subject: &exercise.subject,
                kind: &exercise.kind,
                question: &exercise.question,
                options: exercise.options.clone(),
                correct_index: exercise.correct_index,
                solution: exercise.solution.as_deref(),
                explanation: exercise.explanation.as_deref(),
                level: &exercise.level,
                difficulty: Some(exercise.level.as_str()),
                concepts: exercise.concepts.clone(),
                estimated_time: exercise.estimated_time.as_deref(),
                source: &exercise.source,
                created_at: primitive_now_utc(),
            },
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to store generated exercise"))?;

        stored.push(ExerciseResponse::from_db(created));
    }

    if !stored.is_empty() {
        let total = exercises::count_for_course(state.db(), course.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to count exercises"))?;
        courses::set_exercise_count(state.db(), course.id, total)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to update exercise count"))?;
    }

    Ok(Json(GenerateExercisesResponse { generated: stored.len(), exercises: stored }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::test_support;

    fn course_body() -> serde_json::Value {
        json!({
            "teacher_name": "Dr. Martin",
            "subject": "Statistique Descriptive",
            "chapter": "Moyenne et variance",
            "level": "Débutant",
            "content": "La moyenne et la variance décrivent un échantillon. Exemple en Python.",
        })
    }

    #[tokio::test]
    async fn created_course_extracts_keywords_in_order() {
        let context = test_support::setup_test_context().await;

        let response = context
            .app
            .clone()
            .oneshot(test_support::json_request(Method::POST, "/api/v1/courses", Some(course_body())))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);

        let created = test_support::read_json(response).await;
        assert_eq!(created["keywords"], json!(["moyenne", "variance", "échantillon", "python"]));

        let id = created["id"].as_i64().expect("id");
        let fetched = context
            .app
            .clone()
            .oneshot(test_support::json_request(Method::GET, &format!("/api/v1/courses/{id}"), None))
            .await
            .expect("response");
        let fetched = test_support::read_json(fetched).await;
        assert_eq!(fetched["keywords"], json!(["moyenne", "variance", "échantillon", "python"]));
    }

    #[tokio::test]
    async fn hidden_courses_are_filtered_by_default() {
        let context = test_support::setup_test_context().await;

        let response = context
            .app
            .clone()
            .oneshot(test_support::json_request(Method::POST, "/api/v1/courses", Some(course_body())))
            .await
            .expect("response");
        let created = test_support::read_json(response).await;
        let id = created["id"].as_i64().expect("id");

        let hide = context
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::PATCH,
                &format!("/api/v1/courses/{id}/visibility"),
                Some(json!({"visible": false})),
            ))
            .await
            .expect("response");
        assert_eq!(hide.status(), StatusCode::OK);

        let visible = test_support::read_json(
            context
                .app
                .clone()
                .oneshot(test_support::json_request(Method::GET, "/api/v1/courses", None))
                .await
                .expect("response"),
        )
        .await;
        assert_eq!(visible.as_array().expect("array").len(), 0);

        let all = test_support::read_json(
            context
                .app
                .clone()
                .oneshot(test_support::json_request(
                    Method::GET,
                    "/api/v1/courses?include_hidden=true",
                    None,
                ))
                .await
                .expect("response"),
        )
        .await;
        assert_eq!(all.as_array().expect("array").len(), 1);
    }

    #[tokio::test]
    async fn deleting_a_course_cascades_to_its_exercises() {
        let context = test_support::setup_test_context().await;

        let created = test_support::read_json(
            context
                .app
                .clone()
                .oneshot(test_support::json_request(Method::POST, "/api/v1/courses", Some(course_body())))
                .await
                .expect("response"),
        )
        .await;
        let course_id = created["id"].as_i64().expect("id");

        for index in 0..3 {
            test_support::insert_exercise(context.state.db(), Some(course_id), &format!("ex{index}"))
                .await;
        }

        let before: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM exercises WHERE course_id = ?")
                .bind(course_id)
                .fetch_one(context.state.db())
                .await
                .expect("count");
        assert_eq!(before, 3);

        let delete = context
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::DELETE,
                &format!("/api/v1/courses/{course_id}"),
                None,
            ))
            .await
            .expect("response");
        assert_eq!(delete.status(), StatusCode::NO_CONTENT);

        let after: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exercises WHERE course_id = ?")
            .bind(course_id)
            .fetch_one(context.state.db())
            .await
            .expect("count");
        assert_eq!(after, 0);
    }

    #[tokio::test]
    async fn generation_without_credential_yields_empty_list() {
        let context = test_support::setup_test_context().await;

        let created = test_support::read_json(
            context
                .app
                .clone()
                .oneshot(test_support::json_request(Method::POST, "/api/v1/courses", Some(course_body())))
                .await
                .expect("response"),
        )
        .await;
        let course_id = created["id"].as_i64().expect("id");

        let response = context
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/courses/{course_id}/generate-exercises"),
                Some(json!({"count": 5})),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = test_support::read_json(response).await;
        assert_eq!(body["generated"], 0);
        assert_eq!(body["exercises"], json!([]));

        // Nothing persisted, and the denormalized counter is untouched.
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exercises")
            .fetch_one(context.state.db())
            .await
            .expect("count");
        assert_eq!(count, 0);
    }
}
