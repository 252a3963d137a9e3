use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories::users;
use crate::schemas::user::{LoginRequest, RegisterRequest, UserResponse};

#[derive(Debug, Deserialize)]
pub(crate) struct UserListQuery {
    #[serde(default)]
    role: Option<UserRole>,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/", get(list_users))
        .route("/:user_id", get(get_user))
}

async fn register(
    state: State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    payload.validate().map_err(ApiError::validation)?;

    let password_hash = security::hash_password(&payload.password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let created = users::create(
        state.db(),
        users::CreateUser {
            username: payload.username.trim(),
            email: payload.email.trim(),
            password_hash,
            role: payload.role.unwrap_or(UserRole::Student),
            full_name: payload.full_name.as_deref(),
            cohort: payload.cohort.as_deref(),
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create user"))?;

    match created {
        Some(user) => Ok((StatusCode::CREATED, Json(UserResponse::from_db(user)))),
        None => Err(ApiError::Conflict("Username or email already registered".to_string())),
    }
}

async fn login(
    state: State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = users::find_by_username(state.db(), payload.username.trim())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?
        .ok_or_else(|| ApiError::BadRequest("Invalid username or password".to_string()))?;

    let verified = security::verify_password(&payload.password, &user.password_hash)
        .map_err(|e| ApiError::internal(e, "Failed to verify password"))?;
    if !verified {
        return Err(ApiError::BadRequest("Invalid username or password".to_string()));
    }

    let now = primitive_now_utc();
    users::update_last_login(state.db(), user.id, now)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to record login"))?;

    let refreshed = users::find_by_id(state.db(), user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from_db(refreshed)))
}

async fn list_users(
    Query(params): Query<UserListQuery>,
    state: State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = users::list(state.db(), params.role)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list users"))?;

    Ok(Json(users.into_iter().map(UserResponse::from_db).collect()))
}

async fn get_user(
    Path(user_id): Path<i64>,
    state: State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = users::find_by_id(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from_db(user)))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::test_support;

    #[tokio::test]
    async fn duplicate_username_is_rejected_with_single_row() {
        let context = test_support::setup_test_context().await;

        let body = json!({
            "username": "marie",
            "email": "marie@uco.fr",
            "password": "super-secret",
        });

        let first = context
            .app
            .clone()
            .oneshot(test_support::json_request(Method::POST, "/api/v1/users/register", Some(body.clone())))
            .await
            .expect("response");
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = context
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/users/register",
                Some(json!({
                    "username": "marie",
                    "email": "other@uco.fr",
                    "password": "super-secret",
                })),
            ))
            .await
            .expect("response");
        assert_eq!(second.status(), StatusCode::CONFLICT);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = 'marie'")
            .fetch_one(context.state.db())
            .await
            .expect("count");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let context = test_support::setup_test_context().await;

        let first = context
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/users/register",
                Some(json!({"username": "user-a1", "email": "same@uco.fr", "password": "super-secret"})),
            ))
            .await
            .expect("response");
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = context
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/users/register",
                Some(json!({"username": "user-a2", "email": "same@uco.fr", "password": "super-secret"})),
            ))
            .await
            .expect("response");
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn login_stamps_last_login() {
        let context = test_support::setup_test_context().await;

        let register = context
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/users/register",
                Some(json!({"username": "paul", "email": "paul@uco.fr", "password": "super-secret"})),
            ))
            .await
            .expect("response");
        assert_eq!(register.status(), StatusCode::CREATED);
        let registered = test_support::read_json(register).await;
        assert!(registered["last_login"].is_null());

        let login = context
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/users/login",
                Some(json!({"username": "paul", "password": "super-secret"})),
            ))
            .await
            .expect("response");
        assert_eq!(login.status(), StatusCode::OK);
        let logged_in = test_support::read_json(login).await;
        assert!(logged_in["last_login"].is_string());
    }

    #[tokio::test]
    async fn invalid_email_is_a_validation_error() {
        let context = test_support::setup_test_context().await;

        let response = context
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/users/register",
                Some(json!({"username": "bad", "email": "not-an-email", "password": "super-secret"})),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
