use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    Router,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::api;
use crate::core::{config::Settings, security, state::AppState, time::primitive_now_utc};
use crate::db;
use crate::db::models::{Exercise, User};
use crate::db::types::UserRole;
use crate::repositories::{exercises, users};
use crate::services::exercise_gen::ExerciseGenerator;

pub(crate) struct TestContext {
    pub(crate) state: AppState,
    pub(crate) app: Router,
    _guard: OwnedMutexGuard<()>,
}

pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    static LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Arc::new(Mutex::new(()))).clone();
    lock.lock_owned().await
}

pub(crate) fn set_test_env() {
    std::env::set_var("DSHUB_ENV", "test");
    std::env::set_var("DSHUB_STRICT_CONFIG", "0");
    // Generation must stay disabled in tests: no env key, no config file.
    std::env::remove_var("GEMINI_API_KEY");
    std::env::set_var("DSHUB_API_CONFIG_FILE", "/nonexistent/api_config.json");
    std::env::remove_var("DATABASE_URL");
    std::env::remove_var("FIRST_ADMIN_PASSWORD");
}

/// Single-connection in-memory store with the full schema applied. One
/// connection is the point: every handle sees the same memory database.
pub(crate) async fn memory_pool() -> SqlitePool {
    let options =
        SqliteConnectOptions::from_str("sqlite::memory:").expect("options").foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("connect");

    db::init_schema(&pool).await.expect("schema");
    pool
}

pub(crate) async fn setup_test_context() -> TestContext {
    let guard = env_lock().await;
    set_test_env();

    let settings = Settings::load().expect("settings");
    let pool = memory_pool().await;
    let generator = ExerciseGenerator::from_settings(&settings).expect("generator");

    let state = AppState::new(settings, pool, generator);
    let app = api::router::router(state.clone());

    TestContext { state, app, _guard: guard }
}

pub(crate) async fn insert_user(pool: &SqlitePool, username: &str, email: &str) -> User {
    let password_hash = security::hash_password("test-password").expect("hash");

    users::create(
        pool,
        users::CreateUser {
            username,
            email,
            password_hash,
            role: UserRole::Student,
            full_name: None,
            cohort: None,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .expect("insert user")
    .expect("user not duplicated")
}

pub(crate) async fn insert_exercise(
    pool: &SqlitePool,
    course_id: Option<i64>,
    code: &str,
) -> Exercise {
    exercises::create(
        pool,
        exercises::CreateExercise {
            exercise_code: code,
            course_id,
            subject: "Statistique Descriptive",
            kind: "multiple_choice",
            question: "Quelle est la moyenne de 2 et 4 ?",
            options: vec!["2".to_string(), "3".to_string(), "4".to_string(), "6".to_string()],
            correct_index: Some(1),
            solution: None,
            explanation: Some("(2 + 4) / 2 = 3"),
            level: "Débutant",
            difficulty: Some("Débutant"),
            concepts: vec!["moyenne".to_string()],
            estimated_time: Some("2 min"),
            source: "ai",
            created_at: primitive_now_utc(),
        },
    )
    .await
    .expect("insert exercise")
}

pub(crate) fn json_request(
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);

    if let Some(body) = body {
        let bytes = serde_json::to_vec(&body).expect("serialize body");
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(bytes))
            .expect("request body")
    } else {
        builder.body(Body::empty()).expect("request body")
    }
}

pub(crate) async fn read_json(response: axum::response::Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
    serde_json::from_slice(&body).unwrap_or_else(|err| {
        let body_text = String::from_utf8_lossy(&body);
        panic!("json parse: {err}; body: {body_text}");
    })
}
