use sqlx::SqlitePool;

use crate::db::models::ProgressRecord;

const COLUMNS: &str = "id, user_id, exercise_id, completed, score, attempts, last_attempt";

pub(crate) struct RecordAttempt {
    pub(crate) user_id: i64,
    pub(crate) exercise_id: i64,
    pub(crate) completed: bool,
    pub(crate) score: Option<f64>,
    pub(crate) attempted_at: time::PrimitiveDateTime,
}

/// One row per (user, exercise); repeated attempts update it in place and
/// bump the attempt counter.
pub(crate) async fn record_attempt(
    pool: &SqlitePool,
    params: RecordAttempt,
) -> Result<ProgressRecord, sqlx::Error> {
    sqlx::query_as::<_, ProgressRecord>(&format!(
        "INSERT INTO student_progress (user_id, exercise_id, completed, score, attempts, last_attempt)
         VALUES (?, ?, ?, ?, 1, ?)
         ON CONFLICT(user_id, exercise_id) DO UPDATE SET
            completed = excluded.completed,
            score = excluded.score,
            attempts = student_progress.attempts + 1,
            last_attempt = excluded.last_attempt
         RETURNING {COLUMNS}",
    ))
    .bind(params.user_id)
    .bind(params.exercise_id)
    .bind(params.completed)
    .bind(params.score)
    .bind(params.attempted_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<ProgressRecord>, sqlx::Error> {
    sqlx::query_as::<_, ProgressRecord>(&format!(
        "SELECT {COLUMNS} FROM student_progress WHERE user_id = ? ORDER BY id ASC",
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}
