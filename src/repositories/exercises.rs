use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::db::models::Exercise;

const COLUMNS: &str = "\
    id, exercise_code, course_id, subject, kind, question, options, \
    correct_index, solution, explanation, level, difficulty, concepts, \
    estimated_time, source, created_at";

pub(crate) struct CreateExercise<'a> {
    pub(crate) exercise_code: &'a str,
    pub(crate) course_id: Option<i64>,
    pub(crate) subject: &'a str,
    pub(crate) kind: &'a str,
    pub(crate) question: &'a str,
    pub(crate) options: Vec<String>,
    pub(crate) correct_index: Option<i64>,
    pub(crate) solution: Option<&'a str>,
    pub(crate) explanation: Option<&'a str>,
    pub(crate) level: &'a str,
    pub(crate) difficulty: Option<&'a str>,
    pub(crate) concepts: Vec<String>,
    pub(crate) estimated_time: Option<&'a str>,
    pub(crate) source: &'a str,
    pub(crate) created_at: time::PrimitiveDateTime,
}

#[derive(Debug, Default)]
pub(crate) struct ExerciseFilter {
    pub(crate) subject: Option<String>,
    pub(crate) level: Option<String>,
    pub(crate) kind: Option<String>,
    pub(crate) course_id: Option<i64>,
}

pub(crate) async fn create(
    pool: &SqlitePool,
    params: CreateExercise<'_>,
) -> Result<Exercise, sqlx::Error> {
    sqlx::query_as::<_, Exercise>(&format!(
        "INSERT INTO exercises (
            exercise_code, course_id, subject, kind, question, options,
            correct_index, solution, explanation, level, difficulty,
            concepts, estimated_time, source, created_at
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING {COLUMNS}",
    ))
    .bind(params.exercise_code)
    .bind(params.course_id)
    .bind(params.subject)
    .bind(params.kind)
    .bind(params.question)
    .bind(Json(params.options))
    .bind(params.correct_index)
    .bind(params.solution)
    .bind(params.explanation)
    .bind(params.level)
    .bind(params.difficulty)
    .bind(Json(params.concepts))
    .bind(params.estimated_time)
    .bind(params.source)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Exercise>, sqlx::Error> {
    sqlx::query_as::<_, Exercise>(&format!("SELECT {COLUMNS} FROM exercises WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(
    pool: &SqlitePool,
    filter: ExerciseFilter,
) -> Result<Vec<Exercise>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM exercises"));
    let mut has_where = false;

    if let Some(subject) = filter.subject.as_ref() {
        builder.push(" WHERE subject = ");
        builder.push_bind(subject);
        has_where = true;
    }
    if let Some(level) = filter.level.as_ref() {
        builder.push(if has_where { " AND " } else { " WHERE " });
        has_where = true;
        builder.push("level = ");
        builder.push_bind(level);
    }
    if let Some(kind) = filter.kind.as_ref() {
        builder.push(if has_where { " AND " } else { " WHERE " });
        has_where = true;
        builder.push("kind = ");
        builder.push_bind(kind);
    }
    if let Some(course_id) = filter.course_id {
        builder.push(if has_where { " AND " } else { " WHERE " });
        builder.push("course_id = ");
        builder.push_bind(course_id);
    }

    builder.push(" ORDER BY created_at DESC, id DESC");

    builder.build_query_as::<Exercise>().fetch_all(pool).await
}

pub(crate) async fn count_for_course(pool: &SqlitePool, course_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM exercises WHERE course_id = ?")
        .bind(course_id)
        .fetch_one(pool)
        .await
}
