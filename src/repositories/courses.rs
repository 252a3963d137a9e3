use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::db::models::Course;

const COLUMNS: &str = "\
    id, course_code, teacher_id, teacher_name, subject, chapter, level, \
    content, keywords, uploaded_at, visible, exercises_generated";

pub(crate) struct CreateCourse<'a> {
    pub(crate) course_code: &'a str,
    pub(crate) teacher_id: Option<i64>,
    pub(crate) teacher_name: &'a str,
    pub(crate) subject: &'a str,
    pub(crate) chapter: &'a str,
    pub(crate) level: &'a str,
    pub(crate) content: &'a str,
    pub(crate) keywords: Vec<String>,
    pub(crate) visible: bool,
    pub(crate) uploaded_at: time::PrimitiveDateTime,
}

#[derive(Debug, Default)]
pub(crate) struct CourseFilter {
    pub(crate) subject: Option<String>,
    pub(crate) teacher_name: Option<String>,
    pub(crate) visible_only: bool,
}

pub(crate) async fn create(
    pool: &SqlitePool,
    params: CreateCourse<'_>,
) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "INSERT INTO courses (
            course_code, teacher_id, teacher_name, subject, chapter,
            level, content, keywords, visible, uploaded_at
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING {COLUMNS}",
    ))
    .bind(params.course_code)
    .bind(params.teacher_id)
    .bind(params.teacher_name)
    .bind(params.subject)
    .bind(params.chapter)
    .bind(params.level)
    .bind(params.content)
    .bind(Json(params.keywords))
    .bind(params.visible)
    .bind(params.uploaded_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COLUMNS} FROM courses WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(
    pool: &SqlitePool,
    filter: CourseFilter,
) -> Result<Vec<Course>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM courses"));
    let mut has_where = false;

    if filter.visible_only {
        builder.push(" WHERE visible = 1");
        has_where = true;
    }
    if let Some(subject) = filter.subject.as_ref() {
        builder.push(if has_where { " AND " } else { " WHERE " });
        has_where = true;
        builder.push("subject = ");
        builder.push_bind(subject);
    }
    if let Some(teacher_name) = filter.teacher_name.as_ref() {
        builder.push(if has_where { " AND " } else { " WHERE " });
        builder.push("teacher_name = ");
        builder.push_bind(teacher_name);
    }

    builder.push(" ORDER BY uploaded_at DESC, id DESC");

    builder.build_query_as::<Course>().fetch_all(pool).await
}

pub(crate) async fn set_exercise_count(
    pool: &SqlitePool,
    id: i64,
    count: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE courses SET exercises_generated = ? WHERE id = ?")
        .bind(count)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn set_visibility(
    pool: &SqlitePool,
    id: i64,
    visible: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE courses SET visible = ? WHERE id = ?")
        .bind(visible)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Associated exercises go with the course (ON DELETE CASCADE).
pub(crate) async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM courses WHERE id = ?").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
