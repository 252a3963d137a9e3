use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use time::Date;

use crate::db::models::{Project, ProjectTask};
use crate::db::types::ProjectStatus;

const COLUMNS: &str = "\
    id, user_id, name, kind, description, start_date, end_date, status, \
    technologies, tasks, created_at, updated_at";

pub(crate) struct CreateProject<'a> {
    pub(crate) user_id: Option<i64>,
    pub(crate) name: &'a str,
    pub(crate) kind: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) start_date: Option<Date>,
    pub(crate) end_date: Option<Date>,
    pub(crate) status: ProjectStatus,
    pub(crate) technologies: Vec<String>,
    pub(crate) tasks: Vec<ProjectTask>,
    pub(crate) created_at: time::PrimitiveDateTime,
}

#[derive(Debug, Default)]
pub(crate) struct ProjectFilter {
    pub(crate) user_id: Option<i64>,
    pub(crate) status: Option<ProjectStatus>,
}

pub(crate) struct UpdateProject {
    pub(crate) name: Option<String>,
    pub(crate) kind: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) status: Option<ProjectStatus>,
    pub(crate) technologies: Option<Vec<String>>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &SqlitePool,
    params: CreateProject<'_>,
) -> Result<Project, sqlx::Error> {
    sqlx::query_as::<_, Project>(&format!(
        "INSERT INTO projects (
            user_id, name, kind, description, start_date, end_date,
            status, technologies, tasks, created_at, updated_at
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING {COLUMNS}",
    ))
    .bind(params.user_id)
    .bind(params.name)
    .bind(params.kind)
    .bind(params.description)
    .bind(params.start_date)
    .bind(params.end_date)
    .bind(params.status)
    .bind(Json(params.technologies))
    .bind(Json(params.tasks))
    .bind(params.created_at)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(&format!("SELECT {COLUMNS} FROM projects WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(
    pool: &SqlitePool,
    filter: ProjectFilter,
) -> Result<Vec<Project>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM projects"));
    let mut has_where = false;

    if let Some(user_id) = filter.user_id {
        builder.push(" WHERE user_id = ");
        builder.push_bind(user_id);
        has_where = true;
    }
    if let Some(status) = filter.status {
        builder.push(if has_where { " AND " } else { " WHERE " });
        builder.push("status = ");
        builder.push_bind(status);
    }

    builder.push(" ORDER BY id ASC");

    builder.build_query_as::<Project>().fetch_all(pool).await
}

pub(crate) async fn update(
    pool: &SqlitePool,
    id: i64,
    params: UpdateProject,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE projects SET
            name = COALESCE(?, name),
            kind = COALESCE(?, kind),
            description = COALESCE(?, description),
            status = COALESCE(?, status),
            technologies = COALESCE(?, technologies),
            updated_at = ?
         WHERE id = ?",
    )
    .bind(params.name)
    .bind(params.kind)
    .bind(params.description)
    .bind(params.status)
    .bind(params.technologies.map(Json))
    .bind(params.updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Replaces the whole task list; callers mutate the decoded list and write
/// it back, which keeps element order stable.
pub(crate) async fn set_tasks(
    pool: &SqlitePool,
    id: i64,
    tasks: Vec<ProjectTask>,
    updated_at: time::PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE projects SET tasks = ?, updated_at = ? WHERE id = ?")
        .bind(Json(tasks))
        .bind(updated_at)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM projects WHERE id = ?").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
