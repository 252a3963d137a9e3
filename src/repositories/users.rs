use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::db::models::User;
use crate::db::types::UserRole;

const COLUMNS: &str = "\
    id, username, email, password_hash, role, full_name, cohort, \
    created_at, last_login, is_active, avatar_url, bio";

pub(crate) struct CreateUser<'a> {
    pub(crate) username: &'a str,
    pub(crate) email: &'a str,
    pub(crate) password_hash: String,
    pub(crate) role: UserRole,
    pub(crate) full_name: Option<&'a str>,
    pub(crate) cohort: Option<&'a str>,
    pub(crate) created_at: time::PrimitiveDateTime,
}

/// Returns `Ok(None)` when the username or email is already taken. This is
/// the one storage error the access layer recovers locally; everything else
/// propagates untouched.
pub(crate) async fn create(
    pool: &SqlitePool,
    params: CreateUser<'_>,
) -> Result<Option<User>, sqlx::Error> {
    let created = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (username, email, password_hash, role, full_name, cohort, created_at, is_active)
         VALUES (?, ?, ?, ?, ?, ?, ?, 1)
         RETURNING {COLUMNS}",
    ))
    .bind(params.username)
    .bind(params.email)
    .bind(params.password_hash)
    .bind(params.role)
    .bind(params.full_name)
    .bind(params.cohort)
    .bind(params.created_at)
    .fetch_one(pool)
    .await;

    match created {
        Ok(user) => Ok(Some(user)),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Ok(None),
        Err(err) => Err(err),
    }
}

pub(crate) async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE username = ?"))
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(
    pool: &SqlitePool,
    role: Option<UserRole>,
) -> Result<Vec<User>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM users"));

    if let Some(role) = role {
        builder.push(" WHERE role = ");
        builder.push_bind(role);
    }

    builder.push(" ORDER BY id ASC");

    builder.build_query_as::<User>().fetch_all(pool).await
}

pub(crate) async fn update_last_login(
    pool: &SqlitePool,
    id: i64,
    at: time::PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
        .bind(at)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
