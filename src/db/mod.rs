pub(crate) mod models;
pub(crate) mod schema;
pub(crate) mod types;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::core::config::Settings;

pub(crate) async fn init_pool(settings: &Settings) -> anyhow::Result<SqlitePool> {
    let connect_options = match &settings.database().database_url {
        Some(url) => SqliteConnectOptions::from_str(url)?,
        None => {
            std::fs::create_dir_all(&settings.database().data_dir)?;
            SqliteConnectOptions::new()
                .filename(settings.database().database_path())
                .create_if_missing(true)
        }
    }
    .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect_with(connect_options)
        .await?;

    Ok(pool)
}

/// Create every table and index. Safe to call on every startup.
pub(crate) async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in schema::SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::test_support::memory_pool;

    #[tokio::test]
    async fn init_schema_is_idempotent() {
        // memory_pool already applied the schema once.
        let pool = memory_pool().await;

        super::init_schema(&pool).await.expect("second init");

        sqlx::query("INSERT INTO users (username, email, password_hash, role) VALUES ('u', 'u@e', 'h', 'student')")
            .execute(&pool)
            .await
            .expect("insert");

        // A third run must not touch existing rows either.
        super::init_schema(&pool).await.expect("third init");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(count, 1);
    }
}
