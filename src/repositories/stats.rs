use std::collections::HashMap;

use serde::Serialize;
use sqlx::SqlitePool;

const COUNTED_TABLES: &[&str] =
    &["users", "courses", "exercises", "projects", "flashcards", "portfolios", "forum_posts"];

#[derive(Debug, Serialize)]
pub(crate) struct DatabaseStats {
    pub(crate) totals: HashMap<String, i64>,
    pub(crate) users_by_role: HashMap<String, i64>,
    pub(crate) courses_by_subject: HashMap<String, i64>,
    pub(crate) exercises_by_subject: HashMap<String, i64>,
}

pub(crate) async fn collect(pool: &SqlitePool) -> Result<DatabaseStats, sqlx::Error> {
    let mut totals = HashMap::new();
    for table in COUNTED_TABLES {
        // Table names come from the fixed list above, never from input.
        let count = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await?;
        totals.insert(table.to_string(), count);
    }

    let users_by_role =
        group_counts(pool, "SELECT role, COUNT(*) FROM users GROUP BY role").await?;
    let courses_by_subject =
        group_counts(pool, "SELECT subject, COUNT(*) FROM courses GROUP BY subject").await?;
    let exercises_by_subject =
        group_counts(pool, "SELECT subject, COUNT(*) FROM exercises GROUP BY subject").await?;

    Ok(DatabaseStats { totals, users_by_role, courses_by_subject, exercises_by_subject })
}

async fn group_counts(pool: &SqlitePool, query: &str) -> Result<HashMap<String, i64>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (String, i64)>(query).fetch_all(pool).await?;
    Ok(rows.into_iter().collect())
}
