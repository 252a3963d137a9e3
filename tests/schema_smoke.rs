use sqlx::Row;

#[tokio::test]
async fn schema_applies_and_tables_exist() -> anyhow::Result<()> {
    let pool = dshub_rust::init_store("sqlite::memory:").await?;

    let tables = [
        "users",
        "courses",
        "exercises",
        "projects",
        "flashcards",
        "portfolios",
        "portfolio_projects",
        "portfolio_skills",
        "forum_posts",
        "forum_replies",
        "business_case_submissions",
        "student_progress",
    ];

    for table in tables {
        let row = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(table)
            .fetch_optional(&pool)
            .await?;
        assert!(row.is_some(), "expected table {table} to exist after init");
    }

    let indexes = [
        "idx_courses_subject",
        "idx_courses_teacher",
        "idx_exercises_subject",
        "idx_exercises_course",
        "idx_forum_subject",
        "idx_users_role",
    ];

    for index in indexes {
        let row = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'index' AND name = ?")
            .bind(index)
            .fetch_optional(&pool)
            .await?;
        assert!(row.is_some(), "expected index {index} to exist after init");
    }

    let foreign_keys: i64 = sqlx::query("PRAGMA foreign_keys")
        .fetch_one(&pool)
        .await?
        .get(0);
    assert_eq!(foreign_keys, 1, "foreign key enforcement must be on");

    Ok(())
}
