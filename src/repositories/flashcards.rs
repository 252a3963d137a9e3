use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::db::models::Flashcard;

const COLUMNS: &str = "\
    id, user_id, subject, question, answer, explanation, created_at, \
    last_reviewed, difficulty";

pub(crate) struct CreateFlashcard<'a> {
    pub(crate) user_id: Option<i64>,
    pub(crate) subject: &'a str,
    pub(crate) question: &'a str,
    pub(crate) answer: &'a str,
    pub(crate) explanation: Option<&'a str>,
    pub(crate) created_at: time::PrimitiveDateTime,
}

#[derive(Debug, Default)]
pub(crate) struct FlashcardFilter {
    pub(crate) user_id: Option<i64>,
    pub(crate) subject: Option<String>,
}

pub(crate) async fn create(
    pool: &SqlitePool,
    params: CreateFlashcard<'_>,
) -> Result<Flashcard, sqlx::Error> {
    sqlx::query_as::<_, Flashcard>(&format!(
        "INSERT INTO flashcards (user_id, subject, question, answer, explanation, created_at)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING {COLUMNS}",
    ))
    .bind(params.user_id)
    .bind(params.subject)
    .bind(params.question)
    .bind(params.answer)
    .bind(params.explanation)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Flashcard>, sqlx::Error> {
    sqlx::query_as::<_, Flashcard>(&format!("SELECT {COLUMNS} FROM flashcards WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(
    pool: &SqlitePool,
    filter: FlashcardFilter,
) -> Result<Vec<Flashcard>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM flashcards"));
    let mut has_where = false;

    if let Some(user_id) = filter.user_id {
        builder.push(" WHERE user_id = ");
        builder.push_bind(user_id);
        has_where = true;
    }
    if let Some(subject) = filter.subject.as_ref() {
        builder.push(if has_where { " AND " } else { " WHERE " });
        builder.push("subject = ");
        builder.push_bind(subject);
    }

    builder.push(" ORDER BY id ASC");

    builder.build_query_as::<Flashcard>().fetch_all(pool).await
}

/// Spaced-repetition review outcome: stamps the review time and stores the
/// difficulty the student reported.
pub(crate) async fn record_review(
    pool: &SqlitePool,
    id: i64,
    difficulty: &str,
    reviewed_at: time::PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE flashcards SET last_reviewed = ?, difficulty = ? WHERE id = ?")
        .bind(reviewed_at)
        .bind(difficulty)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
