//! Forum posts and their replies.
//!
//! No transaction spans a post-create plus its first reply-create; a crash
//! in between leaves a post with zero replies, which is a valid state.

use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::db::models::{ForumPost, ForumReply};

const POST_COLUMNS: &str = "\
    id, user_id, author, title, subject, body, code, tags, posted_at, resolved";

const REPLY_COLUMNS: &str = "id, post_id, user_id, author, body, code, replied_at";

pub(crate) struct CreatePost<'a> {
    pub(crate) user_id: Option<i64>,
    pub(crate) author: &'a str,
    pub(crate) title: &'a str,
    pub(crate) subject: &'a str,
    pub(crate) body: &'a str,
    pub(crate) code: Option<&'a str>,
    pub(crate) tags: Vec<String>,
    pub(crate) posted_at: time::PrimitiveDateTime,
}

pub(crate) struct CreateReply<'a> {
    pub(crate) post_id: i64,
    pub(crate) user_id: Option<i64>,
    pub(crate) author: &'a str,
    pub(crate) body: &'a str,
    pub(crate) code: Option<&'a str>,
    pub(crate) replied_at: time::PrimitiveDateTime,
}

#[derive(Debug, Default)]
pub(crate) struct PostFilter {
    pub(crate) subject: Option<String>,
    pub(crate) resolved: Option<bool>,
}

pub(crate) async fn create_post(
    pool: &SqlitePool,
    params: CreatePost<'_>,
) -> Result<ForumPost, sqlx::Error> {
    sqlx::query_as::<_, ForumPost>(&format!(
        "INSERT INTO forum_posts (user_id, author, title, subject, body, code, tags, posted_at, resolved)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0)
         RETURNING {POST_COLUMNS}",
    ))
    .bind(params.user_id)
    .bind(params.author)
    .bind(params.title)
    .bind(params.subject)
    .bind(params.body)
    .bind(params.code)
    .bind(Json(params.tags))
    .bind(params.posted_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_post(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<ForumPost>, sqlx::Error> {
    sqlx::query_as::<_, ForumPost>(&format!("SELECT {POST_COLUMNS} FROM forum_posts WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_posts(
    pool: &SqlitePool,
    filter: PostFilter,
) -> Result<Vec<ForumPost>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new(format!("SELECT {POST_COLUMNS} FROM forum_posts"));
    let mut has_where = false;

    if let Some(subject) = filter.subject.as_ref() {
        builder.push(" WHERE subject = ");
        builder.push_bind(subject);
        has_where = true;
    }
    if let Some(resolved) = filter.resolved {
        builder.push(if has_where { " AND " } else { " WHERE " });
        builder.push("resolved = ");
        builder.push_bind(resolved);
    }

    builder.push(" ORDER BY posted_at DESC, id DESC");

    builder.build_query_as::<ForumPost>().fetch_all(pool).await
}

/// Resolution is explicit, never a side effect of replying.
pub(crate) async fn mark_resolved(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE forum_posts SET resolved = 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Replies go with the post (ON DELETE CASCADE).
pub(crate) async fn delete_post(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM forum_posts WHERE id = ?").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn add_reply(
    pool: &SqlitePool,
    params: CreateReply<'_>,
) -> Result<ForumReply, sqlx::Error> {
    sqlx::query_as::<_, ForumReply>(&format!(
        "INSERT INTO forum_replies (post_id, user_id, author, body, code, replied_at)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING {REPLY_COLUMNS}",
    ))
    .bind(params.post_id)
    .bind(params.user_id)
    .bind(params.author)
    .bind(params.body)
    .bind(params.code)
    .bind(params.replied_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_replies(
    pool: &SqlitePool,
    post_id: i64,
) -> Result<Vec<ForumReply>, sqlx::Error> {
    sqlx::query_as::<_, ForumReply>(&format!(
        "SELECT {REPLY_COLUMNS} FROM forum_replies WHERE post_id = ? ORDER BY id ASC",
    ))
    .bind(post_id)
    .fetch_all(pool)
    .await
}
