use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories::forum;
use crate::schemas::forum::{
    PostCreate, PostDetailResponse, PostResponse, ReplyCreate, ReplyResponse,
};

#[derive(Debug, Deserialize)]
pub(crate) struct PostListQuery {
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    resolved: Option<bool>,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/:post_id", get(get_post).delete(delete_post))
        .route("/posts/:post_id/replies", post(add_reply))
        .route("/posts/:post_id/resolve", post(resolve_post))
}

async fn create_post(
    state: State<AppState>,
    Json(payload): Json<PostCreate>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    payload.validate().map_err(ApiError::validation)?;

    let post = forum::create_post(
        state.db(),
        forum::CreatePost {
            user_id: payload.user_id,
            author: payload.author.trim(),
            title: payload.title.trim(),
            subject: payload.subject.trim(),
            body: &payload.body,
            code: payload.code.as_deref(),
            tags: payload.tags,
            posted_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create post"))?;

    Ok((StatusCode::CREATED, Json(PostResponse::from_db(post))))
}

async fn list_posts(
    Query(params): Query<PostListQuery>,
    state: State<AppState>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = forum::list_posts(
        state.db(),
        forum::PostFilter { subject: params.subject, resolved: params.resolved },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list posts"))?;

    Ok(Json(posts.into_iter().map(PostResponse::from_db).collect()))
}

async fn get_post(
    Path(post_id): Path<i64>,
    state: State<AppState>,
) -> Result<Json<PostDetailResponse>, ApiError> {
    let post = forum::find_post(state.db(), post_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch post"))?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    let replies = forum::list_replies(state.db(), post_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list replies"))?;

    Ok(Json(PostDetailResponse {
        post: PostResponse::from_db(post),
        replies: replies.into_iter().map(ReplyResponse::from_db).collect(),
    }))
}

async fn add_reply(
    Path(post_id): Path<i64>,
    state: State<AppState>,
    Json(payload): Json<ReplyCreate>,
) -> Result<(StatusCode, Json<ReplyResponse>), ApiError> {
    payload.validate().map_err(ApiError::validation)?;

    let post = forum::find_post(state.db(), post_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch post"))?;
    if post.is_none() {
        return Err(ApiError::NotFound("Post not found".to_string()));
    }

    let reply = forum::add_reply(
        state.db(),
        forum::CreateReply {
            post_id,
            user_id: payload.user_id,
            author: payload.author.trim(),
            body: &payload.body,
            code: payload.code.as_deref(),
            replied_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create reply"))?;

    Ok((StatusCode::CREATED, Json(ReplyResponse::from_db(reply))))
}

async fn resolve_post(
    Path(post_id): Path<i64>,
    state: State<AppState>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = forum::find_post(state.db(), post_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch post"))?;
    if post.is_none() {
        return Err(ApiError::NotFound("Post not found".to_string()));
    }

    forum::mark_resolved(state.db(), post_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve post"))?;

    let post = forum::find_post(state.db(), post_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch post"))?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    Ok(Json(PostResponse::from_db(post)))
}

async fn delete_post(
    Path(post_id): Path<i64>,
    state: State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = forum::delete_post(state.db(), post_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete post"))?;

    if !deleted {
        return Err(ApiError::NotFound("Post not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::test_support;

    async fn create_post(context: &test_support::TestContext) -> i64 {
        let response = context
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/forum/posts",
                Some(json!({"author": "A", "subject": "Python", "title": "T", "body": "B"})),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        test_support::read_json(response).await["id"].as_i64().expect("id")
    }

    #[tokio::test]
    async fn replies_keep_insertion_order_and_resolution_is_explicit() {
        let context = test_support::setup_test_context().await;
        let post_id = create_post(&context).await;

        for body in ["first answer", "second answer"] {
            let response = context
                .app
                .clone()
                .oneshot(test_support::json_request(
                    Method::POST,
                    &format!("/api/v1/forum/posts/{post_id}/replies"),
                    Some(json!({"author": "B", "body": body})),
                ))
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let detail = test_support::read_json(
            context
                .app
                .clone()
                .oneshot(test_support::json_request(
                    Method::GET,
                    &format!("/api/v1/forum/posts/{post_id}"),
                    None,
                ))
                .await
                .expect("response"),
        )
        .await;

        let replies = detail["replies"].as_array().expect("replies");
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0]["body"], "first answer");
        assert_eq!(replies[1]["body"], "second answer");
        // Replying never resolves the post by itself.
        assert_eq!(detail["resolved"], false);

        let resolved = test_support::read_json(
            context
                .app
                .clone()
                .oneshot(test_support::json_request(
                    Method::POST,
                    &format!("/api/v1/forum/posts/{post_id}/resolve"),
                    None,
                ))
                .await
                .expect("response"),
        )
        .await;
        assert_eq!(resolved["resolved"], true);
    }

    #[tokio::test]
    async fn deleting_a_post_cascades_to_replies() {
        let context = test_support::setup_test_context().await;
        let post_id = create_post(&context).await;

        for _ in 0..2 {
            context
                .app
                .clone()
                .oneshot(test_support::json_request(
                    Method::POST,
                    &format!("/api/v1/forum/posts/{post_id}/replies"),
                    Some(json!({"author": "B", "body": "r"})),
                ))
                .await
                .expect("response");
        }

        let delete = context
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::DELETE,
                &format!("/api/v1/forum/posts/{post_id}"),
                None,
            ))
            .await
            .expect("response");
        assert_eq!(delete.status(), StatusCode::NO_CONTENT);

        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM forum_replies WHERE post_id = ?")
            .bind(post_id)
            .fetch_one(context.state.db())
            .await
            .expect("count");
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn posts_filter_by_subject_and_resolution() {
        let context = test_support::setup_test_context().await;
        let python_post = create_post(&context).await;

        context
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/forum/posts",
                Some(json!({"author": "A", "subject": "SQL", "title": "T2", "body": "B2"})),
            ))
            .await
            .expect("response");

        let python_only = test_support::read_json(
            context
                .app
                .clone()
                .oneshot(test_support::json_request(
                    Method::GET,
                    "/api/v1/forum/posts?subject=Python",
                    None,
                ))
                .await
                .expect("response"),
        )
        .await;
        assert_eq!(python_only.as_array().expect("array").len(), 1);
        assert_eq!(python_only[0]["id"].as_i64(), Some(python_post));

        let unresolved = test_support::read_json(
            context
                .app
                .clone()
                .oneshot(test_support::json_request(
                    Method::GET,
                    "/api/v1/forum/posts?resolved=false",
                    None,
                ))
                .await
                .expect("response"),
        )
        .await;
        assert_eq!(unresolved.as_array().expect("array").len(), 2);
    }
}
