use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{ForumPost, ForumReply};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct PostCreate {
    #[serde(default)]
    pub(crate) user_id: Option<i64>,
    #[validate(length(min = 1))]
    pub(crate) author: String,
    #[validate(length(min = 1))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) subject: String,
    #[validate(length(min = 1))]
    pub(crate) body: String,
    #[serde(default)]
    pub(crate) code: Option<String>,
    #[serde(default)]
    pub(crate) tags: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ReplyCreate {
    #[serde(default)]
    pub(crate) user_id: Option<i64>,
    #[validate(length(min = 1))]
    pub(crate) author: String,
    #[validate(length(min = 1))]
    pub(crate) body: String,
    #[serde(default)]
    pub(crate) code: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PostResponse {
    pub(crate) id: i64,
    pub(crate) user_id: Option<i64>,
    pub(crate) author: String,
    pub(crate) title: String,
    pub(crate) subject: String,
    pub(crate) body: String,
    pub(crate) code: Option<String>,
    pub(crate) tags: Vec<String>,
    pub(crate) posted_at: String,
    pub(crate) resolved: bool,
}

impl PostResponse {
    pub(crate) fn from_db(post: ForumPost) -> Self {
        Self {
            id: post.id,
            user_id: post.user_id,
            author: post.author,
            title: post.title,
            subject: post.subject,
            body: post.body,
            code: post.code,
            tags: post.tags.0,
            posted_at: format_primitive(post.posted_at),
            resolved: post.resolved,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PostDetailResponse {
    #[serde(flatten)]
    pub(crate) post: PostResponse,
    pub(crate) replies: Vec<ReplyResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReplyResponse {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) user_id: Option<i64>,
    pub(crate) author: String,
    pub(crate) body: String,
    pub(crate) code: Option<String>,
    pub(crate) replied_at: String,
}

impl ReplyResponse {
    pub(crate) fn from_db(reply: ForumReply) -> Self {
        Self {
            id: reply.id,
            post_id: reply.post_id,
            user_id: reply.user_id,
            author: reply.author,
            body: reply.body,
            code: reply.code,
            replied_at: format_primitive(reply.replied_at),
        }
    }
}
