use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Flashcard;
use crate::services::study_session::ReviewSession;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct FlashcardCreate {
    #[serde(default)]
    pub(crate) user_id: Option<i64>,
    #[validate(length(min = 1))]
    pub(crate) subject: String,
    #[validate(length(min = 1))]
    pub(crate) question: String,
    #[validate(length(min = 1))]
    pub(crate) answer: String,
    #[serde(default)]
    pub(crate) explanation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewSessionRequest {
    #[serde(default)]
    pub(crate) user_id: Option<i64>,
    #[serde(default)]
    pub(crate) subject: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GradeRequest {
    pub(crate) difficulty: String,
    pub(crate) session: ReviewSession,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReviewSessionResponse {
    pub(crate) session: ReviewSession,
    pub(crate) current: Option<FlashcardResponse>,
    pub(crate) remaining: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct FlashcardResponse {
    pub(crate) id: i64,
    pub(crate) user_id: Option<i64>,
    pub(crate) subject: String,
    pub(crate) question: String,
    pub(crate) answer: String,
    pub(crate) explanation: Option<String>,
    pub(crate) created_at: String,
    pub(crate) last_reviewed: Option<String>,
    pub(crate) difficulty: Option<String>,
}

impl FlashcardResponse {
    pub(crate) fn from_db(card: Flashcard) -> Self {
        Self {
            id: card.id,
            user_id: card.user_id,
            subject: card.subject,
            question: card.question,
            answer: card.answer,
            explanation: card.explanation,
            created_at: format_primitive(card.created_at),
            last_reviewed: card.last_reviewed.map(format_primitive),
            difficulty: card.difficulty,
        }
    }
}
