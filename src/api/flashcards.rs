use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories::flashcards;
use crate::schemas::flashcard::{
    FlashcardCreate, FlashcardResponse, GradeRequest, ReviewSessionRequest, ReviewSessionResponse,
};
use crate::services::study_session::ReviewSession;

#[derive(Debug, Deserialize)]
pub(crate) struct FlashcardListQuery {
    #[serde(default)]
    user_id: Option<i64>,
    #[serde(default)]
    subject: Option<String>,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_flashcards).post(create_flashcard))
        .route("/review-session", post(start_review_session))
        .route("/:flashcard_id/review", post(grade_flashcard))
}

async fn create_flashcard(
    state: State<AppState>,
    Json(payload): Json<FlashcardCreate>,
) -> Result<(StatusCode, Json<FlashcardResponse>), ApiError> {
    payload.validate().map_err(ApiError::validation)?;

    let card = flashcards::create(
        state.db(),
        flashcards::CreateFlashcard {
            user_id: payload.user_id,
            subject: payload.subject.trim(),
            question: &payload.question,
            answer: &payload.answer,
            explanation: payload.explanation.as_deref(),
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create flashcard"))?;

    Ok((StatusCode::CREATED, Json(FlashcardResponse::from_db(card))))
}

async fn list_flashcards(
    Query(params): Query<FlashcardListQuery>,
    state: State<AppState>,
) -> Result<Json<Vec<FlashcardResponse>>, ApiError> {
    let cards = flashcards::list(
        state.db(),
        flashcards::FlashcardFilter { user_id: params.user_id, subject: params.subject },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list flashcards"))?;

    Ok(Json(cards.into_iter().map(FlashcardResponse::from_db).collect()))
}

/// Open a review session over the matching cards. The returned session
/// object is the only session state; the client hands it back with each
/// grade call.
async fn start_review_session(
    state: State<AppState>,
    Json(payload): Json<ReviewSessionRequest>,
) -> Result<Json<ReviewSessionResponse>, ApiError> {
    let cards = flashcards::list(
        state.db(),
        flashcards::FlashcardFilter { user_id: payload.user_id, subject: payload.subject },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list flashcards"))?;

    let session = ReviewSession::new(cards.iter().map(|card| card.id).collect());
    let current = session
        .current()
        .and_then(|id| cards.into_iter().find(|card| card.id == id))
        .map(FlashcardResponse::from_db);
    let remaining = session.remaining();

    Ok(Json(ReviewSessionResponse { session, current, remaining }))
}

/// Grade the current card of the session: persists the difficulty and
/// review timestamp, advances the cursor, and returns the next card.
async fn grade_flashcard(
    Path(flashcard_id): Path<i64>,
    state: State<AppState>,
    Json(payload): Json<GradeRequest>,
) -> Result<Json<ReviewSessionResponse>, ApiError> {
    let mut session = payload.session;

    if session.current() != Some(flashcard_id) {
        return Err(ApiError::BadRequest(format!(
            "Flashcard {flashcard_id} is not the current card of this session"
        )));
    }

    let card = flashcards::find_by_id(state.db(), flashcard_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch flashcard"))?;
    if card.is_none() {
        return Err(ApiError::NotFound("Flashcard not found".to_string()));
    }

    flashcards::record_review(state.db(), flashcard_id, payload.difficulty.trim(), primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to record review"))?;

    session.advance();

    let current = match session.current() {
        Some(next_id) => flashcards::find_by_id(state.db(), next_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to fetch flashcard"))?
            .map(FlashcardResponse::from_db),
        None => None,
    };
    let remaining = session.remaining();

    Ok(Json(ReviewSessionResponse { session, current, remaining }))
}
