use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, put};
use axum::{Json, Router};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories::{portfolios, users};
use crate::schemas::portfolio::{
    PortfolioProjectCreate, PortfolioProjectResponse, PortfolioResponse, PortfolioUpsert,
    SkillCreate, SkillLevelUpdate, SkillResponse,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:user_id", put(upsert_portfolio).get(get_portfolio).delete(delete_portfolio))
        .route("/:user_id/projects", get(list_projects).post(add_project))
        .route("/:user_id/skills", get(list_skills).post(add_skill))
        .route("/projects/:project_id", delete(delete_project))
        .route("/skills/:skill_id", patch(update_skill))
}

async fn upsert_portfolio(
    Path(user_id): Path<i64>,
    state: State<AppState>,
    Json(payload): Json<PortfolioUpsert>,
) -> Result<Json<PortfolioResponse>, ApiError> {
    let user = users::find_by_id(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?;
    if user.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    portfolios::create_or_update(
        state.db(),
        user_id,
        portfolios::PortfolioInfo {
            full_name: payload.full_name.as_deref(),
            headline: payload.headline.as_deref(),
            bio: payload.bio.as_deref(),
            email: payload.email.as_deref(),
            github: payload.github.as_deref(),
            linkedin: payload.linkedin.as_deref(),
        },
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to upsert portfolio"))?;

    let portfolio = fetch_portfolio(&state, user_id).await?;
    Ok(Json(PortfolioResponse::from_db(portfolio)))
}

async fn get_portfolio(
    Path(user_id): Path<i64>,
    state: State<AppState>,
) -> Result<Json<PortfolioResponse>, ApiError> {
    let portfolio = fetch_portfolio(&state, user_id).await?;
    Ok(Json(PortfolioResponse::from_db(portfolio)))
}

/// Takes effect immediately and removes the child projects and skills with
/// the profile.
async fn delete_portfolio(
    Path(user_id): Path<i64>,
    state: State<AppState>,
) -> Result<StatusCode, ApiError> {
    let portfolio = fetch_portfolio(&state, user_id).await?;

    portfolios::delete(state.db(), portfolio.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete portfolio"))?;

    Ok(StatusCode::NO_CONTENT)
}

async fn add_project(
    Path(user_id): Path<i64>,
    state: State<AppState>,
    Json(payload): Json<PortfolioProjectCreate>,
) -> Result<(StatusCode, Json<PortfolioProjectResponse>), ApiError> {
    payload.validate().map_err(ApiError::validation)?;

    let portfolio = fetch_portfolio(&state, user_id).await?;

    let project = portfolios::add_project(
        state.db(),
        portfolios::CreatePortfolioProject {
            portfolio_id: portfolio.id,
            title: payload.title.trim(),
            description: &payload.description,
            category: payload.category.as_deref(),
            duration: payload.duration.as_deref(),
            technologies: payload.technologies,
            github: payload.github.as_deref(),
            demo: payload.demo.as_deref(),
            results: payload.results.as_deref(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to add portfolio project"))?;

    Ok((StatusCode::CREATED, Json(PortfolioProjectResponse::from_db(project))))
}

async fn list_projects(
    Path(user_id): Path<i64>,
    state: State<AppState>,
) -> Result<Json<Vec<PortfolioProjectResponse>>, ApiError> {
    let portfolio = fetch_portfolio(&state, user_id).await?;

    let projects = portfolios::list_projects(state.db(), portfolio.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list portfolio projects"))?;

    Ok(Json(projects.into_iter().map(PortfolioProjectResponse::from_db).collect()))
}

/// Takes effect immediately with no confirmation step and no undo.
async fn delete_project(
    Path(project_id): Path<i64>,
    state: State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = portfolios::delete_project(state.db(), project_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete portfolio project"))?;

    if !deleted {
        return Err(ApiError::NotFound("Portfolio project not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn add_skill(
    Path(user_id): Path<i64>,
    state: State<AppState>,
    Json(payload): Json<SkillCreate>,
) -> Result<(StatusCode, Json<SkillResponse>), ApiError> {
    payload.validate().map_err(ApiError::validation)?;

    let portfolio = fetch_portfolio(&state, user_id).await?;

    let skill = portfolios::add_skill(state.db(), portfolio.id, payload.skill.trim(), payload.level)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to add skill"))?;

    Ok((StatusCode::CREATED, Json(SkillResponse::from_db(skill))))
}

async fn list_skills(
    Path(user_id): Path<i64>,
    state: State<AppState>,
) -> Result<Json<Vec<SkillResponse>>, ApiError> {
    let portfolio = fetch_portfolio(&state, user_id).await?;

    let skills = portfolios::list_skills(state.db(), portfolio.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list skills"))?;

    Ok(Json(skills.into_iter().map(SkillResponse::from_db).collect()))
}

async fn update_skill(
    Path(skill_id): Path<i64>,
    state: State<AppState>,
    Json(payload): Json<SkillLevelUpdate>,
) -> Result<StatusCode, ApiError> {
    portfolios::update_skill_level(state.db(), skill_id, payload.level)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update skill"))?;

    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_portfolio(
    state: &AppState,
    user_id: i64,
) -> Result<crate::db::models::Portfolio, ApiError> {
    portfolios::find_by_user(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch portfolio"))?
        .ok_or_else(|| ApiError::NotFound("Portfolio not found".to_string()))
}
