use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::db::models::{Portfolio, PortfolioProject, PortfolioSkill};
use crate::db::types::SkillLevel;

const COLUMNS: &str = "\
    id, user_id, full_name, headline, bio, email, github, linkedin, \
    created_at, updated_at";

const PROJECT_COLUMNS: &str = "\
    id, portfolio_id, title, description, category, duration, technologies, \
    github, demo, results";

pub(crate) struct PortfolioInfo<'a> {
    pub(crate) full_name: Option<&'a str>,
    pub(crate) headline: Option<&'a str>,
    pub(crate) bio: Option<&'a str>,
    pub(crate) email: Option<&'a str>,
    pub(crate) github: Option<&'a str>,
    pub(crate) linkedin: Option<&'a str>,
}

pub(crate) struct CreatePortfolioProject<'a> {
    pub(crate) portfolio_id: i64,
    pub(crate) title: &'a str,
    pub(crate) description: &'a str,
    pub(crate) category: Option<&'a str>,
    pub(crate) duration: Option<&'a str>,
    pub(crate) technologies: Vec<String>,
    pub(crate) github: Option<&'a str>,
    pub(crate) demo: Option<&'a str>,
    pub(crate) results: Option<&'a str>,
}

/// One portfolio per user: creates the row on first call, updates it in
/// place afterwards. Returns the portfolio id either way.
pub(crate) async fn create_or_update(
    pool: &SqlitePool,
    user_id: i64,
    info: PortfolioInfo<'_>,
    now: time::PrimitiveDateTime,
) -> Result<i64, sqlx::Error> {
    let existing =
        sqlx::query_scalar::<_, i64>("SELECT id FROM portfolios WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    if let Some(portfolio_id) = existing {
        sqlx::query(
            "UPDATE portfolios
             SET full_name = ?, headline = ?, bio = ?, email = ?,
                 github = ?, linkedin = ?, updated_at = ?
             WHERE user_id = ?",
        )
        .bind(info.full_name)
        .bind(info.headline)
        .bind(info.bio)
        .bind(info.email)
        .bind(info.github)
        .bind(info.linkedin)
        .bind(now)
        .bind(user_id)
        .execute(pool)
        .await?;
        return Ok(portfolio_id);
    }

    let portfolio_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO portfolios (user_id, full_name, headline, bio, email, github, linkedin, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING id",
    )
    .bind(user_id)
    .bind(info.full_name)
    .bind(info.headline)
    .bind(info.bio)
    .bind(info.email)
    .bind(info.github)
    .bind(info.linkedin)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(portfolio_id)
}

pub(crate) async fn find_by_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Option<Portfolio>, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(&format!("SELECT {COLUMNS} FROM portfolios WHERE user_id = ?"))
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Child projects and skills go with the portfolio (ON DELETE CASCADE).
pub(crate) async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM portfolios WHERE id = ?").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn add_project(
    pool: &SqlitePool,
    params: CreatePortfolioProject<'_>,
) -> Result<PortfolioProject, sqlx::Error> {
    sqlx::query_as::<_, PortfolioProject>(&format!(
        "INSERT INTO portfolio_projects (
            portfolio_id, title, description, category, duration,
            technologies, github, demo, results
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING {PROJECT_COLUMNS}",
    ))
    .bind(params.portfolio_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.category)
    .bind(params.duration)
    .bind(Json(params.technologies))
    .bind(params.github)
    .bind(params.demo)
    .bind(params.results)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_projects(
    pool: &SqlitePool,
    portfolio_id: i64,
) -> Result<Vec<PortfolioProject>, sqlx::Error> {
    sqlx::query_as::<_, PortfolioProject>(&format!(
        "SELECT {PROJECT_COLUMNS} FROM portfolio_projects WHERE portfolio_id = ? ORDER BY id ASC",
    ))
    .bind(portfolio_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn delete_project(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM portfolio_projects WHERE id = ?").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn add_skill(
    pool: &SqlitePool,
    portfolio_id: i64,
    skill: &str,
    level: SkillLevel,
) -> Result<PortfolioSkill, sqlx::Error> {
    sqlx::query_as::<_, PortfolioSkill>(
        "INSERT INTO portfolio_skills (portfolio_id, skill, level)
         VALUES (?, ?, ?)
         RETURNING id, portfolio_id, skill, level",
    )
    .bind(portfolio_id)
    .bind(skill)
    .bind(level)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_skills(
    pool: &SqlitePool,
    portfolio_id: i64,
) -> Result<Vec<PortfolioSkill>, sqlx::Error> {
    sqlx::query_as::<_, PortfolioSkill>(
        "SELECT id, portfolio_id, skill, level FROM portfolio_skills
         WHERE portfolio_id = ? ORDER BY id ASC",
    )
    .bind(portfolio_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update_skill_level(
    pool: &SqlitePool,
    skill_id: i64,
    level: SkillLevel,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE portfolio_skills SET level = ? WHERE id = ?")
        .bind(level)
        .bind(skill_id)
        .execute(pool)
        .await?;
    Ok(())
}
