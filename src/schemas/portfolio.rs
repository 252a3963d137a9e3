use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Portfolio, PortfolioProject, PortfolioSkill};
use crate::db::types::SkillLevel;

#[derive(Debug, Deserialize)]
pub(crate) struct PortfolioUpsert {
    #[serde(default)]
    pub(crate) full_name: Option<String>,
    #[serde(default)]
    pub(crate) headline: Option<String>,
    #[serde(default)]
    pub(crate) bio: Option<String>,
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) github: Option<String>,
    #[serde(default)]
    pub(crate) linkedin: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct PortfolioProjectCreate {
    #[validate(length(min = 1))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) description: String,
    #[serde(default)]
    pub(crate) category: Option<String>,
    #[serde(default)]
    pub(crate) duration: Option<String>,
    #[serde(default)]
    pub(crate) technologies: Vec<String>,
    #[serde(default)]
    pub(crate) github: Option<String>,
    #[serde(default)]
    pub(crate) demo: Option<String>,
    #[serde(default)]
    pub(crate) results: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SkillCreate {
    #[validate(length(min = 1))]
    pub(crate) skill: String,
    pub(crate) level: SkillLevel,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SkillLevelUpdate {
    pub(crate) level: SkillLevel,
}

#[derive(Debug, Serialize)]
pub(crate) struct PortfolioResponse {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) full_name: Option<String>,
    pub(crate) headline: Option<String>,
    pub(crate) bio: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) github: Option<String>,
    pub(crate) linkedin: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl PortfolioResponse {
    pub(crate) fn from_db(portfolio: Portfolio) -> Self {
        Self {
            id: portfolio.id,
            user_id: portfolio.user_id,
            full_name: portfolio.full_name,
            headline: portfolio.headline,
            bio: portfolio.bio,
            email: portfolio.email,
            github: portfolio.github,
            linkedin: portfolio.linkedin,
            created_at: format_primitive(portfolio.created_at),
            updated_at: format_primitive(portfolio.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PortfolioProjectResponse {
    pub(crate) id: i64,
    pub(crate) portfolio_id: i64,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) category: Option<String>,
    pub(crate) duration: Option<String>,
    pub(crate) technologies: Vec<String>,
    pub(crate) github: Option<String>,
    pub(crate) demo: Option<String>,
    pub(crate) results: Option<String>,
}

impl PortfolioProjectResponse {
    pub(crate) fn from_db(project: PortfolioProject) -> Self {
        Self {
            id: project.id,
            portfolio_id: project.portfolio_id,
            title: project.title,
            description: project.description,
            category: project.category,
            duration: project.duration,
            technologies: project.technologies.0,
            github: project.github,
            demo: project.demo,
            results: project.results,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SkillResponse {
    pub(crate) id: i64,
    pub(crate) portfolio_id: i64,
    pub(crate) skill: String,
    pub(crate) level: SkillLevel,
}

impl SkillResponse {
    pub(crate) fn from_db(skill: PortfolioSkill) -> Self {
        Self { id: skill.id, portfolio_id: skill.portfolio_id, skill: skill.skill, level: skill.level }
    }
}
