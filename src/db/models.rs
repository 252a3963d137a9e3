use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::{Date, PrimitiveDateTime};

use crate::db::types::{ProjectStatus, SkillLevel, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password_hash: String,
    pub(crate) role: UserRole,
    pub(crate) full_name: Option<String>,
    pub(crate) cohort: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) last_login: Option<PrimitiveDateTime>,
    pub(crate) is_active: bool,
    pub(crate) avatar_url: Option<String>,
    pub(crate) bio: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Course {
    pub(crate) id: i64,
    pub(crate) course_code: String,
    pub(crate) teacher_id: Option<i64>,
    pub(crate) teacher_name: String,
    pub(crate) subject: String,
    pub(crate) chapter: String,
    pub(crate) level: String,
    pub(crate) content: String,
    pub(crate) keywords: Json<Vec<String>>,
    pub(crate) uploaded_at: PrimitiveDateTime,
    pub(crate) visible: bool,
    pub(crate) exercises_generated: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Exercise {
    pub(crate) id: i64,
    pub(crate) exercise_code: String,
    pub(crate) course_id: Option<i64>,
    pub(crate) subject: String,
    pub(crate) kind: String,
    pub(crate) question: String,
    pub(crate) options: Json<Vec<String>>,
    pub(crate) correct_index: Option<i64>,
    pub(crate) solution: Option<String>,
    pub(crate) explanation: Option<String>,
    pub(crate) level: String,
    pub(crate) difficulty: Option<String>,
    pub(crate) concepts: Json<Vec<String>>,
    pub(crate) estimated_time: Option<String>,
    pub(crate) source: String,
    pub(crate) created_at: PrimitiveDateTime,
}

/// Task entry inside a project's JSON task list. The legacy wire key for
/// the task name is `nom`, which every stored document already uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ProjectTask {
    #[serde(rename = "nom")]
    pub(crate) name: String,
    pub(crate) done: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Project {
    pub(crate) id: i64,
    pub(crate) user_id: Option<i64>,
    pub(crate) name: String,
    pub(crate) kind: String,
    pub(crate) description: Option<String>,
    pub(crate) start_date: Option<Date>,
    pub(crate) end_date: Option<Date>,
    pub(crate) status: ProjectStatus,
    pub(crate) technologies: Json<Vec<String>>,
    pub(crate) tasks: Json<Vec<ProjectTask>>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Flashcard {
    pub(crate) id: i64,
    pub(crate) user_id: Option<i64>,
    pub(crate) subject: String,
    pub(crate) question: String,
    pub(crate) answer: String,
    pub(crate) explanation: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) last_reviewed: Option<PrimitiveDateTime>,
    pub(crate) difficulty: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Portfolio {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) full_name: Option<String>,
    pub(crate) headline: Option<String>,
    pub(crate) bio: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) github: Option<String>,
    pub(crate) linkedin: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct PortfolioProject {
    pub(crate) id: i64,
    pub(crate) portfolio_id: i64,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) category: Option<String>,
    pub(crate) duration: Option<String>,
    pub(crate) technologies: Json<Vec<String>>,
    pub(crate) github: Option<String>,
    pub(crate) demo: Option<String>,
    pub(crate) results: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct PortfolioSkill {
    pub(crate) id: i64,
    pub(crate) portfolio_id: i64,
    pub(crate) skill: String,
    pub(crate) level: SkillLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ForumPost {
    pub(crate) id: i64,
    pub(crate) user_id: Option<i64>,
    pub(crate) author: String,
    pub(crate) title: String,
    pub(crate) subject: String,
    pub(crate) body: String,
    pub(crate) code: Option<String>,
    pub(crate) tags: Json<Vec<String>>,
    pub(crate) posted_at: PrimitiveDateTime,
    pub(crate) resolved: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ForumReply {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) user_id: Option<i64>,
    pub(crate) author: String,
    pub(crate) body: String,
    pub(crate) code: Option<String>,
    pub(crate) replied_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct BusinessCaseSubmission {
    pub(crate) id: i64,
    pub(crate) student_id: Option<i64>,
    pub(crate) case_id: i64,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) results: Option<String>,
    pub(crate) level: Option<String>,
    pub(crate) submitted_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ProgressRecord {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) exercise_id: i64,
    pub(crate) completed: bool,
    pub(crate) score: Option<f64>,
    pub(crate) attempts: i64,
    pub(crate) last_attempt: Option<PrimitiveDateTime>,
}
