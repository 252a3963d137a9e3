use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Project, ProjectTask};
use crate::db::types::ProjectStatus;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ProjectCreate {
    #[serde(default)]
    pub(crate) user_id: Option<i64>,
    #[validate(length(min = 1))]
    pub(crate) name: String,
    #[validate(length(min = 1))]
    pub(crate) kind: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) start_date: Option<String>,
    #[serde(default)]
    pub(crate) end_date: Option<String>,
    pub(crate) status: ProjectStatus,
    #[serde(default)]
    pub(crate) technologies: Vec<String>,
    #[serde(default)]
    pub(crate) tasks: Vec<ProjectTask>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectUpdate {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) kind: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) status: Option<ProjectStatus>,
    #[serde(default)]
    pub(crate) technologies: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TaskCreate {
    pub(crate) name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProjectResponse {
    pub(crate) id: i64,
    pub(crate) user_id: Option<i64>,
    pub(crate) name: String,
    pub(crate) kind: String,
    pub(crate) description: Option<String>,
    pub(crate) start_date: Option<String>,
    pub(crate) end_date: Option<String>,
    pub(crate) status: ProjectStatus,
    pub(crate) technologies: Vec<String>,
    pub(crate) tasks: Vec<ProjectTask>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl ProjectResponse {
    pub(crate) fn from_db(project: Project) -> Self {
        Self {
            id: project.id,
            user_id: project.user_id,
            name: project.name,
            kind: project.kind,
            description: project.description,
            start_date: project.start_date.map(|date| date.to_string()),
            end_date: project.end_date.map(|date| date.to_string()),
            status: project.status,
            technologies: project.technologies.0,
            tasks: project.tasks.0,
            created_at: format_primitive(project.created_at),
            updated_at: format_primitive(project.updated_at),
        }
    }
}
