use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::BusinessCaseSubmission;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SubmissionCreate {
    #[serde(default)]
    pub(crate) student_id: Option<i64>,
    pub(crate) case_id: i64,
    #[validate(length(min = 1))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) results: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionResponse {
    pub(crate) id: i64,
    pub(crate) student_id: Option<i64>,
    pub(crate) case_id: i64,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) results: Option<String>,
    pub(crate) level: Option<String>,
    pub(crate) submitted_at: String,
}

impl SubmissionResponse {
    pub(crate) fn from_db(submission: BusinessCaseSubmission) -> Self {
        Self {
            id: submission.id,
            student_id: submission.student_id,
            case_id: submission.case_id,
            title: submission.title,
            description: submission.description,
            results: submission.results,
            level: submission.level,
            submitted_at: format_primitive(submission.submitted_at),
        }
    }
}
