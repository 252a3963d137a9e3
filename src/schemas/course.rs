use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Course;
use crate::schemas::exercise::ExerciseResponse;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseCreate {
    #[serde(default)]
    pub(crate) teacher_id: Option<i64>,
    #[validate(length(min = 1))]
    pub(crate) teacher_name: String,
    #[validate(length(min = 1))]
    pub(crate) subject: String,
    #[validate(length(min = 1))]
    pub(crate) chapter: String,
    #[validate(length(min = 1))]
    pub(crate) level: String,
    #[validate(length(min = 1))]
    pub(crate) content: String,
    #[serde(default = "default_visible")]
    pub(crate) visible: bool,
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub(crate) struct VisibilityUpdate {
    pub(crate) visible: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateExercisesRequest {
    #[serde(default = "default_count")]
    pub(crate) count: usize,
    #[serde(default)]
    pub(crate) kinds: Option<Vec<String>>,
}

fn default_count() -> usize {
    5
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateExercisesResponse {
    pub(crate) generated: usize,
    pub(crate) exercises: Vec<ExerciseResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseResponse {
    pub(crate) id: i64,
    pub(crate) course_code: String,
    pub(crate) teacher_id: Option<i64>,
    pub(crate) teacher_name: String,
    pub(crate) subject: String,
    pub(crate) chapter: String,
    pub(crate) level: String,
    pub(crate) content: String,
    pub(crate) keywords: Vec<String>,
    pub(crate) uploaded_at: String,
    pub(crate) visible: bool,
    pub(crate) exercises_generated: i64,
}

impl CourseResponse {
    pub(crate) fn from_db(course: Course) -> Self {
        Self {
            id: course.id,
            course_code: course.course_code,
            teacher_id: course.teacher_id,
            teacher_name: course.teacher_name,
            subject: course.subject,
            chapter: course.chapter,
            level: course.level,
            content: course.content,
            keywords: course.keywords.0,
            uploaded_at: format_primitive(course.uploaded_at),
            visible: course.visible,
            exercises_generated: course.exercises_generated,
        }
    }
}
