use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::{Exercise, ProgressRecord};

#[derive(Debug, Serialize)]
pub(crate) struct ExerciseResponse {
    pub(crate) id: i64,
    pub(crate) exercise_code: String,
    pub(crate) course_id: Option<i64>,
    pub(crate) subject: String,
    pub(crate) kind: String,
    pub(crate) question: String,
    pub(crate) options: Vec<String>,
    pub(crate) correct_index: Option<i64>,
    pub(crate) solution: Option<String>,
    pub(crate) explanation: Option<String>,
    pub(crate) level: String,
    pub(crate) difficulty: Option<String>,
    pub(crate) concepts: Vec<String>,
    pub(crate) estimated_time: Option<String>,
    pub(crate) source: String,
    pub(crate) created_at: String,
}

impl ExerciseResponse {
    pub(crate) fn from_db(exercise: Exercise) -> Self {
        Self {
            id: exercise.id,
            exercise_code: exercise.exercise_code,
            course_id: exercise.course_id,
            subject: exercise.subject,
            kind: exercise.kind,
            question: exercise.question,
            options: exercise.options.0,
            correct_index: exercise.correct_index,
            solution: exercise.solution,
            explanation: exercise.explanation,
            level: exercise.level,
            difficulty: exercise.difficulty,
            concepts: exercise.concepts.0,
            estimated_time: exercise.estimated_time,
            source: exercise.source,
            created_at: format_primitive(exercise.created_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AttemptRequest {
    pub(crate) user_id: i64,
    pub(crate) completed: bool,
    #[serde(default)]
    pub(crate) score: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProgressResponse {
    pub(crate) user_id: i64,
    pub(crate) exercise_id: i64,
    pub(crate) completed: bool,
    pub(crate) score: Option<f64>,
    pub(crate) attempts: i64,
    pub(crate) last_attempt: Option<String>,
}

impl ProgressResponse {
    pub(crate) fn from_db(record: ProgressRecord) -> Self {
        Self {
            user_id: record.user_id,
            exercise_id: record.exercise_id,
            completed: record.completed,
            score: record.score,
            attempts: record.attempts,
            last_attempt: record.last_attempt.map(format_primitive),
        }
    }
}
