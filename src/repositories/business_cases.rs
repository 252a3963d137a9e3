use sqlx::SqlitePool;

use crate::db::models::BusinessCaseSubmission;

const COLUMNS: &str = "\
    id, student_id, case_id, title, description, results, level, submitted_at";

pub(crate) struct CreateSubmission<'a> {
    pub(crate) student_id: Option<i64>,
    pub(crate) case_id: i64,
    pub(crate) title: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) results: Option<&'a str>,
    pub(crate) level: Option<&'a str>,
    pub(crate) submitted_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &SqlitePool,
    params: CreateSubmission<'_>,
) -> Result<BusinessCaseSubmission, sqlx::Error> {
    sqlx::query_as::<_, BusinessCaseSubmission>(&format!(
        "INSERT INTO business_case_submissions (student_id, case_id, title, description, results, level, submitted_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         RETURNING {COLUMNS}",
    ))
    .bind(params.student_id)
    .bind(params.case_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.results)
    .bind(params.level)
    .bind(params.submitted_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list(pool: &SqlitePool) -> Result<Vec<BusinessCaseSubmission>, sqlx::Error> {
    sqlx::query_as::<_, BusinessCaseSubmission>(&format!(
        "SELECT {COLUMNS} FROM business_case_submissions ORDER BY id ASC",
    ))
    .fetch_all(pool)
    .await
}
