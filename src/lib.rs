pub(crate) mod api;
pub(crate) mod core;
pub(crate) mod db;
pub(crate) mod repositories;
pub(crate) mod schemas;
pub(crate) mod services;

#[cfg(test)]
mod test_support;

use crate::core::{config::Settings, state::AppState, telemetry};
use crate::services::exercise_gen::ExerciseGenerator;
use crate::services::legacy_import::{self, LegacyPaths};

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;

    let db_pool = db::init_pool(&settings).await?;
    db::init_schema(&db_pool).await?;

    let generator = ExerciseGenerator::from_settings(&settings)?;
    if !generator.status().configured {
        tracing::warn!("No Gemini credential resolved; exercise generation is disabled");
    }

    let state = AppState::new(settings, db_pool, generator);

    if let Err(err) = core::bootstrap::ensure_admin(&state).await {
        tracing::error!(error = %err, "Failed to ensure default admin");
    }

    let app = api::router::router(state.clone());
    let listener = tokio::net::TcpListener::bind(state.settings().server_addr()).await?;

    tracing::info!(
        host = %state.settings().server_host(),
        port = state.settings().server_port(),
        environment = %state.settings().runtime().environment.as_str(),
        "Data Science Hub API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(core::shutdown::shutdown_signal())
        .await?;

    Ok(())
}

/// One-shot migration of the flat legacy JSON documents into the record
/// store. Backs sources up first; re-running duplicates records.
pub async fn run_legacy_import() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;

    let db_pool = db::init_pool(&settings).await?;
    db::init_schema(&db_pool).await?;

    let paths = LegacyPaths::from_settings(&settings);
    let report = legacy_import::run(&db_pool, &paths).await?;

    tracing::info!(
        courses = report.courses,
        exercises = report.exercises,
        projects = report.projects,
        flashcards = report.flashcards,
        forum_posts = report.forum_posts,
        forum_replies = report.forum_replies,
        portfolio_items = report.portfolio_items,
        skipped = report.skipped,
        total = report.total(),
        "Legacy migration report"
    );

    Ok(())
}

/// Open (creating if needed) the record store at `database_url` and apply
/// the schema. The same entry point the server uses, exposed for tooling
/// and smoke tests.
pub async fn init_store(database_url: &str) -> anyhow::Result<sqlx::SqlitePool> {
    use std::str::FromStr;

    let options = sqlx::sqlite::SqliteConnectOptions::from_str(database_url)?.foreign_keys(true);
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    db::init_schema(&pool).await?;
    Ok(pool)
}
