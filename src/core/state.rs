use std::sync::Arc;

use sqlx::SqlitePool;

use crate::core::config::Settings;
use crate::services::exercise_gen::ExerciseGenerator;

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    db: SqlitePool,
    generator: ExerciseGenerator,
}

impl AppState {
    pub(crate) fn new(settings: Settings, db: SqlitePool, generator: ExerciseGenerator) -> Self {
        Self { inner: Arc::new(InnerState { settings, db, generator }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    pub(crate) fn generator(&self) -> &ExerciseGenerator {
        &self.inner.generator
    }
}
