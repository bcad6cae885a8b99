//! Application state: the scenario catalog and the single shared engine session.
//!
//! The process keeps exactly one session (not one per user). The engine sits behind a
//! mutex so concurrent requests are serialized and a submission is never interleaved
//! with another one; two clients playing at once still share and overwrite the same
//! attempt.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::domain::Difficulty;
use crate::engine::ScenarioEngine;

pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub engine: Mutex<ScenarioEngine>,
    pub config: AppConfig,
}

impl AppState {
    /// Build state from config: load the catalog, apply scoring overrides, create the engine.
    #[instrument(level = "info", skip_all)]
    pub fn new(config: AppConfig) -> Self {
        let mut catalog = Catalog::load(&config.scenarios_path);
        if let Some(rec) = &config.scoring {
            let thresholds = catalog.thresholds().with_overrides(rec);
            catalog = catalog.with_thresholds(thresholds);
        }
        Self::with_catalog(catalog, config)
    }

    pub fn with_catalog(catalog: Catalog, config: AppConfig) -> Self {
        let summaries = catalog.list_summaries();
        let count = |d: Difficulty| summaries.iter().filter(|s| s.difficulty == d).count();
        info!(
            target: "scenario",
            total = summaries.len(),
            beginner = count(Difficulty::Beginner),
            intermediate = count(Difficulty::Intermediate),
            advanced = count(Difficulty::Advanced),
            thresholds = ?catalog.thresholds(),
            "Startup scenario inventory"
        );

        if catalog.is_empty() {
            warn!(target: "scenario", "No scenarios loaded; every start request will report not found");
        }

        let catalog = Arc::new(catalog);
        Self {
            engine: Mutex::new(ScenarioEngine::new(catalog.clone())),
            catalog,
            config,
        }
    }
}
