use std::sync::Arc;

use crate::config::Config;
use goaltracker_core::{
    achievements::{AchievementService, AchievementServiceTrait},
    goals::{GoalService, GoalServiceTrait},
};
use goaltracker_storage_sqlite::{
    achievements::AchievementRepository,
    db::{self, PoolOptions},
    goals::GoalRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub goal_service: Arc<dyn GoalServiceTrait + Send + Sync>,
    pub achievement_service: Arc<dyn AchievementServiceTrait + Send + Sync>,
}

pub fn init_tracing() {
    let fmt_layer = fmt::layer().json().with_current_span(false);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(
        &db_path,
        PoolOptions {
            max_size: config.db_pool_size,
            connection_timeout: config.db_connection_timeout,
        },
    )?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let goal_repo = Arc::new(GoalRepository::new(pool.clone(), writer.clone()));
    let goal_service = Arc::new(GoalService::new(goal_repo));

    let achievement_repo = Arc::new(AchievementRepository::new(pool.clone(), writer.clone()));
    let achievement_service = Arc::new(AchievementService::new(achievement_repo));

    // Repair achievements that drifted from their goals while the server was down
    let repaired = goal_service.reconcile_achievements().await?;
    if repaired > 0 {
        tracing::info!("Reconciled {} achievement record(s) at start-up", repaired);
    }

    Ok(Arc::new(AppState {
        goal_service,
        achievement_service,
    }))
}
