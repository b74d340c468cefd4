use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Json, Router,
};
use goaltracker_core::achievements::{Achievement, NewAchievement};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AchievementsQuery {
    goal_id: Option<String>,
}

async fn get_achievements(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AchievementsQuery>,
) -> ApiResult<Json<Vec<Achievement>>> {
    let achievements = state
        .achievement_service
        .get_achievements(query.goal_id.as_deref())?;
    Ok(Json(achievements))
}

async fn create_achievement(
    State(state): State<Arc<AppState>>,
    Json(achievement): Json<NewAchievement>,
) -> ApiResult<Json<Achievement>> {
    let a = state.achievement_service.create_achievement(achievement).await?;
    Ok(Json(a))
}

async fn delete_achievement(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Value>> {
    state.achievement_service.delete_achievement(&id).await?;
    Ok(Json(json!({ "message": "Achievement deleted" })))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/achievements",
            get(get_achievements).post(create_achievement),
        )
        .route("/achievements/{id}", delete(delete_achievement))
}
