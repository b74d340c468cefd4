use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use goaltracker_core::goals::{Goal, GoalUpdate, NewGoal};
use goaltracker_core::progress::Progress;
use serde_json::{json, Value};

async fn get_goals(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Goal>>> {
    let goals = state.goal_service.get_goals()?;
    Ok(Json(goals))
}

async fn get_overall_progress(State(state): State<Arc<AppState>>) -> ApiResult<Json<Progress>> {
    let progress = state.goal_service.get_overall_progress()?;
    Ok(Json(progress))
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    Json(goal): Json<NewGoal>,
) -> ApiResult<Json<Goal>> {
    let g = state.goal_service.create_goal(goal).await?;
    Ok(Json(g))
}

/// Replaces the goal identified by the path. The body id, when present, must agree.
async fn update_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(mut goal): Json<GoalUpdate>,
) -> ApiResult<Json<Goal>> {
    if let Some(body_id) = goal.id.as_deref() {
        if !body_id.is_empty() && body_id != id {
            return Err(ApiError::BadRequest(format!(
                "Goal id {} in body does not match path id {}",
                body_id, id
            )));
        }
    }
    goal.id = Some(id);
    let g = state.goal_service.update_goal(goal).await?;
    Ok(Json(g))
}

async fn delete_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Value>> {
    state.goal_service.delete_goal(&id).await?;
    Ok(Json(json!({ "message": "Goal deleted" })))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/goals/progress", get(get_overall_progress))
        .route("/goals", get(get_goals).post(create_goal))
        .route("/goals/{id}", put(update_goal).delete(delete_goal))
}
