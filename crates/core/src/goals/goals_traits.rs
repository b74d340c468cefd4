use crate::errors::Result;
use crate::goals::goals_model::{Goal, GoalMutation, GoalUpdate, NewGoal};
use crate::progress::{AchievementAction, Progress};
use async_trait::async_trait;

/// Trait for goal repository operations.
///
/// Every write persists the goal and reconciles its achievement record in a
/// single transaction, using [`crate::progress::reconcile_achievement`] to
/// decide the action. Achievement writes are idempotent: create-if-absent,
/// delete-if-present.
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    fn load_goals(&self) -> Result<Vec<Goal>>;
    fn get_goal(&self, goal_id: &str) -> Result<Goal>;
    async fn insert_new_goal(&self, new_goal: NewGoal) -> Result<GoalMutation>;
    /// Fails with `NotFound` when the goal does not exist.
    async fn update_goal(&self, goal_update: GoalUpdate) -> Result<GoalMutation>;
    /// Deletes the goal and every achievement referencing it.
    /// Returns the number of goals deleted.
    async fn delete_goal(&self, goal_id_to_delete: String) -> Result<usize>;
    /// Re-runs reconciliation for every stored goal and returns the actions applied.
    async fn reconcile_achievements(&self) -> Result<Vec<AchievementAction>>;
}

/// Trait for goal service operations
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    fn get_goals(&self) -> Result<Vec<Goal>>;
    fn get_goal(&self, goal_id: &str) -> Result<Goal>;
    fn get_overall_progress(&self) -> Result<Progress>;
    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal>;
    async fn update_goal(&self, goal_update: GoalUpdate) -> Result<Goal>;
    async fn delete_goal(&self, goal_id_to_delete: &str) -> Result<()>;
    /// Repairs achievement records that drifted from goal state.
    /// Returns the number of corrections made.
    async fn reconcile_achievements(&self) -> Result<usize>;
}
