use crate::achievements::achievements_model::{Achievement, NewAchievement};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait for achievement repository operations
#[async_trait]
pub trait AchievementRepositoryTrait: Send + Sync {
    /// Loads achievements, optionally only those referencing `goal_id`.
    fn load_achievements(&self, goal_id: Option<&str>) -> Result<Vec<Achievement>>;
    /// Records the achievement of a completed goal, in the same transaction
    /// that reads the goal. Returns the stored record when one already exists.
    ///
    /// Fails with `NotFound` when the goal does not exist and with
    /// `ConstraintViolation` when it is not complete. The stored message is
    /// the goal's own achievement message.
    async fn insert_if_absent(&self, new_achievement: NewAchievement) -> Result<Achievement>;
    /// Returns the number of records deleted. Fails with `ConstraintViolation`
    /// while the owning goal is still complete; orphaned records may be removed.
    async fn delete_achievement(&self, achievement_id: String) -> Result<usize>;
}

/// Trait for achievement service operations
#[async_trait]
pub trait AchievementServiceTrait: Send + Sync {
    fn get_achievements(&self, goal_id: Option<&str>) -> Result<Vec<Achievement>>;
    async fn create_achievement(&self, new_achievement: NewAchievement) -> Result<Achievement>;
    async fn delete_achievement(&self, achievement_id: &str) -> Result<()>;
}
