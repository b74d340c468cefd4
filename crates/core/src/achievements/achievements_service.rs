use log::{debug, info};
use std::sync::Arc;

use crate::achievements::achievements_model::{Achievement, NewAchievement};
use crate::achievements::achievements_traits::{
    AchievementRepositoryTrait, AchievementServiceTrait,
};
use crate::errors::{Error, Result};
use async_trait::async_trait;

pub struct AchievementService {
    achievement_repo: Arc<dyn AchievementRepositoryTrait>,
}

impl AchievementService {
    pub fn new(achievement_repo: Arc<dyn AchievementRepositoryTrait>) -> Self {
        AchievementService { achievement_repo }
    }
}

#[async_trait]
impl AchievementServiceTrait for AchievementService {
    fn get_achievements(&self, goal_id: Option<&str>) -> Result<Vec<Achievement>> {
        let goal_id = goal_id.map(str::trim).filter(|id| !id.is_empty());
        self.achievement_repo.load_achievements(goal_id)
    }

    async fn create_achievement(&self, mut new_achievement: NewAchievement) -> Result<Achievement> {
        new_achievement.validate()?;
        new_achievement.goal_id = new_achievement.goal_id.trim().to_string();
        debug!("Recording achievement for goal {}", new_achievement.goal_id);
        self.achievement_repo.insert_if_absent(new_achievement).await
    }

    async fn delete_achievement(&self, achievement_id: &str) -> Result<()> {
        let deleted = self
            .achievement_repo
            .delete_achievement(achievement_id.to_string())
            .await?;
        if deleted == 0 {
            return Err(Error::not_found(format!("Achievement {}", achievement_id)));
        }
        info!("Deleted achievement {}", achievement_id);
        Ok(())
    }
}
