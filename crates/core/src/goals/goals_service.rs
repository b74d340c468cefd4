use log::{debug, info};
use std::sync::Arc;

use crate::errors::{Error, Result};
use crate::goals::goals_model::{assign_missing_milestone_ids, Goal, GoalMutation, GoalUpdate, NewGoal};
use crate::goals::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use crate::progress::{compute_overall_progress, AchievementAction, Progress};
use async_trait::async_trait;

pub struct GoalService {
    goal_repo: Arc<dyn GoalRepositoryTrait>,
}

impl GoalService {
    pub fn new(goal_repo: Arc<dyn GoalRepositoryTrait>) -> Self {
        GoalService { goal_repo }
    }

    fn log_mutation(mutation: &GoalMutation) {
        match &mutation.achievement {
            AchievementAction::NoOp => debug!(
                "Goal {} at {}%, achievement unchanged",
                mutation.goal.id, mutation.goal.progress_percentage
            ),
            AchievementAction::Create(_) => {
                info!("Goal {} completed, achievement recorded", mutation.goal.id)
            }
            AchievementAction::Remove { .. } => info!(
                "Goal {} no longer complete, achievement removed",
                mutation.goal.id
            ),
        }
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    fn get_goals(&self) -> Result<Vec<Goal>> {
        self.goal_repo.load_goals()
    }

    fn get_goal(&self, goal_id: &str) -> Result<Goal> {
        self.goal_repo.get_goal(goal_id)
    }

    fn get_overall_progress(&self) -> Result<Progress> {
        let goals = self.goal_repo.load_goals()?;
        Ok(compute_overall_progress(&goals))
    }

    async fn create_goal(&self, mut new_goal: NewGoal) -> Result<Goal> {
        new_goal.validate()?;
        new_goal.text = new_goal.text.trim().to_string();
        new_goal.due_date = new_goal.due_date.trim().to_string();
        assign_missing_milestone_ids(&mut new_goal.milestones);

        let mutation = self.goal_repo.insert_new_goal(new_goal).await?;
        Self::log_mutation(&mutation);
        Ok(mutation.goal)
    }

    async fn update_goal(&self, mut goal_update: GoalUpdate) -> Result<Goal> {
        goal_update.validate()?;
        goal_update.text = goal_update.text.trim().to_string();
        goal_update.due_date = goal_update.due_date.trim().to_string();
        assign_missing_milestone_ids(&mut goal_update.milestones);

        let mutation = self.goal_repo.update_goal(goal_update).await?;
        Self::log_mutation(&mutation);
        Ok(mutation.goal)
    }

    async fn delete_goal(&self, goal_id_to_delete: &str) -> Result<()> {
        let deleted = self
            .goal_repo
            .delete_goal(goal_id_to_delete.to_string())
            .await?;
        if deleted == 0 {
            return Err(Error::not_found(format!("Goal {}", goal_id_to_delete)));
        }
        info!("Deleted goal {}", goal_id_to_delete);
        Ok(())
    }

    async fn reconcile_achievements(&self) -> Result<usize> {
        let actions = self.goal_repo.reconcile_achievements().await?;
        let corrections = actions
            .iter()
            .filter(|action| !matches!(action, AchievementAction::NoOp))
            .count();
        if corrections > 0 {
            info!("Achievement reconciliation corrected {} record(s)", corrections);
        } else {
            debug!("Achievement reconciliation found nothing to correct");
        }
        Ok(corrections)
    }
}
