use log::{debug, warn};
use std::sync::Arc;

use crate::achievements::{Achievement, AchievementServiceTrait};
use crate::errors::{Error, Result};
use crate::goals::{Goal, GoalServiceTrait, GoalUpdate, Milestone, NewGoal};
use crate::progress::{compute_overall_progress, Progress};

use super::edit_mode::EditMode;

/// Cached goals and achievements plus the current edit mode.
pub struct GoalBoard {
    goal_service: Arc<dyn GoalServiceTrait>,
    achievement_service: Arc<dyn AchievementServiceTrait>,
    goals: Vec<Goal>,
    achievements: Vec<Achievement>,
    mode: EditMode,
}

impl GoalBoard {
    /// Creates an empty board. Call [`GoalBoard::refresh`] to load it.
    pub fn new(
        goal_service: Arc<dyn GoalServiceTrait>,
        achievement_service: Arc<dyn AchievementServiceTrait>,
    ) -> Self {
        Self {
            goal_service,
            achievement_service,
            goals: Vec::new(),
            achievements: Vec::new(),
            mode: EditMode::Viewing,
        }
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    pub fn goal(&self, goal_id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == goal_id)
    }

    /// Progress across every cached goal.
    pub fn overall_progress(&self) -> Progress {
        compute_overall_progress(&self.goals)
    }

    /// Refetches goals and achievements. The cache is replaced only when both
    /// loads succeed.
    pub fn refresh(&mut self) -> Result<()> {
        let goals = self.goal_service.get_goals()?;
        let achievements = self.achievement_service.get_achievements(None)?;
        debug!(
            "Board refreshed: {} goal(s), {} achievement(s)",
            goals.len(),
            achievements.len()
        );
        self.goals = goals;
        self.achievements = achievements;
        let edited_goal_gone = matches!(
            &self.mode,
            EditMode::Editing { goal_id } if !self.goals.iter().any(|g| &g.id == goal_id)
        );
        if edited_goal_gone {
            self.mode.finish();
        }
        Ok(())
    }

    pub async fn add_goal(&mut self, text: &str, due_date: &str) -> Result<Goal> {
        let created = self
            .goal_service
            .create_goal(NewGoal::new(text, due_date))
            .await?;
        self.refresh_after_write();
        Ok(created)
    }

    pub async fn add_milestone(&mut self, goal_id: &str, text: &str) -> Result<Goal> {
        let mut update = self.update_for(goal_id)?;
        update.milestones.push(Milestone::new(text));
        self.save(update).await
    }

    /// Flips a milestone's completion and persists the whole goal.
    pub async fn toggle_milestone(&mut self, goal_id: &str, milestone_id: &str) -> Result<Goal> {
        let mut update = self.update_for(goal_id)?;
        let milestone = update
            .milestones
            .iter_mut()
            .find(|m| m.id == milestone_id)
            .ok_or_else(|| Error::not_found(format!("Milestone {}", milestone_id)))?;
        milestone.completed = !milestone.completed;
        self.save(update).await
    }

    /// Viewing/Editing(other) -> Editing(goal_id).
    pub fn begin_edit(&mut self, goal_id: &str) -> Result<()> {
        if self.goal(goal_id).is_none() {
            return Err(Error::not_found(format!("Goal {}", goal_id)));
        }
        self.mode.begin(goal_id);
        Ok(())
    }

    /// Editing(goal_id) -> Viewing once the update is stored. If the update
    /// is rejected the board stays in editing so the form can be corrected.
    pub async fn submit_edit(&mut self, text: &str, due_date: &str) -> Result<Goal> {
        let goal_id = self.mode.editing_goal()?.to_string();
        let mut update = self.update_for(&goal_id)?;
        update.text = text.to_string();
        update.due_date = due_date.to_string();
        let saved = self.save(update).await?;
        self.mode.finish();
        Ok(saved)
    }

    pub fn cancel_edit(&mut self) {
        self.mode.finish();
    }

    pub async fn delete_goal(&mut self, goal_id: &str) -> Result<()> {
        self.goal_service.delete_goal(goal_id).await?;
        if self.mode.is_editing(goal_id) {
            self.mode.finish();
        }
        self.goals.retain(|g| g.id != goal_id);
        self.achievements.retain(|a| a.goal_id != goal_id);
        self.refresh_after_write();
        Ok(())
    }

    fn update_for(&self, goal_id: &str) -> Result<GoalUpdate> {
        self.goal(goal_id)
            .cloned()
            .map(GoalUpdate::from)
            .ok_or_else(|| Error::not_found(format!("Goal {}", goal_id)))
    }

    async fn save(&mut self, update: GoalUpdate) -> Result<Goal> {
        let saved = self.goal_service.update_goal(update).await?;
        self.refresh_after_write();
        Ok(saved)
    }

    /// The write is already committed, so a failed refetch only leaves the
    /// cache stale until the next successful [`GoalBoard::refresh`].
    fn refresh_after_write(&mut self) {
        if let Err(e) = self.refresh() {
            warn!("Board cache is stale after a committed write: {}", e);
        }
    }
}
