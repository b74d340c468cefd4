//! Achievement domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::goals::Goal;

/// Persisted record that a goal reached full milestone completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    /// Weak reference to the goal; used for lookup only.
    pub goal_id: String,
    pub message: String,
    pub created_at: NaiveDateTime,
}

/// Input model for recording an achievement.
///
/// Only `goal_id` is significant: the stored message is always the one the
/// goal earns, whatever the client sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewAchievement {
    #[serde(default)]
    pub goal_id: String,
    #[serde(default, alias = "achievement")]
    pub message: String,
}

impl NewAchievement {
    /// The achievement a completed goal earns.
    pub fn for_goal(goal: &Goal) -> Self {
        Self {
            goal_id: goal.id.clone(),
            message: goal.achievement_message(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.goal_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "goalId".to_string(),
            )));
        }
        Ok(())
    }
}
