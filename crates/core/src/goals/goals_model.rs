//! Goals domain models.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::constants::DUE_DATE_FORMAT;
use crate::errors::{Error, Result, ValidationError};
use crate::progress::{compute_progress, AchievementAction, Progress};

/// A sub-task of a goal. Owned by its goal and persisted with it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    /// Stable identifier. Older clients sent numeric ids (timestamps or
    /// positions); those are accepted and kept in their string form.
    #[serde(default, deserialize_with = "deserialize_milestone_id")]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Milestone {
    /// Creates an incomplete milestone with a fresh time-ordered id.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: new_milestone_id(),
            text: text.into(),
            completed: false,
        }
    }
}

/// Generates a collision-resistant milestone identifier.
pub fn new_milestone_id() -> String {
    Uuid::now_v7().to_string()
}

/// Assigns an id to every milestone that arrived without one.
pub fn assign_missing_milestone_ids(milestones: &mut [Milestone]) {
    for milestone in milestones.iter_mut() {
        if milestone.id.trim().is_empty() {
            milestone.id = new_milestone_id();
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMilestoneId {
    Text(String),
    Integer(i64),
    Float(f64),
}

fn deserialize_milestone_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawMilestoneId>::deserialize(deserializer)?;
    Ok(match raw {
        None => String::new(),
        Some(RawMilestoneId::Text(s)) => s,
        Some(RawMilestoneId::Integer(n)) => n.to_string(),
        Some(RawMilestoneId::Float(f)) => f.to_string(),
    })
}

/// Domain model representing a goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub text: String,
    /// Due date as `YYYY-MM-DD`
    pub due_date: String,
    pub milestones: Vec<Milestone>,
    /// Derived from `milestones`, 0..=100
    pub progress_percentage: u8,
    /// Derived from `milestones`
    pub completed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Goal {
    /// Builds a goal and derives its progress fields from the milestones.
    pub fn new(
        id: String,
        text: String,
        due_date: String,
        milestones: Vec<Milestone>,
        created_at: NaiveDateTime,
        updated_at: NaiveDateTime,
    ) -> Self {
        let mut goal = Self {
            id,
            text,
            due_date,
            milestones,
            progress_percentage: 0,
            completed: false,
            created_at,
            updated_at,
        };
        goal.refresh_progress();
        goal
    }

    pub fn progress(&self) -> Progress {
        compute_progress(self)
    }

    /// Recomputes `progress_percentage` and `completed` from the milestones.
    pub fn refresh_progress(&mut self) {
        let progress = self.progress();
        self.progress_percentage = progress.percentage;
        self.completed = progress.all_complete;
    }

    /// Message stored on the achievement earned by this goal.
    pub fn achievement_message(&self) -> String {
        format!("Congratulations! Goal \"{}\" achieved!", self.text)
    }
}

/// Input model for creating a new goal
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

impl NewGoal {
    pub fn new(text: impl Into<String>, due_date: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            due_date: due_date.into(),
            milestones: Vec::new(),
        }
    }

    /// Validates the new goal data.
    pub fn validate(&self) -> Result<()> {
        validate_goal_fields(&self.text, &self.due_date, &self.milestones)
    }
}

/// Input model for replacing a goal and its milestones.
///
/// Clients send the full goal back; derived fields such as
/// `progressPercentage` and `completed` are ignored and recomputed.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdate {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

impl GoalUpdate {
    /// Validates the goal update data.
    pub fn validate(&self) -> Result<()> {
        match self.id.as_deref() {
            Some(id) if !id.trim().is_empty() => {}
            _ => {
                return Err(Error::Validation(ValidationError::MissingField(
                    "id".to_string(),
                )))
            }
        }
        validate_goal_fields(&self.text, &self.due_date, &self.milestones)
    }
}

impl From<Goal> for GoalUpdate {
    fn from(goal: Goal) -> Self {
        Self {
            id: Some(goal.id),
            text: goal.text,
            due_date: goal.due_date,
            milestones: goal.milestones,
        }
    }
}

/// Result of a goal write: the stored goal and the achievement action
/// applied in the same transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalMutation {
    pub goal: Goal,
    pub achievement: AchievementAction,
}

fn validate_goal_fields(text: &str, due_date: &str, milestones: &[Milestone]) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "text".to_string(),
        )));
    }
    if due_date.trim().is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "dueDate".to_string(),
        )));
    }
    NaiveDate::parse_from_str(due_date.trim(), DUE_DATE_FORMAT)?;

    let mut seen_ids = HashSet::new();
    for milestone in milestones {
        if milestone.text.trim().is_empty() {
            return Err(Error::invalid_input("Milestone text cannot be empty"));
        }
        if !milestone.id.is_empty() && !seen_ids.insert(milestone.id.as_str()) {
            return Err(Error::invalid_input(format!(
                "Duplicate milestone id '{}'",
                milestone.id
            )));
        }
    }
    Ok(())
}
