//! Database models for goals.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use goaltracker_core::goals::{Goal, Milestone};
use goaltracker_core::Result;

use crate::errors::IntoCore;

/// Database model for goals.
///
/// Milestones are embedded as a JSON array; `progress_percentage` and
/// `completed` are denormalised copies kept for querying.
#[derive(
    Queryable,
    Identifiable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct GoalDB {
    pub id: String,
    pub text: String,
    pub due_date: String,
    pub milestones: String,
    pub progress_percentage: i32,
    pub completed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for creating a new goal
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::goals)]
#[serde(rename_all = "camelCase")]
pub struct NewGoalDB {
    pub id: String,
    pub text: String,
    pub due_date: String,
    pub milestones: String,
    pub progress_percentage: i32,
    pub completed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl GoalDB {
    /// Converts to the domain model. Progress is recomputed from the
    /// milestones rather than trusted from the stored columns.
    pub fn into_domain(self) -> Result<Goal> {
        let milestones: Vec<Milestone> = serde_json::from_str(&self.milestones).into_core()?;
        Ok(Goal::new(
            self.id,
            self.text,
            self.due_date,
            milestones,
            self.created_at,
            self.updated_at,
        ))
    }

    /// Builds the row for a domain goal.
    pub fn from_domain(goal: &Goal) -> Result<Self> {
        Ok(Self {
            id: goal.id.clone(),
            text: goal.text.clone(),
            due_date: goal.due_date.clone(),
            milestones: serde_json::to_string(&goal.milestones).into_core()?,
            progress_percentage: i32::from(goal.progress_percentage),
            completed: goal.completed,
            created_at: goal.created_at,
            updated_at: goal.updated_at,
        })
    }
}

impl From<GoalDB> for NewGoalDB {
    fn from(row: GoalDB) -> Self {
        Self {
            id: row.id,
            text: row.text,
            due_date: row.due_date,
            milestones: row.milestones,
            progress_percentage: row.progress_percentage,
            completed: row.completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(milestones: &str, stored_pct: i32, stored_completed: bool) -> GoalDB {
        GoalDB {
            id: "g1".to_string(),
            text: "Learn X".to_string(),
            due_date: "2026-12-31".to_string(),
            milestones: milestones.to_string(),
            progress_percentage: stored_pct,
            completed: stored_completed,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_into_domain_recomputes_progress() {
        let goal = row(
            r#"[{"id":"a","text":"one","completed":true},{"id":"b","text":"two","completed":false}]"#,
            100,
            true,
        )
        .into_domain()
        .unwrap();
        assert_eq!(goal.progress_percentage, 50);
        assert!(!goal.completed);
    }

    #[test]
    fn test_into_domain_rejects_corrupt_milestones() {
        assert!(row("{not json", 0, false).into_domain().is_err());
    }

    #[test]
    fn test_from_domain_round_trip() {
        let goal = row(r#"[{"id":"a","text":"one","completed":true}]"#, 0, false)
            .into_domain()
            .unwrap();
        let back = GoalDB::from_domain(&goal).unwrap();
        assert_eq!(back.progress_percentage, 100);
        assert!(back.completed);
        assert_eq!(back.into_domain().unwrap(), goal);
    }
}
