//! Database models for achievements.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use goaltracker_core::achievements::{Achievement, NewAchievement};

/// Database model for achievements
#[derive(
    Queryable,
    Identifiable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::achievements)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct AchievementDB {
    pub id: String,
    pub goal_id: String,
    pub message: String,
    pub created_at: NaiveDateTime,
}

/// Database model for recording a new achievement
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::achievements)]
#[serde(rename_all = "camelCase")]
pub struct NewAchievementDB {
    pub id: String,
    pub goal_id: String,
    pub message: String,
    pub created_at: NaiveDateTime,
}

impl NewAchievementDB {
    /// Assigns a fresh id and the creation timestamp.
    pub fn from_new(domain: NewAchievement, created_at: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            goal_id: domain.goal_id,
            message: domain.message,
            created_at,
        }
    }
}

// Conversion to domain models
impl From<AchievementDB> for Achievement {
    fn from(db: AchievementDB) -> Self {
        Self {
            id: db.id,
            goal_id: db.goal_id,
            message: db.message,
            created_at: db.created_at,
        }
    }
}
