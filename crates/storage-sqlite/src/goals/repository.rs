use goaltracker_core::achievements::Achievement;
use goaltracker_core::goals::{Goal, GoalMutation, GoalRepositoryTrait, GoalUpdate, NewGoal};
use goaltracker_core::progress::{reconcile_achievement, AchievementAction};
use goaltracker_core::{Error, Result};

use super::model::{GoalDB, NewGoalDB};
use crate::achievements::{AchievementDB, NewAchievementDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::achievements;
use crate::schema::goals;
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::{debug, info};

use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

pub struct GoalRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl GoalRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        GoalRepository { pool, writer }
    }

    pub fn load_goals_impl(&self) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let goals_db = goals::table
            .order((goals::created_at.asc(), goals::id.asc()))
            .load::<GoalDB>(&mut conn)
            .into_core()?;
        goals_db.into_iter().map(GoalDB::into_domain).collect()
    }

    pub fn get_goal_impl(&self, goal_id: &str) -> Result<Goal> {
        let mut conn = get_connection(&self.pool)?;
        goals::table
            .find(goal_id)
            .first::<GoalDB>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| Error::not_found(format!("Goal {}", goal_id)))?
            .into_domain()
    }
}

/// Loads a goal on the writer connection.
pub(crate) fn find_goal(conn: &mut SqliteConnection, goal_id: &str) -> Result<Goal> {
    goals::table
        .find(goal_id)
        .first::<GoalDB>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| Error::not_found(format!("Goal {}", goal_id)))?
        .into_domain()
}

/// Brings the goal's achievement row in line with its milestones.
///
/// Must run inside the writer transaction that wrote or read `goal`.
pub(crate) fn apply_reconciliation(conn: &mut SqliteConnection, goal: &Goal) -> Result<AchievementAction> {
    let existing = achievements::table
        .filter(achievements::goal_id.eq(&goal.id))
        .first::<AchievementDB>(conn)
        .optional()
        .into_core()?
        .map(Achievement::from);

    let action = reconcile_achievement(goal, existing.as_ref());
    match &action {
        AchievementAction::Create(new_achievement) => {
            let row = NewAchievementDB::from_new(new_achievement.clone(), Utc::now().naive_utc());
            diesel::insert_or_ignore_into(achievements::table)
                .values(&row)
                .execute(conn)
                .into_core()?;
        }
        AchievementAction::Remove { goal_id } => {
            diesel::delete(achievements::table.filter(achievements::goal_id.eq(goal_id)))
                .execute(conn)
                .into_core()?;
        }
        AchievementAction::NoOp => {}
    }
    Ok(action)
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    fn load_goals(&self) -> Result<Vec<Goal>> {
        self.load_goals_impl()
    }

    fn get_goal(&self, goal_id: &str) -> Result<Goal> {
        self.get_goal_impl(goal_id)
    }

    async fn insert_new_goal(&self, new_goal: NewGoal) -> Result<GoalMutation> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<GoalMutation> {
                let now = Utc::now().naive_utc();
                let goal = Goal::new(
                    Uuid::new_v4().to_string(),
                    new_goal.text,
                    new_goal.due_date,
                    new_goal.milestones,
                    now,
                    now,
                );
                let new_goal_db: NewGoalDB = GoalDB::from_domain(&goal)?.into();

                let result_db = diesel::insert_into(goals::table)
                    .values(&new_goal_db)
                    .returning(GoalDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                let goal = result_db.into_domain()?;
                let achievement = apply_reconciliation(conn, &goal)?;
                Ok(GoalMutation { goal, achievement })
            })
            .await
    }

    async fn update_goal(&self, goal_update: GoalUpdate) -> Result<GoalMutation> {
        let goal_id_owned = goal_update.id.clone().unwrap_or_default();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<GoalMutation> {
                let existing = goals::table
                    .find(&goal_id_owned)
                    .first::<GoalDB>(conn)
                    .optional()
                    .into_core()?
                    .ok_or_else(|| Error::not_found(format!("Goal {}", goal_id_owned)))?;

                let goal = Goal::new(
                    existing.id,
                    goal_update.text,
                    goal_update.due_date,
                    goal_update.milestones,
                    existing.created_at,
                    Utc::now().naive_utc(),
                );
                let goal_db = GoalDB::from_domain(&goal)?;
                diesel::update(goals::table.find(&goal.id))
                    .set(&goal_db)
                    .execute(conn)
                    .into_core()?;

                let achievement = apply_reconciliation(conn, &goal)?;
                Ok(GoalMutation { goal, achievement })
            })
            .await
    }

    async fn delete_goal(&self, goal_id_to_delete: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let removed_achievements = diesel::delete(
                    achievements::table.filter(achievements::goal_id.eq(&goal_id_to_delete)),
                )
                .execute(conn)
                .into_core()?;
                if removed_achievements > 0 {
                    debug!(
                        "Removed {} achievement(s) of goal {}",
                        removed_achievements, goal_id_to_delete
                    );
                }
                diesel::delete(goals::table.find(&goal_id_to_delete))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    async fn reconcile_achievements(&self) -> Result<Vec<AchievementAction>> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Vec<AchievementAction>> {
                let rows = goals::table.load::<GoalDB>(conn).into_core()?;
                let mut actions = Vec::with_capacity(rows.len());
                let mut goal_ids = HashSet::with_capacity(rows.len());

                for row in rows {
                    let stored_percentage = row.progress_percentage;
                    let stored_completed = row.completed;
                    let goal = row.into_domain()?;

                    if stored_percentage != i32::from(goal.progress_percentage)
                        || stored_completed != goal.completed
                    {
                        info!("Repairing stale progress columns of goal {}", goal.id);
                        diesel::update(goals::table.find(&goal.id))
                            .set((
                                goals::progress_percentage.eq(i32::from(goal.progress_percentage)),
                                goals::completed.eq(goal.completed),
                            ))
                            .execute(conn)
                            .into_core()?;
                    }

                    actions.push(apply_reconciliation(conn, &goal)?);
                    goal_ids.insert(goal.id);
                }

                let orphans: Vec<String> = achievements::table
                    .select(achievements::goal_id)
                    .load::<String>(conn)
                    .into_core()?
                    .into_iter()
                    .filter(|goal_id| !goal_ids.contains(goal_id))
                    .collect();
                for goal_id in orphans {
                    info!("Removing achievement of missing goal {}", goal_id);
                    diesel::delete(achievements::table.filter(achievements::goal_id.eq(&goal_id)))
                        .execute(conn)
                        .into_core()?;
                    actions.push(AchievementAction::Remove { goal_id });
                }

                Ok(actions)
            })
            .await
    }
}
