use goaltracker_core::achievements::{Achievement, AchievementRepositoryTrait, NewAchievement};
use goaltracker_core::{Error, Result};

use super::model::AchievementDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::goals::{apply_reconciliation, find_goal, GoalDB};
use crate::schema::achievements;
use crate::schema::achievements::dsl::*;
use crate::schema::goals;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;

use std::sync::Arc;

pub struct AchievementRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AchievementRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        AchievementRepository { pool, writer }
    }

    pub fn load_achievements_impl(&self, goal_filter: Option<&str>) -> Result<Vec<Achievement>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = achievements.into_boxed();
        if let Some(filter_id) = goal_filter {
            query = query.filter(goal_id.eq(filter_id.to_string()));
        }
        let achievements_db = query
            .order((created_at.asc(), id.asc()))
            .load::<AchievementDB>(&mut conn)
            .into_core()?;
        Ok(achievements_db.into_iter().map(Achievement::from).collect())
    }
}

#[async_trait]
impl AchievementRepositoryTrait for AchievementRepository {
    fn load_achievements(&self, goal_filter: Option<&str>) -> Result<Vec<Achievement>> {
        self.load_achievements_impl(goal_filter)
    }

    async fn insert_if_absent(&self, new_achievement: NewAchievement) -> Result<Achievement> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Achievement> {
                let goal = find_goal(conn, &new_achievement.goal_id)?;
                if !goal.completed {
                    return Err(Error::ConstraintViolation(format!(
                        "Goal {} is not complete",
                        goal.id
                    )));
                }
                apply_reconciliation(conn, &goal)?;

                let stored = achievements
                    .filter(goal_id.eq(&goal.id))
                    .first::<AchievementDB>(conn)
                    .into_core()?;
                Ok(Achievement::from(stored))
            })
            .await
    }

    async fn delete_achievement(&self, achievement_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let Some(existing) = achievements
                    .find(&achievement_id)
                    .first::<AchievementDB>(conn)
                    .optional()
                    .into_core()?
                else {
                    return Ok(0);
                };

                let owner = goals::table
                    .find(&existing.goal_id)
                    .first::<GoalDB>(conn)
                    .optional()
                    .into_core()?
                    .map(GoalDB::into_domain)
                    .transpose()?;
                match owner {
                    Some(goal) if goal.completed => {
                        return Err(Error::ConstraintViolation(format!(
                            "Goal {} is still complete",
                            goal.id
                        )));
                    }
                    Some(_) => {}
                    None => debug!("Deleting orphaned achievement {}", existing.id),
                }

                diesel::delete(achievements.find(&existing.id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::NewAchievementDB;
    use crate::db::{create_pool, run_migrations, spawn_writer, PoolOptions};
    use crate::goals::GoalRepository;
    use chrono::Utc;
    use goaltracker_core::goals::{Goal, GoalRepositoryTrait, Milestone, NewGoal};
    use tempfile::tempdir;

    async fn create_test_repositories() -> (
        AchievementRepository,
        GoalRepository,
        Arc<DbPool>,
        tempfile::TempDir,
    ) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let db_path_str = db_path.to_string_lossy().to_string();

        let pool = create_pool(&db_path_str, PoolOptions::default()).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());

        (
            AchievementRepository::new(Arc::clone(&pool), writer.clone()),
            GoalRepository::new(Arc::clone(&pool), writer),
            pool,
            temp_dir,
        )
    }

    async fn create_goal(goal_repo: &GoalRepository, title: &str, done: &[bool]) -> Goal {
        let mut new_goal = NewGoal::new(title, "2026-12-31");
        new_goal.milestones = done
            .iter()
            .enumerate()
            .map(|(i, completed)| Milestone {
                completed: *completed,
                ..Milestone::new(format!("Step {}", i + 1))
            })
            .collect();
        goal_repo.insert_new_goal(new_goal).await.unwrap().goal
    }

    fn claim(goal: &str) -> NewAchievement {
        NewAchievement {
            goal_id: goal.to_string(),
            message: "fake".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_if_absent_returns_stored_record_with_goal_message() {
        let (repo, goal_repo, _pool, _dir) = create_test_repositories().await;
        let goal = create_goal(&goal_repo, "Swim", &[true]).await;
        let earned = repo.load_achievements(Some(&goal.id)).unwrap();
        assert_eq!(earned.len(), 1);

        let stored = repo.insert_if_absent(claim(&goal.id)).await.unwrap();
        assert_eq!(stored, earned[0]);
        assert_eq!(stored.message, "Congratulations! Goal \"Swim\" achieved!");
        assert_eq!(repo.load_achievements(None).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_if_absent_refuses_missing_or_incomplete_goal() {
        let (repo, goal_repo, _pool, _dir) = create_test_repositories().await;
        assert!(repo
            .insert_if_absent(claim("no-such-goal"))
            .await
            .unwrap_err()
            .is_not_found());

        let goal = create_goal(&goal_repo, "Swim", &[true, false]).await;
        let err = repo.insert_if_absent(claim(&goal.id)).await.unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));
        assert!(repo.load_achievements(None).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_filters_by_goal() {
        let (repo, goal_repo, _pool, _dir) = create_test_repositories().await;
        create_goal(&goal_repo, "Swim", &[true]).await;
        let run = create_goal(&goal_repo, "Run", &[true]).await;

        assert_eq!(repo.load_achievements(None).unwrap().len(), 2);
        let filtered = repo.load_achievements(Some(&run.id)).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].goal_id, run.id);
        assert!(repo.load_achievements(Some("other")).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_refused_while_goal_complete() {
        let (repo, goal_repo, _pool, _dir) = create_test_repositories().await;
        let goal = create_goal(&goal_repo, "Swim", &[true]).await;
        let earned = repo.load_achievements(Some(&goal.id)).unwrap();

        let err = repo
            .delete_achievement(earned[0].id.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));
        assert_eq!(repo.load_achievements(None).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_orphaned_achievement_reports_rows() {
        let (repo, _goal_repo, pool, _dir) = create_test_repositories().await;
        let orphan = NewAchievementDB::from_new(claim("deleted-goal"), Utc::now().naive_utc());
        {
            let mut conn = get_connection(&pool).unwrap();
            diesel::insert_into(achievements::table)
                .values(&orphan)
                .execute(&mut conn)
                .unwrap();
        }

        assert_eq!(repo.delete_achievement(orphan.id.clone()).await.unwrap(), 1);
        assert_eq!(repo.delete_achievement(orphan.id).await.unwrap(), 0);
        assert!(repo.load_achievements(None).unwrap().is_empty());
    }
}
