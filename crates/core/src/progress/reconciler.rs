use serde::{Deserialize, Serialize};

use crate::achievements::{Achievement, NewAchievement};
use crate::goals::Goal;

use super::progress_calculator::compute_progress;

/// What must happen to a goal's achievement record to match its milestones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AchievementAction {
    NoOp,
    Create(NewAchievement),
    #[serde(rename_all = "camelCase")]
    Remove { goal_id: String },
}

/// Decides the achievement action for a goal given the currently stored record.
///
/// The decision is pure. Applying it is the caller's job, and applying it
/// then calling again with the same goal yields `NoOp`.
pub fn reconcile_achievement(goal: &Goal, existing: Option<&Achievement>) -> AchievementAction {
    let all_complete = compute_progress(goal).all_complete;
    match (all_complete, existing) {
        (true, None) => AchievementAction::Create(NewAchievement::for_goal(goal)),
        (false, Some(_)) => AchievementAction::Remove {
            goal_id: goal.id.clone(),
        },
        _ => AchievementAction::NoOp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::Milestone;
    use chrono::NaiveDateTime;

    fn goal_with(states: &[bool]) -> Goal {
        let milestones = states
            .iter()
            .enumerate()
            .map(|(i, done)| Milestone {
                id: format!("m{}", i),
                text: format!("milestone {}", i),
                completed: *done,
            })
            .collect();
        Goal::new(
            "goal-1".to_string(),
            "Learn X".to_string(),
            "2026-01-31".to_string(),
            milestones,
            NaiveDateTime::default(),
            NaiveDateTime::default(),
        )
    }

    fn stored_for(goal: &Goal) -> Achievement {
        Achievement {
            id: "a1".to_string(),
            goal_id: goal.id.clone(),
            message: goal.achievement_message(),
            created_at: NaiveDateTime::default(),
        }
    }

    /// Applies an action to an in-memory slot, mirroring what a store does.
    fn apply(action: &AchievementAction, slot: &mut Option<Achievement>) {
        match action {
            AchievementAction::Create(new) => {
                *slot = Some(Achievement {
                    id: "created".to_string(),
                    goal_id: new.goal_id.clone(),
                    message: new.message.clone(),
                    created_at: NaiveDateTime::default(),
                })
            }
            AchievementAction::Remove { .. } => *slot = None,
            AchievementAction::NoOp => {}
        }
    }

    #[test]
    fn test_partial_goal_without_achievement_is_noop() {
        let goal = goal_with(&[true, true, false]);
        assert_eq!(reconcile_achievement(&goal, None), AchievementAction::NoOp);
    }

    #[test]
    fn test_completing_goal_creates_achievement() {
        let goal = goal_with(&[true, true, true]);
        match reconcile_achievement(&goal, None) {
            AchievementAction::Create(new) => {
                assert_eq!(new.goal_id, "goal-1");
                assert_eq!(new.message, "Congratulations! Goal \"Learn X\" achieved!");
            }
            other => panic!("expected Create, got {:?}", other),
        }
    }

    #[test]
    fn test_completed_goal_with_achievement_is_noop() {
        let goal = goal_with(&[true, true]);
        let existing = stored_for(&goal);
        assert_eq!(
            reconcile_achievement(&goal, Some(&existing)),
            AchievementAction::NoOp
        );
    }

    #[test]
    fn test_reverting_milestone_removes_achievement() {
        let mut goal = goal_with(&[true, true]);
        let existing = stored_for(&goal);
        goal.milestones[0].completed = false;
        assert_eq!(
            reconcile_achievement(&goal, Some(&existing)),
            AchievementAction::Remove {
                goal_id: "goal-1".to_string()
            }
        );
    }

    #[test]
    fn test_empty_goal_never_earns_achievement() {
        let goal = goal_with(&[]);
        assert_eq!(reconcile_achievement(&goal, None), AchievementAction::NoOp);

        let stale = stored_for(&goal);
        assert!(matches!(
            reconcile_achievement(&goal, Some(&stale)),
            AchievementAction::Remove { .. }
        ));
    }

    #[test]
    fn test_reconcile_is_idempotent_once_applied() {
        for states in [
            vec![],
            vec![false],
            vec![true],
            vec![true, false],
            vec![true, true, true],
        ] {
            let goal = goal_with(&states);
            for initial in [None, Some(stored_for(&goal))] {
                let mut slot = initial;
                let first = reconcile_achievement(&goal, slot.as_ref());
                apply(&first, &mut slot);
                assert_eq!(
                    reconcile_achievement(&goal, slot.as_ref()),
                    AchievementAction::NoOp,
                    "states {:?}",
                    states
                );
            }
        }
    }

    #[test]
    fn test_action_serialization() {
        let json = serde_json::to_value(AchievementAction::Remove {
            goal_id: "g".to_string(),
        })
        .unwrap();
        assert_eq!(json["type"], "REMOVE");
        assert_eq!(json["goalId"], "g");

        let json = serde_json::to_value(AchievementAction::NoOp).unwrap();
        assert_eq!(json["type"], "NO_OP");
    }
}
