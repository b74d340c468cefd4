use crate::goals::{Goal, Milestone};

use super::progress_model::Progress;

/// Computes progress for a single goal from its milestones.
pub fn compute_progress(goal: &Goal) -> Progress {
    progress_of(&goal.milestones)
}

/// Computes progress for a milestone list.
pub fn progress_of(milestones: &[Milestone]) -> Progress {
    let completed = milestones.iter().filter(|m| m.completed).count();
    Progress::from_counts(completed, milestones.len())
}

/// Aggregates progress over all goals.
///
/// Milestone counts are summed before rounding, so a single-goal collection
/// always reports exactly that goal's progress.
pub fn compute_overall_progress(goals: &[Goal]) -> Progress {
    let (completed, total) = goals.iter().fold((0usize, 0usize), |(c, t), goal| {
        let progress = compute_progress(goal);
        (c + progress.completed_count, t + progress.total_count)
    });
    Progress::from_counts(completed, total)
}
