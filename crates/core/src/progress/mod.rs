//! Progress module - milestone progress computation and achievement reconciliation.
//!
//! Everything here is pure: functions take goal state and return derived
//! values or decisions. Callers are responsible for persisting the outcome.

mod progress_calculator;
mod progress_model;
mod reconciler;

pub use progress_calculator::{compute_overall_progress, compute_progress, progress_of};
pub use progress_model::Progress;
pub use reconciler::{reconcile_achievement, AchievementAction};
