//! Goals module - domain models, services, and traits.

mod goals_model;
mod goals_service;
mod goals_traits;


pub use goals_model::{
    assign_missing_milestone_ids, new_milestone_id, Goal, GoalMutation, GoalUpdate, Milestone,
    NewGoal,
};
pub use goals_service::GoalService;
pub use goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
