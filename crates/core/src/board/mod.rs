//! Goal board - client-side view state over the goal and achievement services.
//!
//! The board keeps an explicit cache of goals and achievements and a single
//! invalidation rule: after every mutating call it refetches both lists from
//! the services. Editing goes through [`EditMode`] instead of ad-hoc prompts.

mod edit_mode;
mod goal_board;


pub use edit_mode::EditMode;
pub use goal_board::GoalBoard;
