//! SQLite storage implementation for achievements.

mod model;
mod repository;

pub use model::{AchievementDB, NewAchievementDB};
pub use repository::AchievementRepository;
