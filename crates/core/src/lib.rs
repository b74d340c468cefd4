//! Goal Tracker Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for the goal tracker.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod achievements;
pub mod board;
pub mod constants;
pub mod errors;
pub mod goals;
pub mod progress;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
