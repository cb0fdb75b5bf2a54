/// Domain module containing core business logic and data types
///
/// This module defines the core entities (Habit, CompletionLog, User), the
/// StreakCalculator, and their validation rules. Nothing in here performs
/// I/O.

pub mod completion;
pub mod habit;
pub mod streak;
pub mod types;
pub mod user;

// Re-export public types for easy access
pub use completion::*;
pub use habit::*;
pub use streak::*;
pub use types::*;
pub use user::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid goal: {0}")]
    InvalidGoal(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
