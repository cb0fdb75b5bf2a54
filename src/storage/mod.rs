/// Storage layer for persisting habit data
///
/// This module handles all database operations using SQLite. It provides
/// a clean interface for storing and retrieving users and their habits,
/// completion logs included.

pub mod sqlite;
pub mod migrations;

// Re-export the main storage types
pub use sqlite::*;

use thiserror::Error;
use crate::domain::{Frequency, Habit, HabitId, User, UserId};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the storage interface for habits
///
/// Habits are always addressed through their owner, so a habit that exists
/// but belongs to someone else is reported as not found. Saving a habit
/// replaces the whole aggregate (descriptive fields, streaks and
/// completions) in one step.
pub trait HabitStorage {
    /// Create a new user
    fn create_user(&self, user: &User) -> Result<(), StorageError>;

    /// Get a user by ID
    fn get_user(&self, user_id: &UserId) -> Result<User, StorageError>;

    /// Look a user up by their unique name
    fn find_user_by_name(&self, name: &str) -> Result<Option<User>, StorageError>;

    /// Overwrite a user's name, email and reminder preference
    fn update_user(&self, user: &User) -> Result<(), StorageError>;

    /// Users who opted into the daily reminder
    fn list_users_with_reminders(&self) -> Result<Vec<User>, StorageError>;

    /// Create a new habit
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get one of a user's habits
    fn get_habit(&self, user_id: &UserId, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// All of a user's habits, newest first
    fn list_habits(&self, user_id: &UserId) -> Result<Vec<Habit>, StorageError>;

    /// A user's habits with the given frequency, newest first
    fn list_habits_by_frequency(
        &self,
        user_id: &UserId,
        frequency: Frequency,
    ) -> Result<Vec<Habit>, StorageError>;

    /// Replace a stored habit with a new snapshot
    ///
    /// Fails with `HabitNotFound` if the habit was deleted in the meantime.
    fn replace_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Delete a habit and its completions
    fn delete_habit(&self, user_id: &UserId, habit_id: &HabitId) -> Result<(), StorageError>;
}
