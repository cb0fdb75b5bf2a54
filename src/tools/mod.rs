/// MCP tools for habit management
///
/// This module contains all the operations that external clients (like Claude)
/// can call to interact with the habit tracker. Each tool takes a storage
/// backend, a ToolContext naming the acting user and today's date, and its
/// own parameter struct.

pub mod create;
pub mod toggle;
pub mod list;
pub mod detail;
pub mod stats;
pub mod calendar;
pub mod update;
pub mod user;
pub mod reminders;

// Re-export tool functions for easy access
pub use create::*;
pub use toggle::*;
pub use list::*;
pub use detail::*;
pub use stats::*;
pub use calendar::*;
pub use update::*;
pub use user::*;
pub use reminders::*;

use chrono::{FixedOffset, NaiveDate};
use thiserror::Error;

use crate::config::TrackerConfig;
use crate::domain::{self, DomainError, Habit, HabitId, StreakCalculator, UserId};
use crate::storage::{HabitStorage, StorageError};

/// Errors reported back to the caller of a tool
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{0}")]
    Validation(#[from] DomainError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Policy violation: {message}")]
    PolicyViolation { message: String },

    #[error("Storage error: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for ToolError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::HabitNotFound { habit_id } => ToolError::NotFound {
                kind: "Habit",
                id: habit_id,
            },
            StorageError::UserNotFound { user_id } => ToolError::NotFound {
                kind: "User",
                id: user_id,
            },
            other => ToolError::Storage(other),
        }
    }
}

/// Who is calling and what day it is for them
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub user_id: UserId,
    pub today: NaiveDate,
    pub reference_offset: FixedOffset,
    pub recompute_on_read: bool,
}

impl ToolContext {
    /// Context for `user_id` with today read from the clock
    pub fn new(user_id: UserId, config: &TrackerConfig) -> Self {
        Self {
            user_id,
            today: config.today(),
            reference_offset: config.reference_offset,
            recompute_on_read: config.recompute_on_read,
        }
    }

    /// Same context pinned to another day
    pub fn at(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn calculator(&self) -> StreakCalculator {
        StreakCalculator::new(self.today)
    }

    /// Parse an optional day argument; absent means today
    pub fn day_or_today(&self, input: Option<&str>) -> Result<NaiveDate, DomainError> {
        match input.map(str::trim).filter(|s| !s.is_empty()) {
            Some(text) => domain::parse_day(text, &self.reference_offset),
            None => Ok(self.today),
        }
    }
}

/// Parse a habit ID argument; malformed IDs cannot exist, so they are not found
pub(crate) fn parse_habit_id(input: &str) -> Result<HabitId, ToolError> {
    HabitId::from_string(input).map_err(|_| ToolError::NotFound {
        kind: "Habit",
        id: input.to_string(),
    })
}

/// Load the user's habits with streaks brought up to today
///
/// With `persist` set, habits whose streak fields changed are written back.
/// Returns the habits and how many of them changed.
pub(crate) fn load_current_habits<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    persist: bool,
) -> Result<(Vec<Habit>, usize), ToolError> {
    let calculator = ctx.calculator();
    let mut habits = storage.list_habits(&ctx.user_id)?;
    let mut changed = 0;

    for habit in habits.iter_mut() {
        if calculator.refresh(habit) {
            changed += 1;
            if persist {
                storage.replace_habit(habit)?;
            }
        }
    }

    if changed > 0 {
        tracing::debug!(
            "Recomputed {} stale streak(s) for user {} (persisted: {})",
            changed,
            ctx.user_id,
            persist
        );
    }

    Ok((habits, changed))
}
