/// Habit entity and related functionality
///
/// This module defines the core Habit struct that represents a user's habit
/// they want to track, along with validation of its descriptive fields.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::{CompletionLog, DomainError, Frequency, HabitId, StreakCalculator, UserId};

/// Color given to habits created without one
pub const DEFAULT_COLOR: &str = "#3B82F6";

/// A habit represents something the user wants to do regularly
///
/// This is the core entity in our system. Each habit belongs to one user,
/// owns its completion log, and carries streak fields that only the
/// StreakCalculator writes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// The user this habit belongs to
    pub user_id: UserId,
    /// Display name (e.g., "Morning Run", "Read for 30min")
    pub name: String,
    /// Optional detailed description
    pub description: Option<String>,
    /// Declared cadence
    pub frequency: Frequency,
    /// Target count per period, at least 1
    pub goal: u32,
    /// Display tag, opaque to the tracker
    pub color: String,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
    pub(in crate::domain) completions: CompletionLog,
    pub(in crate::domain) current_streak: u32,
    pub(in crate::domain) longest_streak: u32,
}

/// Descriptive fields for a habit that is about to be created
#[derive(Debug, Clone, PartialEq)]
pub struct NewHabit {
    pub name: String,
    pub description: Option<String>,
    pub frequency: Frequency,
    pub goal: u32,
    pub color: Option<String>,
}

impl NewHabit {
    /// A daily habit with goal 1 and the default color
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            frequency: Frequency::Daily,
            goal: 1,
            color: None,
        }
    }
}

/// Partial update of a habit's descriptive fields
///
/// `None` leaves a field untouched. `description: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HabitChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub frequency: Option<Frequency>,
    pub goal: Option<u32>,
    pub color: Option<String>,
}

impl HabitChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// The habit starts with an empty completion log and both streaks at 0.
    pub fn new(user_id: UserId, fields: NewHabit) -> Result<Self, DomainError> {
        let name = Self::validate_name(&fields.name)?;
        let description = Self::validate_description(fields.description)?;
        Self::validate_goal(fields.goal)?;

        Ok(Self {
            id: HabitId::new(),
            user_id,
            name,
            description,
            frequency: fields.frequency,
            goal: fields.goal,
            color: fields
                .color
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            created_at: Utc::now(),
            completions: CompletionLog::new(),
            current_streak: 0,
            longest_streak: 0,
        })
    }

    /// Create a habit from existing data (used when loading from database)
    ///
    /// This constructor assumes data is already validated and is mainly used
    /// by the storage layer when loading habits from the database.
    #[allow(clippy::too_many_arguments)]
    pub fn from_existing(
        id: HabitId,
        user_id: UserId,
        name: String,
        description: Option<String>,
        frequency: Frequency,
        goal: u32,
        color: String,
        created_at: DateTime<Utc>,
        completions: CompletionLog,
        current_streak: u32,
        longest_streak: u32,
    ) -> Self {
        Self {
            id,
            user_id,
            name,
            description,
            frequency,
            goal,
            color,
            created_at,
            completions,
            current_streak,
            longest_streak,
        }
    }

    /// Apply a partial update with validation
    ///
    /// Nothing is changed unless every provided value is valid.
    pub fn update(&mut self, changes: HabitChanges) -> Result<(), DomainError> {
        let name = changes.name.as_deref().map(Self::validate_name).transpose()?;
        let description = changes
            .description
            .map(Self::validate_description)
            .transpose()?;
        if let Some(goal) = changes.goal {
            Self::validate_goal(goal)?;
        }

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(frequency) = changes.frequency {
            self.frequency = frequency;
        }
        if let Some(goal) = changes.goal {
            self.goal = goal;
        }
        if let Some(color) = changes.color {
            self.color = color;
        }

        Ok(())
    }

    /// Snapshot of this habit with `day` toggled and streaks recomputed
    ///
    /// The original habit is left untouched; the caller persists the
    /// returned value as a whole.
    pub fn with_completion(&self, day: NaiveDate, completed: bool, calculator: &StreakCalculator) -> Habit {
        let mut next = self.clone();
        if completed {
            next.completions.mark_completed(day);
        } else {
            next.completions.mark_incomplete(day);
        }
        calculator.refresh(&mut next);
        next
    }

    pub fn completions(&self) -> &CompletionLog {
        &self.completions
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub fn longest_streak(&self) -> u32 {
        self.longest_streak
    }

    // Validation helper methods

    /// Validate habit name, returning it trimmed
    fn validate_name(name: &str) -> Result<String, DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string()
            ));
        }

        if trimmed.chars().count() > 100 {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be longer than 100 characters".to_string()
            ));
        }

        Ok(trimmed.to_string())
    }

    /// Validate optional description; blank descriptions become None
    fn validate_description(description: Option<String>) -> Result<Option<String>, DomainError> {
        match description.map(|d| d.trim().to_string()) {
            Some(desc) if desc.is_empty() => Ok(None),
            Some(desc) if desc.chars().count() > 500 => Err(DomainError::Validation {
                message: "Description cannot be longer than 500 characters".to_string()
            }),
            other => Ok(other),
        }
    }

    fn validate_goal(goal: u32) -> Result<(), DomainError> {
        if goal == 0 {
            return Err(DomainError::InvalidGoal(
                "Goal must be at least 1".to_string()
            ));
        }
        Ok(())
    }
}
