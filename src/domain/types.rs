/// Core types and enums used throughout the domain layer
///
/// This module defines the identifier newtypes, the Frequency enum and the
/// DayClass classification shared by Habit, CompletionLog and the streak code.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Unique identifier for a habit
///
/// This is a wrapper around UUID to provide type safety - you can't accidentally
/// pass a habit ID where a user ID is expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HabitId(pub Uuid);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a habit ID from a string (useful for database loading)
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for the user that owns a set of habits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How often a habit is meant to be performed
///
/// The frequency is declarative only: streaks are always counted in
/// consecutive calendar days regardless of the cadence. It does decide which
/// habits take part in the daily reminder selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every single day
    #[default]
    Daily,
    /// Once or more per week
    Weekly,
    /// A user-defined cadence
    Custom,
}

impl Frequency {
    /// Lowercase name used on the wire and in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Custom => "custom",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "custom" => Ok(Frequency::Custom),
            other => Err(DomainError::InvalidFrequency(format!(
                "'{}'. Valid options: daily, weekly, custom",
                other
            ))),
        }
    }
}

/// Where a calendar day sits relative to the reference "today"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayClass {
    Past,
    Today,
    Future,
}

impl DayClass {
    /// Only past days and today may be completed or uncompleted
    pub fn is_toggleable(&self) -> bool {
        !matches!(self, DayClass::Future)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_parsing() {
        assert_eq!("daily".parse::<Frequency>().unwrap(), Frequency::Daily);
        assert_eq!(" Weekly ".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert_eq!("CUSTOM".parse::<Frequency>().unwrap(), Frequency::Custom);
        assert!("weekdays".parse::<Frequency>().is_err());
        assert!("".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_frequency_round_trips_through_its_name() {
        for freq in [Frequency::Daily, Frequency::Weekly, Frequency::Custom] {
            assert_eq!(freq.as_str().parse::<Frequency>().unwrap(), freq);
        }
    }

    #[test]
    fn test_ids_parse_from_display() {
        let habit_id = HabitId::new();
        assert_eq!(HabitId::from_string(&habit_id.to_string()).unwrap(), habit_id);
        assert!(UserId::from_string("not-a-uuid").is_err());
    }

    #[test]
    fn test_only_future_days_are_locked() {
        assert!(DayClass::Past.is_toggleable());
        assert!(DayClass::Today.is_toggleable());
        assert!(!DayClass::Future.is_toggleable());
    }
}
