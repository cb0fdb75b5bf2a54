/// Runtime configuration for the tracker
///
/// The reference UTC offset decides what a calendar day is: timestamps are
/// normalized with it and "today" is read with it. It is set once at start-up
/// and passed everywhere a day boundary matters.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeZone, Utc};

use crate::domain;

/// Name of the user the server acts for when none is configured
pub const DEFAULT_USER: &str = "local";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Offset that defines calendar days
    pub reference_offset: FixedOffset,
    /// Persist streak changes discovered while listing habits
    pub recompute_on_read: bool,
    /// Owner of the habits handled by this server
    pub user_name: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            reference_offset: utc(),
            recompute_on_read: true,
            user_name: DEFAULT_USER.to_string(),
        }
    }
}

impl TrackerConfig {
    /// The current calendar day in the reference zone
    pub fn today(&self) -> NaiveDate {
        self.normalize(&Utc::now())
    }

    /// Calendar day of an instant in the reference zone
    pub fn normalize<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> NaiveDate {
        domain::normalize(instant, &self.reference_offset)
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

/// Parse `Z`, `UTC` or a `±HH:MM` / `±HHMM` / `±HH` offset
pub fn parse_utc_offset(input: &str) -> Result<FixedOffset, String> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return Ok(utc());
    }

    let (sign, rest) = match trimmed.chars().next() {
        Some('+') => (1, &trimmed[1..]),
        Some('-') => (-1, &trimmed[1..]),
        _ => return Err(format!("offset '{}' must start with + or -", trimmed)),
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) || !matches!(digits.len(), 2 | 4) {
        return Err(format!("offset '{}' is not of the form ±HH:MM", trimmed));
    }

    let hours: i32 = digits[..2].parse().map_err(|_| format!("bad hours in '{}'", trimmed))?;
    let minutes: i32 = if digits.len() == 4 {
        digits[2..].parse().map_err(|_| format!("bad minutes in '{}'", trimmed))?
    } else {
        0
    };
    if minutes >= 60 {
        return Err(format!("offset '{}' has more than 59 minutes", trimmed));
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| format!("offset '{}' is out of range", trimmed))
}
