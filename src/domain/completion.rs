/// Completion log for a single habit
///
/// This module defines the CompletionRecord struct and the CompletionLog that
/// keeps at most one record per calendar day, plus the helpers that turn
/// timestamps and user input into calendar days.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// One day's completion state for a habit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    /// The calendar day this record is for
    pub date: NaiveDate,
    /// Whether the habit was completed on that day
    pub completed: bool,
}

/// Strip the time of day from an instant, in the given reference zone
///
/// Two instants that fall on the same Gregorian day in `zone` normalize to
/// the same calendar day, whatever their own offsets are.
pub fn normalize<Tz: TimeZone>(instant: &DateTime<Tz>, zone: &FixedOffset) -> NaiveDate {
    instant.with_timezone(zone).date_naive()
}

/// Parse user input into a calendar day
///
/// Accepts a plain `YYYY-MM-DD` day or an RFC 3339 timestamp, which is
/// normalized into `zone`.
pub fn parse_day(input: &str, zone: &FixedOffset) -> Result<NaiveDate, DomainError> {
    let trimmed = input.trim();

    if let Ok(day) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(day);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|instant| normalize(&instant, zone))
        .map_err(|_| {
            DomainError::InvalidDate(format!(
                "'{}' is not a YYYY-MM-DD day or an RFC 3339 timestamp",
                trimmed
            ))
        })
}

/// The set of completion records owned by one habit
///
/// Records are keyed by calendar day, so the one-record-per-day rule holds
/// by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CompletionRecord>", into = "Vec<CompletionRecord>")]
pub struct CompletionLog {
    records: BTreeMap<NaiveDate, bool>,
}

impl CompletionLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from stored records
    ///
    /// Duplicate days collapse into one record; a completed flag wins over
    /// an incomplete one.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = CompletionRecord>,
    {
        let mut log = Self::new();
        for record in records {
            let flag = log.records.entry(record.date).or_insert(false);
            *flag |= record.completed;
        }
        log
    }

    /// Mark the habit as completed on `day`
    ///
    /// Flips an existing record to completed or inserts a new one. The log
    /// does not care whether `day` lies in the future.
    pub fn mark_completed(&mut self, day: NaiveDate) {
        self.records.insert(day, true);
    }

    /// Remove whatever record exists for `day`
    pub fn mark_incomplete(&mut self, day: NaiveDate) {
        self.records.remove(&day);
    }

    /// True iff a record exists for `day` and it is completed
    pub fn is_completed_on(&self, day: NaiveDate) -> bool {
        self.records.get(&day).copied().unwrap_or(false)
    }

    /// All records, oldest first
    pub fn records(&self) -> impl Iterator<Item = CompletionRecord> + '_ {
        self.records
            .iter()
            .map(|(date, completed)| CompletionRecord { date: *date, completed: *completed })
    }

    /// Completed days, newest first
    pub fn completed_days_desc(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.records
            .iter()
            .rev()
            .filter(|(_, completed)| **completed)
            .map(|(date, _)| *date)
    }

    /// Completed days up to and including `day`, newest first
    pub fn completed_days_through(&self, day: NaiveDate) -> impl Iterator<Item = NaiveDate> + '_ {
        self.records
            .range(..=day)
            .rev()
            .filter(|(_, completed)| **completed)
            .map(|(date, _)| *date)
    }

    /// Number of records flagged as completed
    pub fn completed_count(&self) -> usize {
        self.records.values().filter(|completed| **completed).count()
    }

    /// Number of records, completed or not
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<CompletionRecord>> for CompletionLog {
    fn from(records: Vec<CompletionRecord>) -> Self {
        Self::from_records(records)
    }
}

impl From<CompletionLog> for Vec<CompletionRecord> {
    fn from(log: CompletionLog) -> Self {
        log.records().collect()
    }
}
