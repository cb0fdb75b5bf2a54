/// Calendar-shaped views of a habit's completion log
///
/// Week and month grids plus the per-habit detail summary.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::analytics::{percentage, week_days, StatsAggregator};
use crate::domain::{DayClass, DomainError, Habit};

/// Default number of entries in a habit's recent completion list
pub const RECENT_COMPLETIONS: usize = 10;

/// One day in a calendar grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub class: DayClass,
    pub completed: bool,
}

/// Seven days of one habit, Sunday first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekView {
    pub habit_id: String,
    pub name: String,
    pub week_start: NaiveDate,
    pub days: Vec<DayCell>,
    pub completion_rate: u32,
}

/// Every day of one calendar month for one habit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthView {
    pub habit_id: String,
    pub year: i32,
    pub month: u32,
    pub days: Vec<DayCell>,
    pub completed_days: u32,
}

/// Summary shown on a habit's own page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitDetail {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completions: u32,
    /// Completed records as a percentage of all records
    pub completion_rate: u32,
    /// Most recent completed days, newest first
    pub recent_completions: Vec<NaiveDate>,
}

impl StatsAggregator {
    fn cell(&self, habit: &Habit, date: NaiveDate) -> DayCell {
        DayCell {
            date,
            class: self.calculator().classify(date),
            completed: habit.completions().is_completed_on(date),
        }
    }

    /// Week grid starting at `start`
    pub fn week_view(&self, habit: &Habit, start: NaiveDate) -> Result<WeekView, DomainError> {
        let days = week_days(start)?
            .into_iter()
            .map(|day| self.cell(habit, day))
            .collect();

        Ok(WeekView {
            habit_id: habit.id.to_string(),
            name: habit.name.clone(),
            week_start: start,
            days,
            completion_rate: self.weekly_completion_rate(habit, start),
        })
    }

    /// Month grid for `year`/`month`
    pub fn month_view(&self, habit: &Habit, year: i32, month: u32) -> Result<MonthView, DomainError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            DomainError::InvalidDate(format!("{}-{:02} is not a calendar month", year, month))
        })?;

        let days: Vec<DayCell> = first
            .iter_days()
            .take_while(|day| day.month() == month)
            .map(|day| self.cell(habit, day))
            .collect();
        let completed_days = days.iter().filter(|cell| cell.completed).count() as u32;

        Ok(MonthView {
            habit_id: habit.id.to_string(),
            year,
            month,
            days,
            completed_days,
        })
    }

    pub fn habit_detail(&self, habit: &Habit, recent_limit: usize) -> HabitDetail {
        let log = habit.completions();
        let total_completions = log.completed_count();

        HabitDetail {
            current_streak: habit.current_streak(),
            longest_streak: habit.longest_streak(),
            total_completions: total_completions as u32,
            completion_rate: percentage(total_completions as u64, log.len() as u64),
            recent_completions: log.completed_days_desc().take(recent_limit).collect(),
        }
    }
}
