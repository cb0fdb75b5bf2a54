/// Analytics over a user's habit collection
///
/// This module provides the StatsAggregator, which turns habits whose streak
/// fields are already current into portfolio metrics and per-habit views.
/// It never recomputes streaks itself.

pub mod views;

pub use views::*;

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::domain::{DomainError, Habit, StreakCalculator};

/// Portfolio-level metrics for one user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PortfolioStats {
    pub total_habits: u32,
    pub total_completions: u32,
    pub average_streak: u32,
    pub longest_streak: u32,
}

/// How one habit stands today
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitTodayView {
    pub habit_id: String,
    pub name: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub completed_today: bool,
    /// Percentage of this week's non-future days that are completed
    pub weekly_completion_rate: u32,
}

/// Divide and round half up, as a whole number; 0 when `denominator` is 0
pub fn round_ratio(numerator: u64, denominator: u64) -> u32 {
    if denominator == 0 {
        return 0;
    }
    ((2 * numerator + denominator) / (2 * denominator)) as u32
}

/// Round-half-up percentage of `part` in `whole`; 0 when `whole` is 0
pub fn percentage(part: u64, whole: u64) -> u32 {
    round_ratio(part * 100, whole)
}

/// The Sunday that starts the week containing `day`
pub fn week_start(day: NaiveDate) -> Result<NaiveDate, DomainError> {
    day.checked_sub_days(Days::new(day.weekday().num_days_from_sunday() as u64))
        .ok_or_else(|| week_out_of_range(day))
}

/// The seven days of the week starting at `start`
///
/// Fails when the week runs past the last representable day.
pub fn week_days(start: NaiveDate) -> Result<Vec<NaiveDate>, DomainError> {
    (0..7)
        .map(|offset| {
            start
                .checked_add_days(Days::new(offset))
                .ok_or_else(|| week_out_of_range(start))
        })
        .collect()
}

fn week_out_of_range(day: NaiveDate) -> DomainError {
    DomainError::InvalidDate(format!("the week of {} is outside the supported calendar", day))
}

/// Aggregates statistics relative to a reference day
#[derive(Debug, Clone, Copy)]
pub struct StatsAggregator {
    calculator: StreakCalculator,
}

impl StatsAggregator {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            calculator: StreakCalculator::new(today),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.calculator.today()
    }

    /// Summarize the whole collection
    ///
    /// An empty collection yields all zeros.
    pub fn portfolio(&self, habits: &[Habit]) -> PortfolioStats {
        let total_habits = habits.len() as u64;
        let total_completions: u64 = habits
            .iter()
            .map(|h| h.completions().completed_count() as u64)
            .sum();
        let streak_sum: u64 = habits.iter().map(|h| h.current_streak() as u64).sum();
        let longest_streak = habits
            .iter()
            .map(|h| h.longest_streak())
            .max()
            .unwrap_or(0);

        PortfolioStats {
            total_habits: total_habits as u32,
            total_completions: total_completions as u32,
            average_streak: round_ratio(streak_sum, total_habits),
            longest_streak,
        }
    }

    /// Per-habit status for the dashboard
    pub fn today_views(&self, habits: &[Habit]) -> Vec<HabitTodayView> {
        habits.iter().map(|habit| self.today_view(habit)).collect()
    }

    pub fn today_view(&self, habit: &Habit) -> HabitTodayView {
        let today = self.today();
        HabitTodayView {
            habit_id: habit.id.to_string(),
            name: habit.name.clone(),
            current_streak: habit.current_streak(),
            longest_streak: habit.longest_streak(),
            completed_today: habit.completions().is_completed_on(today),
            weekly_completion_rate: week_start(today)
                .map_or(0, |start| self.weekly_completion_rate(habit, start)),
        }
    }

    /// Share of habits already completed today, as a percentage
    pub fn today_progress(&self, habits: &[Habit]) -> u32 {
        let today = self.today();
        let done = habits
            .iter()
            .filter(|h| h.completions().is_completed_on(today))
            .count();
        percentage(done as u64, habits.len() as u64)
    }

    /// Completion percentage over the non-future days of the week starting
    /// at `start`; 0 if every day of that week is still ahead
    pub fn weekly_completion_rate(&self, habit: &Habit, start: NaiveDate) -> u32 {
        // Days past the end of the calendar cannot be completed
        let eligible: Vec<NaiveDate> = (0..7)
            .filter_map(|offset| start.checked_add_days(Days::new(offset)))
            .filter(|day| self.calculator.is_toggleable(*day))
            .collect();
        let completed = eligible
            .iter()
            .filter(|day| habit.completions().is_completed_on(**day))
            .count();

        percentage(completed as u64, eligible.len() as u64)
    }

    pub(crate) fn calculator(&self) -> &StreakCalculator {
        &self.calculator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::domain::{NewHabit, UserId};

    fn today() -> NaiveDate {
        // A Wednesday
        NaiveDate::from_ymd_opt(2024, 3, 13).unwrap()
    }

    fn habit_with_streak(name: &str, days: i64) -> Habit {
        let calc = StreakCalculator::new(today());
        let mut habit = Habit::new(UserId::new(), NewHabit::named(name)).unwrap();
        for offset in 0..days {
            habit = habit.with_completion(today() - Duration::days(offset), true, &calc);
        }
        habit
    }

    #[test]
    fn test_rounding_is_half_up() {
        assert_eq!(round_ratio(4, 2), 2);
        assert_eq!(round_ratio(5, 2), 3);
        assert_eq!(round_ratio(7, 3), 2);
        assert_eq!(round_ratio(8, 3), 3);
        assert_eq!(round_ratio(1, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
    }

    #[test]
    fn test_empty_collection() {
        let stats = StatsAggregator::new(today()).portfolio(&[]);
        assert_eq!(stats, PortfolioStats::default());
        assert_eq!(StatsAggregator::new(today()).today_progress(&[]), 0);
    }

    #[test]
    fn test_two_habits_average() {
        let habits = vec![habit_with_streak("Run", 4), habit_with_streak("Read", 0)];
        let stats = StatsAggregator::new(today()).portfolio(&habits);

        assert_eq!(stats.total_habits, 2);
        assert_eq!(stats.total_completions, 4);
        assert_eq!(stats.average_streak, 2);
        assert_eq!(stats.longest_streak, 4);
    }

    #[test]
    fn test_portfolio_longest_uses_historic_best() {
        let calc = StreakCalculator::new(today());
        let broken = habit_with_streak("Run", 6).with_completion(today(), false, &calc);
        let habits = vec![broken, habit_with_streak("Read", 3)];

        let stats = StatsAggregator::new(today()).portfolio(&habits);
        assert_eq!(stats.longest_streak, 6);
        assert_eq!(stats.average_streak, 2); // (0 + 3) / 2 = 1.5 rounds up
    }

    #[test]
    fn test_week_starts_on_sunday() {
        assert_eq!(week_start(today()).unwrap(), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(week_start(sunday).unwrap(), sunday);
        assert_eq!(week_days(sunday).unwrap().len(), 7);
    }

    #[test]
    fn test_weeks_at_calendar_edges() {
        // The first representable day is not a Sunday and the last is not a Saturday
        assert!(matches!(week_start(NaiveDate::MIN), Err(DomainError::InvalidDate(_))));
        let last_week = week_start(NaiveDate::MAX).unwrap();
        assert!(matches!(week_days(last_week), Err(DomainError::InvalidDate(_))));

        let habit = habit_with_streak("Run", 1);
        let aggregator = StatsAggregator::new(NaiveDate::MAX);
        assert_eq!(aggregator.weekly_completion_rate(&habit, last_week), 0);
    }

    #[test]
    fn test_today_view() {
        // Sunday..Wednesday are eligible, three of them completed
        let habit = habit_with_streak("Run", 3);
        let view = StatsAggregator::new(today()).today_view(&habit);

        assert!(view.completed_today);
        assert_eq!(view.current_streak, 3);
        assert_eq!(view.weekly_completion_rate, 75);
    }

    #[test]
    fn test_future_week_has_zero_rate() {
        let habit = habit_with_streak("Run", 3);
        let aggregator = StatsAggregator::new(today());
        let next_week = week_start(today()).unwrap() + Duration::days(7);

        assert_eq!(aggregator.weekly_completion_rate(&habit, next_week), 0);
    }

    #[test]
    fn test_today_progress() {
        let habits = vec![
            habit_with_streak("Run", 1),
            habit_with_streak("Read", 0),
            habit_with_streak("Stretch", 2),
        ];
        assert_eq!(StatsAggregator::new(today()).today_progress(&habits), 67);
    }
}
