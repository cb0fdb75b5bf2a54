/// Streak calculation
///
/// This module derives a habit's current streak from its completion log and
/// keeps the longest streak up to date. Everything is computed relative to
/// an explicit reference day so callers decide what "today" means.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::domain::{CompletionLog, DayClass, Habit};

/// Computes streaks against a fixed reference day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakCalculator {
    today: NaiveDate,
}

impl StreakCalculator {
    /// Create a calculator for the given (already normalized) today
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Classify a day as past, today or future
    pub fn classify(&self, day: NaiveDate) -> DayClass {
        match day.cmp(&self.today) {
            Ordering::Less => DayClass::Past,
            Ordering::Equal => DayClass::Today,
            Ordering::Greater => DayClass::Future,
        }
    }

    /// Whether a completion may be toggled on `day`
    pub fn is_toggleable(&self, day: NaiveDate) -> bool {
        self.classify(day).is_toggleable()
    }

    /// Count consecutive completed days walking back from today
    ///
    /// Offset 0 is today. The walk stops at the first offset without a
    /// completed record, so a missing today means a streak of 0. Completed
    /// days after today do not take part.
    pub fn current_streak(&self, log: &CompletionLog) -> u32 {
        let mut streak = 0;
        let mut expected = self.today;

        for day in log.completed_days_through(self.today) {
            if day != expected {
                break;
            }
            streak += 1;
            expected = match expected.pred_opt() {
                Some(previous) => previous,
                None => break,
            };
        }

        streak
    }

    /// Recompute the streak fields of `habit` in place
    ///
    /// Returns true if either field changed. The longest streak only ever
    /// grows.
    pub fn refresh(&self, habit: &mut Habit) -> bool {
        let current = self.current_streak(&habit.completions);
        let longest = habit.longest_streak.max(current);
        let changed = current != habit.current_streak || longest != habit.longest_streak;

        habit.current_streak = current;
        habit.longest_streak = longest;

        changed
    }

    /// Copy of `habit` with freshly computed streak fields
    pub fn recomputed(&self, habit: &Habit) -> Habit {
        let mut next = habit.clone();
        self.refresh(&mut next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompletionRecord, NewHabit, UserId};
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn days_ago(n: i64) -> NaiveDate {
        today() - Duration::days(n)
    }

    fn new_habit() -> Habit {
        Habit::new(UserId::new(), NewHabit::named("Meditate")).unwrap()
    }

    #[test]
    fn test_classify_days() {
        let calc = StreakCalculator::new(today());

        assert_eq!(calc.classify(days_ago(1)), DayClass::Past);
        assert_eq!(calc.classify(today()), DayClass::Today);
        assert_eq!(calc.classify(days_ago(-1)), DayClass::Future);
        assert!(calc.is_toggleable(today()));
        assert!(!calc.is_toggleable(days_ago(-1)));
    }

    #[test]
    fn test_empty_log_has_no_streak() {
        let calc = StreakCalculator::new(today());
        assert_eq!(calc.current_streak(&CompletionLog::new()), 0);
    }

    #[test]
    fn test_streak_requires_today() {
        let calc = StreakCalculator::new(today());
        let mut log = CompletionLog::new();
        log.mark_completed(days_ago(1));
        log.mark_completed(days_ago(2));

        assert_eq!(calc.current_streak(&log), 0);
    }

    #[test]
    fn test_streak_stops_at_first_gap() {
        let calc = StreakCalculator::new(today());

        for n in 1..=6u32 {
            let mut log = CompletionLog::new();
            for offset in 0..n {
                log.mark_completed(days_ago(offset as i64));
            }
            // A completion beyond the gap must not count
            log.mark_completed(days_ago(n as i64 + 1));

            assert_eq!(calc.current_streak(&log), n);
        }
    }

    #[test]
    fn test_incomplete_records_break_the_streak() {
        let calc = StreakCalculator::new(today());
        let log = CompletionLog::from_records(vec![
            CompletionRecord { date: today(), completed: true },
            CompletionRecord { date: days_ago(1), completed: false },
            CompletionRecord { date: days_ago(2), completed: true },
        ]);

        assert_eq!(calc.current_streak(&log), 1);
    }

    #[test]
    fn test_future_completions_are_ignored() {
        let calc = StreakCalculator::new(today());
        let mut log = CompletionLog::new();
        log.mark_completed(days_ago(-2));
        log.mark_completed(today());
        log.mark_completed(days_ago(1));

        assert_eq!(calc.current_streak(&log), 2);
    }

    #[test]
    fn test_three_day_scenario() {
        let calc = StreakCalculator::new(today());
        let habit = new_habit();
        assert_eq!((habit.current_streak(), habit.longest_streak()), (0, 0));

        let habit = habit
            .with_completion(today(), true, &calc)
            .with_completion(days_ago(1), true, &calc)
            .with_completion(days_ago(2), true, &calc);
        assert_eq!((habit.current_streak(), habit.longest_streak()), (3, 3));

        let habit = habit.with_completion(days_ago(2), false, &calc);
        assert_eq!((habit.current_streak(), habit.longest_streak()), (2, 3));
    }

    #[test]
    fn test_unmarking_today_zeroes_streak() {
        let calc = StreakCalculator::new(today());
        let mut habit = new_habit();
        for n in 0..5 {
            habit = habit.with_completion(days_ago(n), true, &calc);
        }
        assert_eq!(habit.current_streak(), 5);

        let habit = habit.with_completion(today(), false, &calc);
        assert_eq!(habit.current_streak(), 0);
        assert_eq!(habit.longest_streak(), 5);
    }

    #[test]
    fn test_longest_streak_never_decreases() {
        let calc = StreakCalculator::new(today());
        let mut habit = new_habit();
        let mut previous_longest = 0;

        let toggles = [
            (0, true), (1, true), (2, true), (1, false), (0, false),
            (3, true), (2, true), (1, true), (0, true), (4, true), (2, false),
        ];
        for (offset, completed) in toggles {
            habit = habit.with_completion(days_ago(offset), completed, &calc);
            assert!(habit.longest_streak() >= previous_longest);
            assert!(habit.longest_streak() >= habit.current_streak());
            previous_longest = habit.longest_streak();
        }
        assert_eq!(habit.longest_streak(), 5);
    }

    #[test]
    fn test_empty_log_keeps_longest_streak() {
        let calc = StreakCalculator::new(today());
        let habit = new_habit().with_completion(today(), true, &calc);
        let habit = habit.with_completion(today(), false, &calc);

        assert!(habit.completions().is_empty());
        assert_eq!(habit.current_streak(), 0);
        assert_eq!(habit.longest_streak(), 1);
    }

    #[test]
    fn test_refresh_reports_changes() {
        let mut habit = new_habit();
        let yesterday_calc = StreakCalculator::new(days_ago(1));
        habit = habit.with_completion(days_ago(1), true, &yesterday_calc);
        assert_eq!(habit.current_streak(), 1);

        // The next day the streak silently breaks
        let calc = StreakCalculator::new(today());
        assert!(calc.refresh(&mut habit));
        assert_eq!(habit.current_streak(), 0);
        assert_eq!(habit.longest_streak(), 1);

        assert!(!calc.refresh(&mut habit));
    }

    #[test]
    fn test_recomputed_does_not_touch_input() {
        let calc = StreakCalculator::new(today());
        let mut habit = new_habit();
        habit.completions.mark_completed(today());

        let fresh = calc.recomputed(&habit);
        assert_eq!(habit.current_streak(), 0);
        assert_eq!(fresh.current_streak(), 1);
    }
}
