/// Basic unit tests to verify core functionality
use chrono::{Duration, NaiveDate};
use habit_streak_mcp::analytics::percentage;
use habit_streak_mcp::domain::{CompletionRecord, DayClass, NewHabit};
use habit_streak_mcp::*;
use tempfile::NamedTempFile;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    #[test]
    fn test_habit_creation() {
        let habit = Habit::new(UserId::new(), NewHabit::named("Test Habit"));

        assert!(habit.is_ok());
        let habit = habit.unwrap();
        assert_eq!(habit.name, "Test Habit");
        assert_eq!(habit.frequency, Frequency::Daily);
        assert_eq!(habit.current_streak(), 0);
        assert!(habit.completions().is_empty());
    }

    #[test]
    fn test_mark_and_unmark_keep_one_record_per_day() {
        let mut log = CompletionLog::new();
        let today = day(2024, 5, 1);

        log.mark_completed(today);
        log.mark_completed(today);
        log.mark_incomplete(today);
        log.mark_completed(today);

        assert_eq!(log.len(), 1);
        assert!(log.is_completed_on(today));
    }

    #[test]
    fn test_streak_stops_at_first_gap() {
        let today = day(2024, 5, 10);
        let log = CompletionLog::from_records(
            [0, 1, 2, 4, 5]
                .iter()
                .map(|n| CompletionRecord {
                    date: today - Duration::days(*n),
                    completed: true,
                }),
        );

        assert_eq!(StreakCalculator::new(today).current_streak(&log), 3);
        // Yesterday alone does not carry a streak into today
        assert_eq!(StreakCalculator::new(today + Duration::days(1)).current_streak(&log), 0);
    }

    #[test]
    fn test_day_classification() {
        let calculator = StreakCalculator::new(day(2024, 5, 10));

        assert_eq!(calculator.classify(day(2024, 5, 9)), DayClass::Past);
        assert_eq!(calculator.classify(day(2024, 5, 10)), DayClass::Today);
        assert_eq!(calculator.classify(day(2024, 5, 11)), DayClass::Future);
        assert!(!calculator.is_toggleable(day(2024, 5, 11)));
    }

    #[test]
    fn test_rounding_is_half_up() {
        assert_eq!(percentage(1, 2), 50);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn test_empty_portfolio() {
        let stats = StatsAggregator::new(day(2024, 5, 10)).portfolio(&[]);
        assert_eq!(stats, PortfolioStats::default());
    }

    #[test]
    fn test_server_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = HabitTrackerServer::new(temp_file.path().to_path_buf(), TrackerConfig::default());
        assert!(server.is_ok());
        assert_eq!(server.unwrap().user().name, "local");
    }

    #[test]
    fn test_storage_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path());
        assert!(storage.is_ok());
    }
}
