/// End-to-end streak scenarios driven through the tools
use chrono::NaiveDate;
use habit_streak_mcp::tools::{self, CreateHabitParams, ListHabitsParams, StatsParams, ToggleParams};
use habit_streak_mcp::*;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn toggle(id: &str, date: &str) -> ToggleParams {
    ToggleParams {
        habit_id: id.to_string(),
        date: Some(date.to_string()),
    }
}

#[test]
fn test_three_day_scenario_and_stats() {
    let server = HabitTrackerServer::in_memory(TrackerConfig::default()).unwrap();
    let ctx = server.context().at(day(2024, 3, 3));
    let storage = server.storage();

    let run = tools::create_habit(storage, &ctx, CreateHabitParams::named("Run")).unwrap().habit_id;
    let read = tools::create_habit(storage, &ctx, CreateHabitParams::named("Read")).unwrap().habit_id;

    for date in ["2024-03-01", "2024-03-02", "2024-03-03"] {
        tools::complete_habit(storage, &ctx, toggle(&run, date)).unwrap();
    }
    tools::complete_habit(storage, &ctx, toggle(&read, "2024-03-03")).unwrap();

    let removed = tools::uncomplete_habit(storage, &ctx, toggle(&run, "2024-03-02")).unwrap();
    assert_eq!((removed.current_streak, removed.longest_streak), (1, 3));

    let restored = tools::complete_habit(storage, &ctx, toggle(&run, "2024-03-02")).unwrap();
    assert_eq!((restored.current_streak, restored.longest_streak), (3, 3));

    let stats = tools::get_stats(storage, &ctx, StatsParams::default()).unwrap();
    assert_eq!(stats.stats.total_habits, 2);
    assert_eq!(stats.stats.total_completions, 4);
    assert_eq!(stats.stats.average_streak, 2);
    assert_eq!(stats.stats.longest_streak, 3);
    assert_eq!(stats.today_progress, 100);
}

#[test]
fn test_broken_streak_shows_up_on_next_list() {
    let server = HabitTrackerServer::in_memory(TrackerConfig::default()).unwrap();
    let ctx = server.context().at(day(2024, 3, 3));
    let storage = server.storage();

    let run = tools::create_habit(storage, &ctx, CreateHabitParams::named("Run")).unwrap().habit_id;
    tools::complete_habit(storage, &ctx, toggle(&run, "2024-03-02")).unwrap();
    tools::complete_habit(storage, &ctx, toggle(&run, "2024-03-03")).unwrap();

    let two_days_later = ctx.clone().at(day(2024, 3, 5));
    let listed = tools::list_habits(storage, &two_days_later, ListHabitsParams::default()).unwrap();
    assert_eq!(listed.habits[0].current_streak, 0);
    assert_eq!(listed.habits[0].longest_streak, 2);
    assert!(!listed.habits[0].completed_today);
}

#[test]
fn test_future_toggle_is_rejected() {
    let server = HabitTrackerServer::in_memory(TrackerConfig::default()).unwrap();
    let ctx = server.context().at(day(2024, 3, 3));
    let storage = server.storage();

    let run = tools::create_habit(storage, &ctx, CreateHabitParams::named("Run")).unwrap().habit_id;
    let result = tools::complete_habit(storage, &ctx, toggle(&run, "2024-03-04"));
    assert!(matches!(result, Err(ToolError::PolicyViolation { .. })));

    let habits = storage.list_habits(&server.user().id).unwrap();
    assert!(habits[0].completions().is_empty());
}
