/// Calendar tools: week and month grids
///
/// This module implements the habit_week and habit_month MCP tools. Each
/// day in a grid is classified as past, today or future so clients can tell
/// which cells may still be toggled.

use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{week_start, MonthView, StatsAggregator, WeekView};
use crate::domain::DomainError;
use crate::storage::HabitStorage;
use crate::tools::{load_current_habits, parse_habit_id, ToolContext, ToolError};

/// Parameters for the week grid
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct WeekParams {
    /// Any day in the wanted week (defaults to today); weeks start on Sunday
    pub date: Option<String>,
}

/// Week grids for every habit
#[derive(Debug, Serialize)]
pub struct WeekResponse {
    pub week_start: NaiveDate,
    pub habits: Vec<WeekView>,
}

/// Parameters for the month grid
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MonthParams {
    /// ID of the habit
    pub habit_id: String,
    /// Calendar year (defaults to the current year)
    pub year: Option<i32>,
    /// Month 1-12 (defaults to the current month)
    pub month: Option<u32>,
}

/// Week grid for each of the calling user's habits
pub fn habit_week<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    params: WeekParams,
) -> Result<WeekResponse, ToolError> {
    let start = week_start(ctx.day_or_today(params.date.as_deref())?)?;
    let (habits, _) = load_current_habits(storage, ctx, false)?;
    let aggregator = StatsAggregator::new(ctx.today);
    let habits = habits
        .iter()
        .map(|habit| aggregator.week_view(habit, start))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WeekResponse {
        week_start: start,
        habits,
    })
}

/// Month grid for one habit
pub fn habit_month<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    params: MonthParams,
) -> Result<MonthView, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let year = params.year.unwrap_or_else(|| ctx.today.year());
    let month = params.month.unwrap_or_else(|| ctx.today.month());
    if !(1..=12).contains(&month) {
        return Err(DomainError::InvalidDate(format!("month {} is not between 1 and 12", month)).into());
    }

    let habit = storage.get_habit(&ctx.user_id, &habit_id)?;
    let aggregator = StatsAggregator::new(ctx.today);
    Ok(aggregator.month_view(&habit, year, month)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DayClass;
    use crate::tools::test_support::{create, day, setup};
    use crate::tools::{complete_habit, ToggleParams};

    fn complete(storage: &crate::storage::SqliteStorage, ctx: &ToolContext, id: &str, date: &str) {
        complete_habit(
            storage,
            ctx,
            ToggleParams {
                habit_id: id.to_string(),
                date: Some(date.to_string()),
            },
        )
        .unwrap();
    }

    #[test]
    fn test_current_week() {
        // 2024-06-12 is a Wednesday
        let (storage, ctx) = setup(day(2024, 6, 12));
        let id = create(&storage, &ctx, "Stretch");
        complete(&storage, &ctx, &id, "2024-06-09");
        complete(&storage, &ctx, &id, "2024-06-11");

        let response = habit_week(&storage, &ctx, WeekParams::default()).unwrap();
        assert_eq!(response.week_start, day(2024, 6, 9));

        let view = &response.habits[0];
        let classes: Vec<DayClass> = view.days.iter().map(|cell| cell.class).collect();
        assert_eq!(classes[..3], [DayClass::Past, DayClass::Past, DayClass::Past]);
        assert_eq!(classes[3], DayClass::Today);
        assert!(classes[4..].iter().all(|c| *c == DayClass::Future));
        // 2 of the 4 days up to today
        assert_eq!(view.completion_rate, 50);
    }

    #[test]
    fn test_week_of_given_date() {
        let (storage, ctx) = setup(day(2024, 6, 12));
        create(&storage, &ctx, "Stretch");

        let response = habit_week(
            &storage,
            &ctx,
            WeekParams {
                date: Some("2024-06-05".to_string()),
            },
        )
        .unwrap();
        assert_eq!(response.week_start, day(2024, 6, 2));
        assert!(response.habits[0].days.iter().all(|cell| cell.class == DayClass::Past));
    }

    #[test]
    fn test_week_at_calendar_edges_is_invalid() {
        let (storage, ctx) = setup(day(2024, 6, 12));
        create(&storage, &ctx, "Stretch");

        for edge in [NaiveDate::MIN, NaiveDate::MAX] {
            let result = habit_week(
                &storage,
                &ctx,
                WeekParams {
                    date: Some(edge.to_string()),
                },
            );
            assert!(matches!(result, Err(ToolError::Validation(DomainError::InvalidDate(_)))));
        }
    }

    #[test]
    fn test_month_grid() {
        let (storage, ctx) = setup(day(2024, 2, 20));
        let id = create(&storage, &ctx, "Stretch");
        complete(&storage, &ctx, &id, "2024-02-01");
        complete(&storage, &ctx, &id, "2024-02-20");

        let view = habit_month(
            &storage,
            &ctx,
            MonthParams {
                habit_id: id,
                year: None,
                month: None,
            },
        )
        .unwrap();
        assert_eq!((view.year, view.month), (2024, 2));
        assert_eq!(view.days.len(), 29);
        assert_eq!(view.completed_days, 2);
    }

    #[test]
    fn test_month_out_of_range() {
        let (storage, ctx) = setup(day(2024, 2, 20));
        let id = create(&storage, &ctx, "Stretch");

        let result = habit_month(
            &storage,
            &ctx,
            MonthParams {
                habit_id: id,
                year: Some(2024),
                month: Some(13),
            },
        );
        assert!(matches!(result, Err(ToolError::Validation(DomainError::InvalidDate(_)))));
    }
}
