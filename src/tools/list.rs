/// Tool for listing all habits
///
/// This module implements the habit_list MCP tool. Listing is the read that
/// brings stored streaks up to date: when recompute-on-read is enabled, any
/// habit whose streak went stale since its last write is saved back.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::StatsAggregator;
use crate::domain::{DomainError, Frequency, Habit};
use crate::storage::HabitStorage;
use crate::tools::{load_current_habits, ToolContext, ToolError};

/// Parameters for listing habits
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListHabitsParams {
    /// Only list habits with this frequency: daily, weekly or custom
    pub frequency: Option<String>,
    /// Sort order: "created" (newest first, the default), "name" or "streak"
    pub sort_by: Option<String>,
}

/// Information about a habit in the list
#[derive(Debug, Serialize)]
pub struct HabitSummary {
    pub habit_id: String,
    pub name: String,
    pub description: Option<String>,
    pub frequency: Frequency,
    pub goal: u32,
    pub color: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub completed_today: bool,
    pub weekly_completion_rate: u32,
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<HabitSummary>,
    /// Percentage of listed habits completed today
    pub today_progress: u32,
    /// Number of habits whose streaks were recomputed by this read
    pub refreshed: usize,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortOrder {
    Created,
    Name,
    Streak,
}

fn parse_sort(input: Option<&str>) -> Result<SortOrder, DomainError> {
    match input.map(|s| s.trim().to_lowercase()).as_deref() {
        None | Some("") | Some("created") | Some("created_at") => Ok(SortOrder::Created),
        Some("name") => Ok(SortOrder::Name),
        Some("streak") => Ok(SortOrder::Streak),
        Some(other) => Err(DomainError::Validation {
            message: format!("Unknown sort order '{}': use created, name or streak", other),
        }),
    }
}

/// List the calling user's habits with up-to-date streaks
pub fn list_habits<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    params: ListHabitsParams,
) -> Result<ListHabitsResponse, ToolError> {
    let frequency = params
        .frequency
        .as_deref()
        .map(str::parse::<Frequency>)
        .transpose()?;
    let sort = parse_sort(params.sort_by.as_deref())?;

    let (habits, refreshed) = load_current_habits(storage, ctx, ctx.recompute_on_read)?;
    let mut habits: Vec<Habit> = habits
        .into_iter()
        .filter(|habit| frequency.map_or(true, |f| habit.frequency == f))
        .collect();

    match sort {
        SortOrder::Created => {}
        SortOrder::Name => habits.sort_by_key(|h| h.name.to_lowercase()),
        SortOrder::Streak => habits.sort_by(|a, b| b.current_streak().cmp(&a.current_streak())),
    }

    let aggregator = StatsAggregator::new(ctx.today);
    let today_progress = aggregator.today_progress(&habits);

    let summaries: Vec<HabitSummary> = habits
        .iter()
        .map(|habit| {
            let view = aggregator.today_view(habit);
            HabitSummary {
                habit_id: view.habit_id,
                name: view.name,
                description: habit.description.clone(),
                frequency: habit.frequency,
                goal: habit.goal,
                color: habit.color.clone(),
                current_streak: view.current_streak,
                longest_streak: view.longest_streak,
                completed_today: view.completed_today,
                weekly_completion_rate: view.weekly_completion_rate,
            }
        })
        .collect();

    let message = if summaries.is_empty() {
        "No habits yet. Create one to get started!".to_string()
    } else {
        let done = summaries.iter().filter(|s| s.completed_today).count();
        format!("📋 {} habit(s), {} done today ({}%)", summaries.len(), done, today_progress)
    };

    Ok(ListHabitsResponse {
        habits: summaries,
        today_progress,
        refreshed,
        message,
    })
}
