/// Tool for inspecting a single habit
///
/// This module implements the habit_detail MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{HabitDetail, StatsAggregator, RECENT_COMPLETIONS};
use crate::domain::Habit;
use crate::storage::HabitStorage;
use crate::tools::{parse_habit_id, ToolContext, ToolError};

/// Parameters for the habit detail view
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct HabitDetailParams {
    /// ID of the habit
    pub habit_id: String,
    /// How many recent completion days to include (defaults to 10)
    pub recent_limit: Option<usize>,
}

/// Response with a habit and its statistics
#[derive(Debug, Serialize)]
pub struct HabitDetailResponse {
    pub habit: Habit,
    pub completed_today: bool,
    pub stats: HabitDetail,
}

/// Show one habit with streaks as of today
///
/// Streaks are recomputed in memory; nothing is written.
pub fn habit_detail<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    params: HabitDetailParams,
) -> Result<HabitDetailResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let stored = storage.get_habit(&ctx.user_id, &habit_id)?;
    let habit = ctx.calculator().recomputed(&stored);

    let aggregator = StatsAggregator::new(ctx.today);
    let stats = aggregator.habit_detail(&habit, params.recent_limit.unwrap_or(RECENT_COMPLETIONS));

    Ok(HabitDetailResponse {
        completed_today: habit.completions().is_completed_on(ctx.today),
        habit,
        stats,
    })
}
