/// Tool for portfolio statistics
///
/// This module implements the habit_stats MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{HabitTodayView, PortfolioStats, StatsAggregator};
use crate::storage::HabitStorage;
use crate::tools::{load_current_habits, ToolContext, ToolError};

/// Parameters for the stats tool
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct StatsParams {
    /// Include a per-habit breakdown (defaults to true)
    pub include_habits: Option<bool>,
}

/// Portfolio metrics plus today's progress
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub date: chrono::NaiveDate,
    #[serde(flatten)]
    pub stats: PortfolioStats,
    pub today_progress: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub habits: Vec<HabitTodayView>,
    pub message: String,
}

/// Summarize all of the calling user's habits as of today
pub fn get_stats<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    params: StatsParams,
) -> Result<StatsResponse, ToolError> {
    let (habits, _) = load_current_habits(storage, ctx, false)?;
    let aggregator = StatsAggregator::new(ctx.today);

    let stats = aggregator.portfolio(&habits);
    let today_progress = aggregator.today_progress(&habits);
    let breakdown = if params.include_habits.unwrap_or(true) {
        aggregator.today_views(&habits)
    } else {
        Vec::new()
    };

    let message = format!(
        "📊 {} habit(s), {} completion(s), average streak {} day(s), best streak {} day(s)",
        stats.total_habits, stats.total_completions, stats.average_streak, stats.longest_streak
    );

    Ok(StatsResponse {
        date: ctx.today,
        stats,
        today_progress,
        habits: breakdown,
        message,
    })
}
