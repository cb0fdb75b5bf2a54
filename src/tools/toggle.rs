/// Tools for completing and uncompleting a habit on a day
///
/// This module implements the habit_complete and habit_uncomplete MCP tools.
/// Both reject days after today and leave the habit untouched when they do.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::DayClass;
use crate::storage::HabitStorage;
use crate::tools::{parse_habit_id, ToolContext, ToolError};

/// Parameters for toggling a completion
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ToggleParams {
    /// ID of the habit
    pub habit_id: String,
    /// Day to toggle: YYYY-MM-DD or an RFC 3339 timestamp (defaults to today)
    pub date: Option<String>,
}

/// Response from a toggle
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub success: bool,
    pub habit_id: String,
    pub date: NaiveDate,
    pub completed: bool,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub message: String,
}

/// Mark a habit as completed on a day
pub fn complete_habit<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    params: ToggleParams,
) -> Result<ToggleResponse, ToolError> {
    toggle(storage, ctx, params, true)
}

/// Remove a habit's completion for a day
pub fn uncomplete_habit<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    params: ToggleParams,
) -> Result<ToggleResponse, ToolError> {
    toggle(storage, ctx, params, false)
}

fn toggle<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    params: ToggleParams,
    completed: bool,
) -> Result<ToggleResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let day = ctx.day_or_today(params.date.as_deref())?;
    let calculator = ctx.calculator();

    let habit = storage.get_habit(&ctx.user_id, &habit_id)?;

    if calculator.classify(day) == DayClass::Future {
        tracing::warn!("Rejected toggle of habit {} on future day {}", habit_id, day);
        return Err(ToolError::PolicyViolation {
            message: format!("Cannot change completions for {} because it is after today ({})", day, ctx.today),
        });
    }

    let next = habit.with_completion(day, completed, &calculator);
    storage.replace_habit(&next)?;

    tracing::info!(
        "{} habit {} on {}: streak {} (best {})",
        if completed { "Completed" } else { "Uncompleted" },
        habit_id,
        day,
        next.current_streak(),
        next.longest_streak()
    );

    let streak = next.current_streak();
    let message = if completed {
        format!(
            "🔥 Marked '{}' done for {}! Current streak: {} day{}",
            next.name,
            day,
            streak,
            if streak == 1 { "" } else { "s" }
        )
    } else {
        format!(
            "↩️ Cleared '{}' for {}. Current streak: {} day{}",
            next.name,
            day,
            streak,
            if streak == 1 { "" } else { "s" }
        )
    };

    Ok(ToggleResponse {
        success: true,
        habit_id: next.id.to_string(),
        date: day,
        completed,
        current_streak: streak,
        longest_streak: next.longest_streak(),
        message,
    })
}
