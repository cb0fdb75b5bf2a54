/// Tools for changing and removing existing habits
///
/// This module implements the habit_update and habit_delete MCP tools.
/// Updates never touch the completion log or streaks; deleting a habit
/// removes its completions with it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Frequency, Habit, HabitChanges};
use crate::storage::HabitStorage;
use crate::tools::{parse_habit_id, ToolContext, ToolError};

/// Parameters for updating an existing habit
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateHabitParams {
    /// ID of the habit
    pub habit_id: String,
    /// New name
    pub name: Option<String>,
    /// New description; an empty string clears it
    pub description: Option<String>,
    /// New frequency: daily, weekly or custom
    pub frequency: Option<String>,
    /// New target count per period, at least 1
    pub goal: Option<u32>,
    /// New display color tag
    pub color: Option<String>,
}

/// Response from updating a habit
#[derive(Debug, Serialize)]
pub struct UpdateHabitResponse {
    pub success: bool,
    pub habit: Habit,
    pub message: String,
}

/// Parameters for deleting a habit
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteHabitParams {
    /// ID of the habit
    pub habit_id: String,
}

/// Response from deleting a habit
#[derive(Debug, Serialize)]
pub struct DeleteHabitResponse {
    pub success: bool,
    pub habit_id: String,
    pub message: String,
}

/// Update an existing habit's settings
pub fn update_habit<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    params: UpdateHabitParams,
) -> Result<UpdateHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;

    let frequency = params
        .frequency
        .as_deref()
        .map(str::parse::<Frequency>)
        .transpose()?;
    let color = match params.color.map(|c| c.trim().to_string()) {
        Some(color) if color.is_empty() => {
            return Err(DomainError::Validation {
                message: "Color cannot be empty".to_string(),
            }
            .into())
        }
        other => other,
    };

    let changes = HabitChanges {
        name: params.name,
        description: params.description.map(Some),
        frequency,
        goal: params.goal,
        color,
    };
    if changes.is_empty() {
        return Err(DomainError::Validation {
            message: "Nothing to update: provide at least one field".to_string(),
        }
        .into());
    }

    let mut habit = storage.get_habit(&ctx.user_id, &habit_id)?;
    habit.update(changes)?;
    storage.replace_habit(&habit)?;

    tracing::info!("Updated habit '{}' ({})", habit.name, habit.id);

    Ok(UpdateHabitResponse {
        success: true,
        message: format!("✅ Updated habit '{}'", habit.name),
        habit,
    })
}

/// Delete a habit and all of its completions
pub fn delete_habit<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    params: DeleteHabitParams,
) -> Result<DeleteHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let habit = storage.get_habit(&ctx.user_id, &habit_id)?;
    storage.delete_habit(&ctx.user_id, &habit_id)?;

    tracing::info!("Deleted habit '{}' ({})", habit.name, habit_id);

    Ok(DeleteHabitResponse {
        success: true,
        habit_id: habit_id.to_string(),
        message: format!("🗑️ Deleted habit '{}'", habit.name),
    })
}
