/// Tool for creating new habits
///
/// This module implements the habit_create MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Frequency, Habit, NewHabit};
use crate::storage::HabitStorage;
use crate::tools::{ToolContext, ToolError};

/// Parameters for creating a new habit
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct CreateHabitParams {
    /// Name of the habit
    pub name: String,
    /// Optional longer description
    pub description: Option<String>,
    /// How often: daily, weekly or custom (defaults to daily)
    pub frequency: Option<String>,
    /// Target count per period, at least 1 (defaults to 1)
    pub goal: Option<u32>,
    /// Display color tag (defaults to #3B82F6)
    pub color: Option<String>,
}

impl CreateHabitParams {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub success: bool,
    pub habit_id: String,
    pub habit: Habit,
    pub message: String,
}

/// Create a new habit for the calling user
pub fn create_habit<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    params: CreateHabitParams,
) -> Result<CreateHabitResponse, ToolError> {
    let frequency = match params.frequency.as_deref() {
        Some(text) => text.parse::<Frequency>()?,
        None => Frequency::default(),
    };

    let habit = Habit::new(
        ctx.user_id.clone(),
        NewHabit {
            name: params.name,
            description: params.description,
            frequency,
            goal: params.goal.unwrap_or(1),
            color: params.color,
        },
    )?;

    storage.create_habit(&habit)?;
    tracing::info!("Created habit '{}' ({}) for user {}", habit.name, habit.id, ctx.user_id);

    Ok(CreateHabitResponse {
        success: true,
        habit_id: habit.id.to_string(),
        message: format!("✅ Created habit '{}'! Ready to start your streak!", habit.name),
        habit,
    })
}
