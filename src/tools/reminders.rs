/// Daily reminder selection
///
/// Picks who should get today's reminder and which habits to name in it.
/// Formatting and delivery belong to whatever scheduler consumes this list.

use serde::Serialize;

use crate::domain::Frequency;
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// One reminder to send
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderBatch {
    pub user_id: String,
    pub user_name: String,
    pub email: Option<String>,
    pub habit_names: Vec<String>,
}

/// Users who opted into reminders and have at least one daily habit
pub fn reminder_recipients<S: HabitStorage>(storage: &S) -> Result<Vec<ReminderBatch>, ToolError> {
    let mut batches = Vec::new();

    for user in storage.list_users_with_reminders()? {
        let habits = storage.list_habits_by_frequency(&user.id, Frequency::Daily)?;
        if habits.is_empty() {
            tracing::debug!("Skipping reminder for '{}': no daily habits", user.name);
            continue;
        }

        batches.push(ReminderBatch {
            user_id: user.id.to_string(),
            user_name: user.name,
            email: user.email,
            habit_names: habits.into_iter().map(|habit| habit.name).collect(),
        });
    }

    tracing::info!("Selected {} reminder recipient(s)", batches.len());
    Ok(batches)
}
