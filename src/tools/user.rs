/// Tools for the owner of the habits
///
/// This module implements the user_update MCP tool and the start-up lookup
/// that resolves the configured user name to a stored user.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, User};
use crate::storage::HabitStorage;
use crate::tools::{ToolContext, ToolError};

/// Parameters for updating the user's reminder preferences
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateUserParams {
    /// Email address for reminders; an empty string removes it
    pub email: Option<String>,
    /// Whether to receive the daily reminder
    pub email_reminders: Option<bool>,
}

/// Response from updating the user
#[derive(Debug, Serialize)]
pub struct UpdateUserResponse {
    pub success: bool,
    pub user: User,
    pub message: String,
}

/// Find the user called `name`, creating them on first use
pub fn ensure_user<S: HabitStorage>(storage: &S, name: &str) -> Result<User, ToolError> {
    if let Some(user) = storage.find_user_by_name(name.trim())? {
        tracing::debug!("Using existing user '{}' ({})", user.name, user.id);
        return Ok(user);
    }

    let user = User::new(name.to_string(), None)?;
    storage.create_user(&user)?;
    tracing::info!("Created user '{}' ({})", user.name, user.id);
    Ok(user)
}

/// Change the calling user's email and reminder preference
pub fn update_user<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    params: UpdateUserParams,
) -> Result<UpdateUserResponse, ToolError> {
    if params.email.is_none() && params.email_reminders.is_none() {
        return Err(DomainError::Validation {
            message: "Nothing to update: provide email or email_reminders".to_string(),
        }
        .into());
    }

    let mut user = storage.get_user(&ctx.user_id)?;
    if let Some(email) = params.email {
        let email = email.trim().to_string();
        if !email.is_empty() && !email.contains('@') {
            return Err(DomainError::Validation {
                message: format!("'{}' is not an email address", email),
            }
            .into());
        }
        user.email = Some(email).filter(|e| !e.is_empty());
    }
    if let Some(reminders) = params.email_reminders {
        user.email_reminders = reminders;
    }
    if user.email_reminders && user.email.is_none() {
        return Err(DomainError::Validation {
            message: "Reminders need an email address".to_string(),
        }
        .into());
    }

    storage.update_user(&user)?;
    tracing::info!(
        "Updated user '{}': reminders {}",
        user.name,
        if user.email_reminders { "on" } else { "off" }
    );

    let message = if user.email_reminders {
        "🔔 Daily reminders are on".to_string()
    } else {
        "🔕 Daily reminders are off".to_string()
    };

    Ok(UpdateUserResponse {
        success: true,
        user,
        message,
    })
}
