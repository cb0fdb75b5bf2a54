/// The owner of a habit collection
///
/// Users carry no credentials here; they exist so habits can be scoped to an
/// owner and so the reminder selection knows who opted in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Option<String>,
    /// Whether the user wants the daily reminder
    pub email_reminders: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a user with reminders switched off
    pub fn new(name: String, email: Option<String>) -> Result<Self, DomainError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::Validation {
                message: "User name cannot be empty".to_string(),
            });
        }

        Ok(Self {
            id: UserId::new(),
            name,
            email: email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()),
            email_reminders: false,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new(" Ada ".to_string(), Some("  ".to_string())).unwrap();
        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, None);
        assert!(!user.email_reminders);
    }

    #[test]
    fn test_blank_user_name_rejected() {
        assert!(User::new(String::new(), None).is_err());
    }
}
