/// Basic integration tests
use habit_streak_mcp::tools::{self, CreateHabitParams, ToggleParams, UpdateUserParams};
use habit_streak_mcp::*;
use tempfile::NamedTempFile;

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    #[test]
    fn test_database_persistence() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();

        let server = HabitTrackerServer::new(db_path.clone(), TrackerConfig::default())
            .expect("Failed to create first server");
        let ctx = server.context();
        let created = tools::create_habit(server.storage(), &ctx, CreateHabitParams::named("Meditate"))
            .expect("Failed to create habit");
        tools::complete_habit(
            server.storage(),
            &ctx,
            ToggleParams {
                habit_id: created.habit_id.clone(),
                date: None,
            },
        )
        .expect("Failed to complete habit");
        let user_id = server.user().id.clone();
        drop(server);

        // Same database, same user name: the user and their habit come back
        let server2 = HabitTrackerServer::new(db_path, TrackerConfig::default())
            .expect("Failed to create second server");
        assert_eq!(server2.user().id, user_id);

        let habits = server2.storage().list_habits(&user_id).unwrap();
        assert_eq!(habits.len(), 1);
        assert_eq!(habits[0].id.to_string(), created.habit_id);
        assert_eq!(habits[0].current_streak(), 1);
        assert_eq!(habits[0].completions().completed_count(), 1);
    }

    #[test]
    fn test_users_are_isolated() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();

        let alice = HabitTrackerServer::new(
            db_path.clone(),
            TrackerConfig {
                user_name: "alice".to_string(),
                ..TrackerConfig::default()
            },
        )
        .unwrap();
        let created = tools::create_habit(alice.storage(), &alice.context(), CreateHabitParams::named("Piano")).unwrap();

        let bob = HabitTrackerServer::new(
            db_path,
            TrackerConfig {
                user_name: "bob".to_string(),
                ..TrackerConfig::default()
            },
        )
        .unwrap();
        let result = tools::complete_habit(
            bob.storage(),
            &bob.context(),
            ToggleParams {
                habit_id: created.habit_id,
                date: None,
            },
        );
        assert!(matches!(result, Err(ToolError::NotFound { .. })));
        assert!(bob.storage().list_habits(&bob.user().id).unwrap().is_empty());
    }

    #[test]
    fn test_reminder_selection() {
        let server = HabitTrackerServer::in_memory(TrackerConfig::default()).unwrap();
        let ctx = server.context();
        assert!(server.reminders().unwrap().is_empty());

        tools::update_user(
            server.storage(),
            &ctx,
            UpdateUserParams {
                email: Some("me@example.com".to_string()),
                email_reminders: Some(true),
            },
        )
        .unwrap();
        // Opted in but nothing daily to remind about yet
        assert!(server.reminders().unwrap().is_empty());

        tools::create_habit(server.storage(), &ctx, CreateHabitParams::named("Stretch")).unwrap();
        let batches = server.reminders().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].habit_names, vec!["Stretch".to_string()]);
    }

    #[test]
    fn test_storage_interface() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path()).expect("Failed to create storage");

        let _: &dyn HabitStorage = &storage;
    }
}
