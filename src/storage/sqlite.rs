/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving users, habits and completion records. It handles all SQL
/// queries and data conversion.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{
    CompletionLog, CompletionRecord, Frequency, Habit, HabitId, User, UserId,
};
use crate::storage::{migrations, HabitStorage, StorageError};

const HABIT_COLUMNS: &str = "id, user_id, name, description, frequency, goal, color, \
                             created_at, current_streak, longest_streak";

const USER_COLUMNS: &str = "id, name, email, email_reminders, created_at";

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the HabitStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::with_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Open a private in-memory database (handy for tests and dry runs)
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open in-memory database: {}", e)))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        // Completions are deleted through ON DELETE CASCADE
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn })
    }

    /// Load the completion log of one habit
    fn load_completions(&self, habit_id: &str) -> Result<CompletionLog, StorageError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT day, completed FROM habit_completions WHERE habit_id = ?1 ORDER BY day",
        )?;
        let records = stmt
            .query_map(params![habit_id], |row| {
                Ok(CompletionRecord {
                    date: row.get::<_, NaiveDate>(0)?,
                    completed: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompletionLog::from_records(records))
    }

    /// Run a habit query and attach each habit's completions
    fn query_habits(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Habit>, StorageError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, habit_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|row| {
                let completions = self.load_completions(&row.id.to_string())?;
                Ok(row.into_habit(completions))
            })
            .collect()
    }

    fn write_completions(
        tx: &rusqlite::Transaction<'_>,
        habit: &Habit,
    ) -> Result<(), StorageError> {
        let habit_id = habit.id.to_string();
        tx.execute(
            "DELETE FROM habit_completions WHERE habit_id = ?1",
            params![habit_id],
        )?;

        let mut insert = tx.prepare_cached(
            "INSERT INTO habit_completions (habit_id, day, completed) VALUES (?1, ?2, ?3)",
        )?;
        for record in habit.completions().records() {
            insert.execute(params![habit_id, record.date, record.completed])?;
        }

        Ok(())
    }
}

/// Habit columns before the completions are attached
struct HabitRow {
    id: HabitId,
    user_id: UserId,
    name: String,
    description: Option<String>,
    frequency: Frequency,
    goal: u32,
    color: String,
    created_at: DateTime<Utc>,
    current_streak: u32,
    longest_streak: u32,
}

impl HabitRow {
    fn into_habit(self, completions: CompletionLog) -> Habit {
        Habit::from_existing(
            self.id,
            self.user_id,
            self.name,
            self.description,
            self.frequency,
            self.goal,
            self.color,
            self.created_at,
            completions,
            self.current_streak,
            self.longest_streak,
        )
    }
}

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn parse_timestamp(idx: usize, text: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn habit_row(row: &Row<'_>) -> rusqlite::Result<HabitRow> {
    let id_str: String = row.get(0)?;
    let user_id_str: String = row.get(1)?;
    let frequency_str: String = row.get(4)?;
    let created_at_str: String = row.get(7)?;

    Ok(HabitRow {
        id: HabitId::from_string(&id_str).map_err(|e| conversion_error(0, e))?,
        user_id: UserId::from_string(&user_id_str).map_err(|e| conversion_error(1, e))?,
        name: row.get(2)?,
        description: row.get(3)?,
        frequency: frequency_str.parse().map_err(|e| conversion_error(4, e))?,
        goal: row.get(5)?,
        color: row.get(6)?,
        created_at: parse_timestamp(7, &created_at_str)?,
        current_streak: row.get(8)?,
        longest_streak: row.get(9)?,
    })
}

fn user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let id_str: String = row.get(0)?;
    let created_at_str: String = row.get(4)?;

    Ok(User {
        id: UserId::from_string(&id_str).map_err(|e| conversion_error(0, e))?,
        name: row.get(1)?,
        email: row.get(2)?,
        email_reminders: row.get(3)?,
        created_at: parse_timestamp(4, &created_at_str)?,
    })
}

impl HabitStorage for SqliteStorage {
    fn create_user(&self, user: &User) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO users (id, name, email, email_reminders, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.id.to_string(),
                user.name,
                user.email,
                user.email_reminders,
                user.created_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!("Created user: {} ({})", user.name, user.id);
        Ok(())
    }

    fn get_user(&self, user_id: &UserId) -> Result<User, StorageError> {
        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
        self.conn
            .query_row(&sql, params![user_id.to_string()], user_row)
            .optional()?
            .ok_or_else(|| StorageError::UserNotFound {
                user_id: user_id.to_string(),
            })
    }

    fn find_user_by_name(&self, name: &str) -> Result<Option<User>, StorageError> {
        let sql = format!("SELECT {} FROM users WHERE name = ?1", USER_COLUMNS);
        Ok(self.conn.query_row(&sql, params![name], user_row).optional()?)
    }

    fn update_user(&self, user: &User) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE users SET name = ?2, email = ?3, email_reminders = ?4 WHERE id = ?1",
            params![user.id.to_string(), user.name, user.email, user.email_reminders],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::UserNotFound {
                user_id: user.id.to_string(),
            });
        }

        tracing::debug!("Updated user: {} ({})", user.name, user.id);
        Ok(())
    }

    fn list_users_with_reminders(&self) -> Result<Vec<User>, StorageError> {
        let sql = format!(
            "SELECT {} FROM users WHERE email_reminders = 1 ORDER BY created_at",
            USER_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let users = stmt
            .query_map([], user_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO habits (
                id, user_id, name, description, frequency, goal, color,
                created_at, current_streak, longest_streak
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                habit.id.to_string(),
                habit.user_id.to_string(),
                habit.name,
                habit.description,
                habit.frequency.as_str(),
                habit.goal,
                habit.color,
                habit.created_at.to_rfc3339(),
                habit.current_streak(),
                habit.longest_streak(),
            ],
        )?;
        Self::write_completions(&tx, habit)?;
        tx.commit()?;

        tracing::debug!("Created habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn get_habit(&self, user_id: &UserId, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let sql = format!("SELECT {} FROM habits WHERE id = ?1 AND user_id = ?2", HABIT_COLUMNS);
        let row = self
            .conn
            .query_row(&sql, params![habit_id.to_string(), user_id.to_string()], habit_row)
            .optional()?
            .ok_or_else(|| StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            })?;

        let completions = self.load_completions(&habit_id.to_string())?;
        Ok(row.into_habit(completions))
    }

    fn list_habits(&self, user_id: &UserId) -> Result<Vec<Habit>, StorageError> {
        let sql = format!(
            "SELECT {} FROM habits WHERE user_id = ?1 ORDER BY created_at DESC",
            HABIT_COLUMNS
        );
        self.query_habits(&sql, params![user_id.to_string()])
    }

    fn list_habits_by_frequency(
        &self,
        user_id: &UserId,
        frequency: Frequency,
    ) -> Result<Vec<Habit>, StorageError> {
        let sql = format!(
            "SELECT {} FROM habits WHERE user_id = ?1 AND frequency = ?2 ORDER BY created_at DESC",
            HABIT_COLUMNS
        );
        self.query_habits(&sql, params![user_id.to_string(), frequency.as_str()])
    }

    fn replace_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        let rows_affected = tx.execute(
            "UPDATE habits SET
                name = ?3,
                description = ?4,
                frequency = ?5,
                goal = ?6,
                color = ?7,
                current_streak = ?8,
                longest_streak = ?9
             WHERE id = ?1 AND user_id = ?2",
            params![
                habit.id.to_string(),
                habit.user_id.to_string(),
                habit.name,
                habit.description,
                habit.frequency.as_str(),
                habit.goal,
                habit.color,
                habit.current_streak(),
                habit.longest_streak(),
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit.id.to_string(),
            });
        }

        Self::write_completions(&tx, habit)?;
        tx.commit()?;

        tracing::debug!(
            "Replaced habit: {} ({}) streak {}/{}",
            habit.name,
            habit.id,
            habit.current_streak(),
            habit.longest_streak()
        );
        Ok(())
    }

    fn delete_habit(&self, user_id: &UserId, habit_id: &HabitId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "DELETE FROM habits WHERE id = ?1 AND user_id = ?2",
            params![habit_id.to_string(), user_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        tracing::debug!("Deleted habit: {}", habit_id);
        Ok(())
    }
}
