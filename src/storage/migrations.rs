/// Database migration management
///
/// Schema changes are listed in order in `MIGRATIONS`. Each one runs in its
/// own transaction together with the bump of the recorded schema version, so
/// a failed migration leaves the database at the previous version.

use rusqlite::{Connection, OptionalExtension};

use crate::storage::StorageError;

/// Ordered list of (version, SQL) pairs
const MIGRATIONS: &[(i32, &str)] = &[(1, SCHEMA_V1)];

/// Users, habits and their per-day completion records
const SCHEMA_V1: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        email TEXT,
        email_reminders BOOLEAN NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS habits (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        description TEXT,
        frequency TEXT NOT NULL CHECK (frequency IN ('daily', 'weekly', 'custom')),
        goal INTEGER NOT NULL DEFAULT 1 CHECK (goal >= 1),
        color TEXT NOT NULL,
        current_streak INTEGER NOT NULL DEFAULT 0,
        longest_streak INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    );

    -- At most one row per habit and calendar day
    CREATE TABLE IF NOT EXISTS habit_completions (
        habit_id TEXT NOT NULL REFERENCES habits (id) ON DELETE CASCADE,
        day TEXT NOT NULL,
        completed BOOLEAN NOT NULL DEFAULT 1,
        PRIMARY KEY (habit_id, day)
    );

    CREATE INDEX IF NOT EXISTS idx_habits_user_created ON habits (user_id, created_at);
    CREATE INDEX IF NOT EXISTS idx_habits_user_frequency ON habits (user_id, frequency);
    CREATE INDEX IF NOT EXISTS idx_users_email_reminders ON users (email_reminders);
";

fn latest_version() -> i32 {
    MIGRATIONS.last().map_or(0, |(version, _)| *version)
}

/// Bring the schema up to the latest version
///
/// Refuses to touch a database written by a newer build.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY)",
        [],
    )?;

    let current = schema_version(conn)?;
    let latest = latest_version();
    if current > latest {
        return Err(StorageError::Migration(format!(
            "database schema version {} is newer than supported version {}",
            current, latest
        )));
    }

    for (version, sql) in MIGRATIONS.iter().filter(|(version, _)| *version > current) {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)
            .map_err(|e| StorageError::Migration(format!("migration v{} failed: {}", version, e)))?;
        record_version(&tx, *version)?;
        tx.commit()?;

        tracing::info!("Applied schema migration v{}", version);
    }

    Ok(())
}

/// Recorded schema version; 0 for a fresh database
fn schema_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<i32>>(0)
        })
        .optional()?
        .flatten();
    Ok(version.unwrap_or(0))
}

fn record_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}
