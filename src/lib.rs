/// Public library interface for the Habit Streak MCP server
///
/// This module exports the server and the public types used by the binary
/// and by tests: the habit domain with its streak rules, storage, analytics
/// and the MCP tools built on top of them.

use std::path::PathBuf;
use thiserror::Error;

pub mod analytics;
pub mod config;
pub mod domain;
pub mod mcp;
pub mod storage;
pub mod tools;

pub use analytics::{PortfolioStats, StatsAggregator};
pub use config::TrackerConfig;
pub use domain::{CompletionLog, DomainError, Frequency, Habit, HabitId, StreakCalculator, User, UserId};
pub use storage::{HabitStorage, SqliteStorage, StorageError};
pub use tools::{ReminderBatch, ToolContext, ToolError};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] StorageError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Habit tracker server acting for a single local user
///
/// The configured user is looked up by name when the server starts and
/// created if it does not exist yet.
pub struct HabitTrackerServer {
    storage: SqliteStorage,
    config: TrackerConfig,
    user: User,
}

impl HabitTrackerServer {
    /// Open (or create) the database at `db_path` and resolve the user
    pub fn new(db_path: PathBuf, config: TrackerConfig) -> Result<Self, ServerError> {
        tracing::info!("Initializing Habit Streak server with database: {:?}", db_path);
        let storage = SqliteStorage::new(db_path)?;
        Self::with_storage(storage, config)
    }

    /// Server backed by a throwaway in-memory database
    pub fn in_memory(config: TrackerConfig) -> Result<Self, ServerError> {
        Self::with_storage(SqliteStorage::open_in_memory()?, config)
    }

    fn with_storage(storage: SqliteStorage, config: TrackerConfig) -> Result<Self, ServerError> {
        let user = tools::ensure_user(&storage, &config.user_name)?;
        tracing::info!(
            "Acting for user '{}' with reference offset {}",
            user.name,
            config.reference_offset
        );

        Ok(Self { storage, config, user })
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// Returns when stdin is closed.
    pub async fn run(self) -> Result<(), ServerError> {
        let habits = self.storage.list_habits(&self.user.id)?;
        tracing::info!("Server started successfully, found {} existing habits", habits.len());

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Who should get today's reminder
    pub fn reminders(&self) -> Result<Vec<ReminderBatch>, ServerError> {
        Ok(tools::reminder_recipients(&self.storage)?)
    }

    /// Tool context for a call made now
    pub fn context(&self) -> ToolContext {
        ToolContext::new(self.user.id.clone(), &self.config)
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    pub fn user(&self) -> &User {
        &self.user
    }
}
