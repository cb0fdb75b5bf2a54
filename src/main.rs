/// Main entry point for the Habit Streak MCP server
///
/// This file sets up logging, parses command line arguments, and either starts
/// the MCP server or prints today's reminder recipients. The server listens for
/// JSON-RPC requests over stdin/stdout following the MCP protocol.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use habit_streak_mcp::config::{parse_utc_offset, DEFAULT_USER};
use habit_streak_mcp::{HabitTrackerServer, TrackerConfig};

/// Get the default database path with robust fallback strategy
fn get_default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let potential_paths = [
        dirs::home_dir().map(|p| p.join(".habit_tracker")),
        dirs::data_dir().map(|p| p.join("habit_tracker")),
        dirs::config_dir().map(|p| p.join("habit_tracker")),
        std::env::current_dir().ok().map(|p| p.join(".habit_tracker")),
    ];

    for potential_path in potential_paths.iter().flatten() {
        if std::fs::create_dir_all(potential_path).is_ok() {
            // Only accept directories we can actually write to
            let test_file = potential_path.join(".test_write");
            if std::fs::write(&test_file, "test").is_ok() {
                let _ = std::fs::remove_file(&test_file);
                return Ok(potential_path.join("habits.db"));
            }
        }
    }

    let temp_path = std::env::temp_dir().join("habit_tracker");
    std::fs::create_dir_all(&temp_path)?;

    tracing::warn!("Using temporary directory for database: {}", temp_path.display());
    Ok(temp_path.join("habits.db"))
}

/// Command line arguments for the Habit Streak MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long, env = "HABIT_TRACKER_DB", global = true)]
    database: Option<PathBuf>,

    /// UTC offset that defines calendar days, e.g. Z, +02:00 or -0530
    #[arg(long, env = "HABIT_TRACKER_UTC_OFFSET", default_value = "Z", value_parser = parse_utc_offset, global = true)]
    utc_offset: chrono::FixedOffset,

    /// Name of the user whose habits this server manages
    #[arg(long, env = "HABIT_TRACKER_USER", default_value = DEFAULT_USER, global = true)]
    user: String,

    /// Recompute streaks when listing habits but do not save the results
    #[arg(long, global = true)]
    no_recompute_on_read: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Serve MCP over stdin/stdout (the default)
    Serve,
    /// Print today's reminder recipients as JSON and exit
    Reminders,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    // RUST_LOG wins over the flags when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("habit_streak_mcp={}", log_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr) // Send logs to stderr, not stdout
        .init();

    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => get_default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let config = TrackerConfig {
        reference_offset: args.utc_offset,
        recompute_on_read: !args.no_recompute_on_read,
        user_name: args.user,
    };
    let server = HabitTrackerServer::new(db_path, config)?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("Starting Habit Streak MCP server");
            server.run().await?;
            info!("Habit Streak MCP server shutdown complete");
        }
        Command::Reminders => {
            let batches = server.reminders()?;
            println!("{}", serde_json::to_string_pretty(&batches)?);
        }
    }

    Ok(())
}
