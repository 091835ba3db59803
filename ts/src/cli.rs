//! CLI argument parsing for todostore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "todostore")]
#[command(author, version, about = "SQLite-backed todo store", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the database file (overrides config)
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database tables
    Init,

    /// Add a task
    Add {
        /// Owning user ID
        #[arg(required = true)]
        user_id: String,

        /// Task title
        #[arg(required = true)]
        title: String,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List a user's tasks
    List {
        /// Owning user ID
        #[arg(required = true)]
        user_id: String,

        /// Status filter: all, completed, or pending
        #[arg(short, long, default_value = "all")]
        status: String,
    },

    /// Mark a task as completed
    Complete {
        /// Owning user ID
        #[arg(required = true)]
        user_id: String,

        /// Task ID
        #[arg(required = true)]
        task_id: i64,
    },

    /// Delete a task
    Delete {
        /// Owning user ID
        #[arg(required = true)]
        user_id: String,

        /// Task ID
        #[arg(required = true)]
        task_id: i64,
    },

    /// List a user's conversations
    Conversations {
        /// Owning user ID
        #[arg(required = true)]
        user_id: String,
    },

    /// Show the messages in a conversation
    Messages {
        /// Owning user ID
        #[arg(required = true)]
        user_id: String,

        /// Conversation ID
        #[arg(required = true)]
        conversation_id: i64,
    },
}
