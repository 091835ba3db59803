use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use todostore::cli::{Cli, Command};
use todostore::config::Config;
use todostore::{StatusFilter, TodoStore, ms_to_rfc3339};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let db_path = cli.db_path.unwrap_or(config.db_path);

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }

    info!("todostore starting");

    let store = TodoStore::open(&db_path).context("Failed to open store")?;
    store.create_tables().context("Failed to create tables")?;

    match cli.command {
        Command::Init => {
            println!("{} Initialized database: {}", "✓".green(), db_path.display());
        }
        Command::Add {
            user_id,
            title,
            description,
        } => {
            let task = store.create_task(&user_id, &title, description.as_deref())?;
            println!("{} Added task #{}: {}", "✓".green(), task.id, task.title.cyan());
        }
        Command::List { user_id, status } => {
            let tasks = store.list_tasks(&user_id, StatusFilter::parse(&status))?;
            if tasks.is_empty() {
                println!("No tasks found");
            } else {
                for task in tasks {
                    let marker = if task.completed { "[x]".green() } else { "[ ]".normal() };
                    println!(
                        "{} #{} {} {}",
                        marker,
                        task.id,
                        task.title,
                        ms_to_rfc3339(task.created_at).dimmed()
                    );
                }
            }
        }
        Command::Complete { user_id, task_id } => {
            let task = store.complete_task(&user_id, task_id)?;
            println!("{} Completed task #{}: {}", "✓".green(), task.id, task.title);
        }
        Command::Delete { user_id, task_id } => {
            let task = store.delete_task(&user_id, task_id)?;
            println!("{} Deleted task #{}: {}", "✓".green(), task.id, task.title);
        }
        Command::Conversations { user_id } => {
            let conversations = store.list_conversations(&user_id)?;
            if conversations.is_empty() {
                println!("No conversations found");
            } else {
                for conversation in conversations {
                    println!(
                        "#{} updated {}",
                        conversation.id,
                        ms_to_rfc3339(conversation.updated_at).dimmed()
                    );
                }
            }
        }
        Command::Messages {
            user_id,
            conversation_id,
        } => {
            let messages = store.get_messages_by_conversation(&user_id, conversation_id)?;
            if messages.is_empty() {
                println!("No messages found");
            } else {
                for message in messages {
                    println!("{}: {}", message.role.to_string().yellow(), message.content);
                }
            }
        }
    }

    Ok(())
}
