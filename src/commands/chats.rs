//! Chat management commands
//!
//! One-shot listing, creation, and deletion of chats.

use crate::api::ChatService;
use crate::commands::{connect, open_session, render};
use crate::config::Config;
use crate::error::Result;
use crate::session::Navigation;
use colored::Colorize;

/// List chats in backend order
pub async fn list_chats(config: &Config, json: bool) -> Result<()> {
    let service = connect(config)?;
    let chats = service.list_chats().await?;
    tracing::info!("Listed {} chats", chats.len());

    if json {
        return render::print_json(&chats);
    }
    if chats.is_empty() {
        println!("No chats yet. Create one with `chatshell chats new`.");
        return Ok(());
    }
    render::chats_table(&chats, None).printstd();
    Ok(())
}

/// Create a chat with the configured title
pub async fn new_chat(config: &Config) -> Result<()> {
    let session = open_session(config).await?;
    let created = session.create_new_chat().await?;
    println!(
        "{} {} ({})",
        "Created".green(),
        created.chat_id.bold(),
        created.title
    );
    Ok(())
}

/// Delete a chat
pub async fn delete_chat(config: &Config, chat_id: &str) -> Result<()> {
    let session = open_session(config).await?;
    match session.delete_chat(chat_id).await {
        Ok(Navigation::Select(next)) => {
            println!("{} {}; now on {}", "Deleted".green(), chat_id, next);
            Ok(())
        }
        Ok(_) => {
            println!("{} {}", "Deleted".green(), chat_id);
            Ok(())
        }
        Err(e) => {
            eprintln!(
                "{}",
                format!("Failed to delete chat {}. Please try again.", chat_id).red()
            );
            Err(e)
        }
    }
}
