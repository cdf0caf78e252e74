//! Message commands
//!
//! Show, send, and delete messages from the command line. Sends go through a
//! session so the reply is appended and a renamed chat is reported the same
//! way the shell does it.

use crate::api::{ChatService, ModelSelection};
use crate::commands::{connect, open_session, render};
use crate::config::Config;
use crate::error::{ChatShellError, Result};
use colored::Colorize;

/// Print the messages of a chat
pub async fn list_messages(config: &Config, chat_id: &str, json: bool) -> Result<()> {
    let service = connect(config)?;
    let messages = service.list_messages(chat_id).await?;

    if json {
        return render::print_json(&messages);
    }
    render::print_messages(&messages);
    Ok(())
}

/// Send a message and print the reply
///
/// `model` is `provider/name`; without it the first model the backend lists
/// is used.
pub async fn send_message(
    config: &Config,
    chat_id: &str,
    content: &str,
    model: Option<&str>,
) -> Result<()> {
    let session = open_session(config).await?;

    if let Some(raw) = model {
        let selection = ModelSelection::parse(raw).ok_or_else(|| {
            ChatShellError::Config(format!("Invalid model {}, expected provider/name", raw))
        })?;
        session.store().set_model(selection);
    }

    if !session.select_chat(chat_id).await {
        anyhow::bail!("Chat {} not found", chat_id);
    }

    let response = session.send_message(content).await?;
    println!("{}", render::format_message(&response.ai_message));

    if let Some(chat) = &response.updated_chat {
        println!("{} {}", "Chat renamed to".dimmed(), chat.title.bold());
    }
    Ok(())
}

/// Delete a message
pub async fn delete_message(config: &Config, msg_id: &str) -> Result<()> {
    let service = connect(config)?;
    match service.delete_message(msg_id).await {
        Ok(true) => {
            println!("{} {}", "Deleted".green(), msg_id);
            Ok(())
        }
        Ok(false) => {
            eprintln!("{}", "Failed to delete message. Please try again.".red());
            Err(ChatShellError::DeleteRejected(msg_id.to_string()).into())
        }
        Err(e) => {
            eprintln!("{}", "Failed to delete message. Please try again.".red());
            Err(e)
        }
    }
}
