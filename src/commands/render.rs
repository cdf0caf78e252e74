//! Terminal rendering of chats, messages, and models

use crate::api::{Chat, Message, ModelSelection, Role};
use crate::error::Result;
use colored::Colorize;
use prettytable::{cell, row, Table};

/// Chat list as a numbered table, marking the selected chat
pub fn chats_table(chats: &[Chat], selected: Option<&str>) -> Table {
    let mut table = Table::new();
    table.add_row(row!["#", "Chat ID", "Title", "Created"]);

    for (idx, chat) in chats.iter().enumerate() {
        let marker = if selected == Some(chat.chat_id.as_str()) {
            format!("*{}", idx + 1)
        } else {
            (idx + 1).to_string()
        };
        let created = chat
            .created_at
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        table.add_row(row![marker, chat.chat_id, chat.title, created]);
    }

    table
}

pub fn models_table(models: &[ModelSelection], active: Option<&ModelSelection>) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Provider", "Model", "Active"]);

    for model in models {
        let marker = if active == Some(model) { "yes" } else { "" };
        table.add_row(row![model.provider, model.name, marker]);
    }

    table
}

/// One message as printed in the shell
pub fn format_message(message: &Message) -> String {
    let header = match message.role {
        Role::User => format!("you [{}]", message.msg_id).cyan().bold(),
        Role::Assistant => format!("assistant [{}]", message.msg_id).green().bold(),
    };
    format!("{}\n{}\n", header, message.content)
}

pub fn print_messages(messages: &[Message]) {
    if messages.is_empty() {
        println!("{}", "No messages yet.".dimmed());
        return;
    }
    for message in messages {
        println!("{}", format_message(message));
    }
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
