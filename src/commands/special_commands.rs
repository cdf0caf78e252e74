//! Special commands parser for the interactive shell
//!
//! Lines starting with `/` are shell commands; anything else is sent to the
//! selected chat as a message. Command names are case-insensitive, their
//! arguments are not.

use crate::api::ModelSelection;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// What a line of shell input asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Show the chat list
    ListChats,
    /// Select a chat by id or by 1-based position in the list
    Select(String),
    /// Create a chat and switch to it
    NewChat,
    /// Delete the given chat, or the selected one
    DeleteChat(Option<String>),
    /// Delete a message of the selected chat
    DeleteMessage(String),
    /// Print the selected chat's messages again
    ShowMessages,
    /// Switch the active model
    SwitchModel(ModelSelection),
    /// Show the models the backend listed
    ListModels,
    /// Re-fetch chats and messages
    Refresh,
    /// Show selection, model, and counts
    ShowStatus,
    Help,
    Exit,
    /// Plain text to send to the selected chat
    Send(String),
    /// Blank line
    None,
}

fn required_arg(command: &str, arg: &str, usage: &str) -> Result<String, CommandError> {
    if arg.is_empty() {
        Err(CommandError::MissingArgument {
            command: command.to_string(),
            usage: usage.to_string(),
        })
    } else {
        Ok(arg.to_string())
    }
}

/// Parse one line of shell input
///
/// # Examples
///
/// ```
/// use chatshell::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/new").unwrap(), SpecialCommand::NewChat);
/// assert_eq!(
///     parse_special_command("hello").unwrap(),
///     SpecialCommand::Send("hello".to_string())
/// );
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(SpecialCommand::None);
    }

    let lower = trimmed.to_lowercase();
    if !trimmed.starts_with('/') {
        if lower == "exit" || lower == "quit" {
            return Ok(SpecialCommand::Exit);
        }
        return Ok(SpecialCommand::Send(trimmed.to_string()));
    }

    let (name, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((name, arg)) => (name.to_lowercase(), arg.trim()),
        None => (lower, ""),
    };

    match name.as_str() {
        "/chats" | "/ls" => Ok(SpecialCommand::ListChats),
        "/select" | "/open" => {
            required_arg("/select", arg, "/select <chat_id|number>").map(SpecialCommand::Select)
        }
        "/new" => Ok(SpecialCommand::NewChat),
        "/delete-chat" => Ok(SpecialCommand::DeleteChat(
            (!arg.is_empty()).then(|| arg.to_string()),
        )),
        "/delete" | "/rm" => {
            required_arg("/delete", arg, "/delete <msg_id>").map(SpecialCommand::DeleteMessage)
        }
        "/messages" | "/show" => Ok(SpecialCommand::ShowMessages),
        "/model" => {
            let raw = required_arg("/model", arg, "/model <provider>/<name>")?;
            ModelSelection::parse(&raw)
                .map(SpecialCommand::SwitchModel)
                .ok_or(CommandError::UnsupportedArgument {
                    command: "/model".to_string(),
                    arg: raw,
                })
        }
        "/models" => Ok(SpecialCommand::ListModels),
        "/refresh" => Ok(SpecialCommand::Refresh),
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" => Ok(SpecialCommand::Exit),
        _ => Err(CommandError::UnknownCommand(name)),
    }
}

/// Print help for the shell's special commands
pub fn print_help() {
    println!(
        r#"
Shell Commands
==============

CHATS:
  /chats                  - List chats (numbered)
  /select <id|number>     - Switch to a chat
  /new                    - Create a chat and switch to it
  /delete-chat [id]       - Delete a chat (default: the selected one)
  /refresh                - Reload chats and messages

MESSAGES:
  <text>                  - Send to the selected chat
  /messages               - Show the selected chat again
  /delete <msg_id>        - Delete a message

MODELS:
  /models                 - List available models
  /model <provider>/<name> - Switch the model for new messages

OTHER:
  /status                 - Show current chat and model
  /help                   - Show this help
  /exit                   - Leave the shell

A failed send keeps your text in history: press Up to retry.
"#
    );
}
