//! Interactive shell
//!
//! A readline loop over one [`Session`]: plain lines are sent to the selected
//! chat, `/` lines are shell commands. Each typed line goes into history
//! before it is sent, so a failed send can be retried with the Up key.

use crate::commands::open_session;
use crate::commands::render;
use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
use crate::config::Config;
use crate::error::{ChatShellError, Result};
use crate::session::{LoadOutcome, Session};

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Whether the loop keeps reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Start the interactive shell
pub async fn run_shell(config: Config) -> Result<()> {
    let session = open_session(&config).await?;
    let mut rl = DefaultEditor::new()?;

    print_welcome_banner(&session);

    loop {
        match rl.readline(&format_prompt(&session)) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if let Err(e) = rl.add_history_entry(trimmed) {
                    tracing::debug!("Failed to record history entry: {}", e);
                }

                let command = match parse_special_command(trimmed) {
                    Ok(command) => command,
                    Err(e) => {
                        eprintln!("{}", e.to_string().red());
                        continue;
                    }
                };

                if handle_command(&session, command).await == Flow::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}

fn format_prompt(session: &Session) -> String {
    let chat = session
        .store()
        .selected_chat()
        .map(|chat| chat.title)
        .unwrap_or_else(|| "no chat".to_string());
    format!(
        "[{} | {}] >> ",
        chat.cyan(),
        session.store().model().to_string().yellow()
    )
}

fn print_welcome_banner(session: &Session) {
    println!("{}", "ChatShell".bold());
    println!(
        "{} chats, model {}. Type /help for commands.\n",
        session.store().chats().len(),
        session.store().model()
    );
    render::print_messages(&session.loader().messages());
}

/// Resolve `/select` input: a 1-based position in the list, or a chat id
fn resolve_chat_ref(session: &Session, reference: &str) -> Option<String> {
    let chats = session.store().chats();
    if let Ok(position) = reference.parse::<usize>() {
        if let Some(chat) = position.checked_sub(1).and_then(|idx| chats.get(idx)) {
            return Some(chat.chat_id.clone());
        }
    }
    chats
        .into_iter()
        .find(|chat| chat.chat_id == reference)
        .map(|chat| chat.chat_id)
}

/// Print a notice for a failed message load; `true` if messages were loaded
fn report_load(outcome: Option<LoadOutcome>) -> bool {
    match outcome {
        Some(LoadOutcome::Failed(e)) => {
            tracing::debug!("Message load failed: {:#}", e);
            println!("{}", "Could not load messages; showing what we had.".dimmed());
            false
        }
        Some(outcome) => outcome.is_applied(),
        None => false,
    }
}

async fn handle_command(session: &Session, command: SpecialCommand) -> Flow {
    match command {
        SpecialCommand::None => {}
        SpecialCommand::Exit => return Flow::Exit,
        SpecialCommand::Help => print_help(),
        SpecialCommand::ListChats => {
            let chats = session.store().chats();
            if chats.is_empty() {
                println!("No chats yet. Use /new to start one.");
            } else {
                let selected = session.store().selected_chat_id();
                render::chats_table(&chats, selected.as_deref()).printstd();
            }
        }
        SpecialCommand::Select(reference) => match resolve_chat_ref(session, &reference) {
            Some(chat_id) => {
                session.select_chat(&chat_id).await;
                render::print_messages(&session.loader().messages());
            }
            None => eprintln!("{}", format!("No chat matches {}", reference).red()),
        },
        SpecialCommand::NewChat => match session.create_new_chat().await {
            Ok(chat) => println!("{} {}", "Created".green(), chat.chat_id.bold()),
            Err(e) => eprintln!("{}", format!("Could not create chat: {}", e).red()),
        },
        SpecialCommand::DeleteChat(target) => {
            let target = target.or_else(|| session.store().selected_chat_id());
            match target {
                Some(chat_id) => match session.delete_chat(&chat_id).await {
                    Ok(_) => {
                        println!("{} {}", "Deleted".green(), chat_id);
                        render::print_messages(&session.loader().messages());
                    }
                    Err(e) => eprintln!(
                        "{}",
                        format!("Failed to delete chat. Please try again. ({})", e).red()
                    ),
                },
                None => eprintln!("{}", ChatShellError::NoChatSelected.to_string().red()),
            }
        }
        SpecialCommand::DeleteMessage(msg_id) => match session.delete_message(&msg_id).await {
            Ok(()) => println!("{} {}", "Deleted".green(), msg_id),
            Err(e) => {
                tracing::debug!("Delete of {} failed: {:#}", msg_id, e);
                eprintln!("{}", "Failed to delete message. Please try again.".red());
            }
        },
        SpecialCommand::ShowMessages => {
            if session.loader().is_loading() {
                println!("{}", "Loading...".dimmed());
            }
            render::print_messages(&session.loader().messages());
        }
        SpecialCommand::SwitchModel(model) => {
            session.store().set_model(model.clone());
            println!("Model set to {}", model.to_string().yellow());
        }
        SpecialCommand::ListModels => {
            let models = session.store().available_models();
            if models.is_empty() {
                println!("No models listed by the server.");
            } else {
                let active = session.store().model();
                render::models_table(&models, Some(&active)).printstd();
            }
        }
        SpecialCommand::Refresh => {
            let (replaced, outcome) = session.refresh().await;
            if !replaced {
                println!("{}", "Could not refresh chats; showing what we had.".dimmed());
            }
            if report_load(outcome) {
                render::print_messages(&session.loader().messages());
            }
        }
        SpecialCommand::ShowStatus => {
            let store = session.store();
            let chat = store
                .selected_chat()
                .map(|chat| format!("{} ({})", chat.title, chat.chat_id))
                .unwrap_or_else(|| "none".to_string());
            println!("Chat:     {}", chat);
            println!("Model:    {}", store.model());
            println!("Chats:    {}", store.chats().len());
            println!("Messages: {}", session.loader().messages().len());
        }
        SpecialCommand::Send(content) => match session.send_message(&content).await {
            Ok(response) => {
                println!("{}", render::format_message(&response.ai_message));
                if let Some(chat) = &response.updated_chat {
                    println!("{} {}", "Chat renamed to".dimmed(), chat.title.bold());
                }
            }
            Err(e) => {
                let retry = e
                    .downcast_ref::<ChatShellError>()
                    .map(ChatShellError::is_retryable)
                    .unwrap_or(false);
                eprintln!("{}", format!("Send failed: {}", e).red());
                if retry {
                    eprintln!("{}", "Press Up to retry.".dimmed());
                }
            }
        },
    }
    Flow::Continue
}
