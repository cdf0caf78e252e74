//! Command-line interface definition for ChatShell
//!
//! This module defines the CLI structure using clap's derive API,
//! providing one-shot commands for chats, messages, and models plus the
//! interactive shell.

use clap::{Parser, Subcommand};

/// ChatShell - terminal client for a remote chat API
///
/// Lists conversations, shows and sends messages, and switches models
/// against a REST/JSON chat backend.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatshell")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "CHATSHELL_CONFIG", default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the API base URL from config
    #[arg(long)]
    pub api_base: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for ChatShell
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the interactive shell
    Shell,

    /// Manage chats
    Chats {
        #[command(subcommand)]
        command: ChatCommand,
    },

    /// Read, send, and delete messages
    Messages {
        #[command(subcommand)]
        command: MessageCommand,
    },

    /// Inspect available models
    Models {
        #[command(subcommand)]
        command: ModelCommand,
    },
}

/// Chat management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ChatCommand {
    /// List chats in backend order
    List {
        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Create a new chat
    New,

    /// Delete a chat
    Delete {
        /// Chat identifier
        chat_id: String,
    },
}

/// Message subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum MessageCommand {
    /// Show the messages of a chat
    List {
        /// Chat identifier
        chat_id: String,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Send a message to a chat and print the reply
    Send {
        /// Chat identifier
        chat_id: String,

        /// Message content
        content: String,

        /// Model as provider/name (defaults to the first listed model)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Delete a message
    Delete {
        /// Message identifier
        msg_id: String,
    },
}

/// Model subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ModelCommand {
    /// List models the backend can route to
    List {
        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
