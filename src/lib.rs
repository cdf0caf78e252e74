//! ChatShell - terminal client library for a remote chat API
//!
//! This library keeps a client-side view of a chat backend in sync: the chat
//! list, the selected chat, its messages, and the active model.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `api`: Wire types, the `ChatService` abstraction, and its HTTP client
//! - `session`: Session store, chat loader, and navigation rules
//! - `commands`: One-shot command handlers and the interactive shell
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use chatshell::api::HttpChatService;
//! use chatshell::{Config, Session};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let session = Session::new(Arc::new(HttpChatService::new(&config.api)?), &config.session);
//!     session.start().await;
//!     for chat in session.store().chats() {
//!         println!("{} {}", chat.chat_id, chat.title);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod session;

// Re-export commonly used types
pub use api::{Chat, ChatService, Message, ModelSelection, Role};
pub use config::Config;
pub use error::{ChatShellError, Result};
pub use session::{ChatLoader, LoadOutcome, Navigation, Session, SessionStore};

#[cfg(test)]
pub mod test_utils;
