/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `chats`   : list, create, and delete chats
- `messages`: show, send, and delete messages
- `models`  : list models
- `shell`   : interactive session

Every handler builds its session from the configuration; nothing is kept
between invocations.
*/

use crate::api::HttpChatService;
use crate::config::Config;
use crate::error::Result;
use crate::session::Session;
use std::sync::Arc;

pub mod chats;
pub mod messages;
pub mod models;
pub mod render;
pub mod shell;
pub mod special_commands;

/// Build the HTTP chat service from configuration
pub fn connect(config: &Config) -> Result<Arc<HttpChatService>> {
    Ok(Arc::new(HttpChatService::new(&config.api)?))
}

/// Build and start a session: models, chats, and the first chat's messages
pub async fn open_session(config: &Config) -> Result<Session> {
    let service = connect(config)?;
    let session = Session::new(service, &config.session);
    session.start().await;
    Ok(session)
}
