//! Chat service trait
//!
//! Typed surface over the remote chat backend. Implementations hold no
//! session state: every call is a single request/response with no retries
//! and no caching. Callers decide how to handle failures.

use crate::api::types::{Chat, Message, ModelSelection, SendMessageResponse};
use crate::error::Result;
use async_trait::async_trait;

/// Remote chat backend
///
/// Failures are reported as [`crate::error::ChatShellError::Network`] for
/// transport problems and [`crate::error::ChatShellError::Api`] for
/// non-success responses.
#[async_trait]
pub trait ChatService: Send + Sync {
    /// List all chats in backend order
    async fn list_chats(&self) -> Result<Vec<Chat>>;

    /// Create a chat with the given title
    async fn create_chat(&self, title: &str) -> Result<Chat>;

    /// Delete a chat; `true` when the backend applied the delete
    async fn delete_chat(&self, chat_id: &str) -> Result<bool>;

    /// List the messages of one chat in backend order
    async fn list_messages(&self, chat_id: &str) -> Result<Vec<Message>>;

    /// Send a user message and wait for the model's reply
    async fn send_message(
        &self,
        chat_id: &str,
        content: &str,
        model: &ModelSelection,
    ) -> Result<SendMessageResponse>;

    /// Delete one message; `true` when the backend applied the delete
    async fn delete_message(&self, msg_id: &str) -> Result<bool>;

    /// List the models the backend can route messages to
    async fn list_models(&self) -> Result<Vec<ModelSelection>>;
}
