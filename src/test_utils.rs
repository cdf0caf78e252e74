//! Test utilities for ChatShell
//!
//! Provides an in-memory [`ChatService`] whose calls can be held open or made
//! to fail, so session tests can reproduce exact interleavings of requests
//! and user intents.

use crate::api::{Chat, ChatService, Message, ModelSelection, Role, SendMessageResponse};
use crate::error::{ChatShellError, Result};

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Build a chat titled `Chat <id>`
pub fn chat(id: &str) -> Chat {
    Chat::new(id, format!("Chat {}", id))
}

/// Build a message in `chat_id`
pub fn message(msg_id: &str, chat_id: &str, role: Role, content: &str) -> Message {
    Message::new(msg_id, chat_id, role, content)
}

#[derive(Default)]
struct FakeState {
    chats: Vec<Chat>,
    messages: HashMap<String, Vec<Message>>,
    models: Vec<ModelSelection>,
    renames: HashMap<String, String>,
    rejected_deletes: HashSet<String>,
    failing: HashSet<String>,
    gates: HashMap<String, Arc<Notify>>,
    calls: Vec<String>,
    next_id: usize,
}

/// Scripted in-memory chat backend
///
/// Gate keys are the operation name (`list_chats`, `list_models`,
/// `create_chat`) or operation and id (`list_messages:a`, `send_message:a`,
/// `delete_message:m1`). A held call waits until its `Notify` fires.
#[derive(Default)]
pub struct FakeChatService {
    state: Mutex<FakeState>,
}

impl FakeChatService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chats(chats: Vec<Chat>) -> Self {
        let service = Self::new();
        service.set_chats(chats);
        service
    }

    pub fn set_chats(&self, chats: Vec<Chat>) {
        self.state.lock().unwrap().chats = chats;
    }

    pub fn set_messages(&self, chat_id: &str, messages: Vec<Message>) {
        self.state
            .lock()
            .unwrap()
            .messages
            .insert(chat_id.to_string(), messages);
    }

    pub fn set_models(&self, models: Vec<ModelSelection>) {
        self.state.lock().unwrap().models = models;
    }

    /// The next send to `chat_id` reports the chat renamed to `title`
    pub fn rename_on_send(&self, chat_id: &str, title: &str) {
        self.state
            .lock()
            .unwrap()
            .renames
            .insert(chat_id.to_string(), title.to_string());
    }

    /// Deletes of this chat or message id answer `false`
    pub fn reject_delete(&self, id: &str) {
        self.state
            .lock()
            .unwrap()
            .rejected_deletes
            .insert(id.to_string());
    }

    /// Calls to `operation` fail with a network error until [`Self::recover`]
    pub fn fail(&self, operation: &str) {
        self.state
            .lock()
            .unwrap()
            .failing
            .insert(operation.to_string());
    }

    pub fn recover(&self, operation: &str) {
        self.state.lock().unwrap().failing.remove(operation);
    }

    /// Hold the next call matching `key` until the returned `Notify` fires
    pub fn hold(&self, key: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.state
            .lock()
            .unwrap()
            .gates
            .insert(key.to_string(), notify.clone());
        notify
    }

    /// Number of calls whose key starts with `prefix`
    pub fn call_count(&self, prefix: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    async fn enter(&self, operation: &str, key: &str) -> Result<()> {
        let gate = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(key.to_string());
            state.gates.remove(key)
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.state.lock().unwrap().failing.contains(operation) {
            return Err(ChatShellError::Network(format!("scripted failure: {}", key)).into());
        }
        Ok(())
    }
}

#[async_trait]
impl ChatService for FakeChatService {
    async fn list_chats(&self) -> Result<Vec<Chat>> {
        self.enter("list_chats", "list_chats").await?;
        Ok(self.state.lock().unwrap().chats.clone())
    }

    async fn create_chat(&self, title: &str) -> Result<Chat> {
        self.enter("create_chat", "create_chat").await?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let created = Chat::new(format!("new-{}", state.next_id), title);
        state.chats.insert(0, created.clone());
        Ok(created)
    }

    async fn delete_chat(&self, chat_id: &str) -> Result<bool> {
        self.enter("delete_chat", &format!("delete_chat:{}", chat_id))
            .await?;
        let mut state = self.state.lock().unwrap();
        if state.rejected_deletes.contains(chat_id) {
            return Ok(false);
        }
        state.chats.retain(|chat| chat.chat_id != chat_id);
        state.messages.remove(chat_id);
        Ok(true)
    }

    async fn list_messages(&self, chat_id: &str) -> Result<Vec<Message>> {
        self.enter("list_messages", &format!("list_messages:{}", chat_id))
            .await?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .messages
            .get(chat_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn send_message(
        &self,
        chat_id: &str,
        content: &str,
        model: &ModelSelection,
    ) -> Result<SendMessageResponse> {
        self.enter("send_message", &format!("send_message:{}", chat_id))
            .await?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let n = state.next_id;
        let user_message = message(&format!("u{}", n), chat_id, Role::User, content);
        let ai_message = message(
            &format!("r{}", n),
            chat_id,
            Role::Assistant,
            &format!("[{}] echo: {}", model, content),
        );
        let thread = state.messages.entry(chat_id.to_string()).or_default();
        thread.push(user_message.clone());
        thread.push(ai_message.clone());

        let updated_chat = state.renames.remove(chat_id).map(|title| {
            let renamed = Chat::new(chat_id, title);
            if let Some(existing) = state.chats.iter_mut().find(|c| c.chat_id == chat_id) {
                existing.title = renamed.title.clone();
            }
            renamed
        });

        Ok(SendMessageResponse {
            user_message,
            ai_message,
            updated_chat,
        })
    }

    async fn delete_message(&self, msg_id: &str) -> Result<bool> {
        self.enter("delete_message", &format!("delete_message:{}", msg_id))
            .await?;
        let mut state = self.state.lock().unwrap();
        if state.rejected_deletes.contains(msg_id) {
            return Ok(false);
        }
        for thread in state.messages.values_mut() {
            thread.retain(|m| m.msg_id != msg_id);
        }
        Ok(true)
    }

    async fn list_models(&self) -> Result<Vec<ModelSelection>> {
        self.enter("list_models", "list_models").await?;
        Ok(self.state.lock().unwrap().models.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_records_calls_and_fails_on_demand() {
        let service = FakeChatService::with_chats(vec![chat("a")]);
        assert_eq!(service.list_chats().await.unwrap().len(), 1);

        service.fail("list_chats");
        assert!(service.list_chats().await.is_err());
        service.recover("list_chats");
        assert!(service.list_chats().await.is_ok());

        assert_eq!(service.call_count("list_chats"), 3);
    }

    #[tokio::test]
    async fn test_fake_send_stores_both_turns() {
        let service = FakeChatService::with_chats(vec![chat("a")]);
        service.rename_on_send("a", "Greetings");
        let resp = service
            .send_message("a", "hi", &ModelSelection::default())
            .await
            .unwrap();
        assert_eq!(resp.user_message.role, Role::User);
        assert_eq!(resp.updated_chat.unwrap().title, "Greetings");
        assert_eq!(service.list_messages("a").await.unwrap().len(), 2);
    }
}
