//! Message loading for the selected chat
//!
//! The loader owns the in-memory message list of exactly one chat: the one it
//! is bound to. Rebinding to another chat clears the list and bumps a
//! generation counter. Every fetch captures the generation it started under
//! and its result is applied only if that generation is still current when
//! the response arrives. Stale results are dropped, never cancelled on the
//! wire.
//!
//! At most one fetch is in flight per loader; a second `load_messages` while
//! one is pending is dropped, not queued.

use crate::api::{ChatService, Message, ModelSelection, SendMessageResponse};
use crate::error::{ChatShellError, Result};
use crate::session::store::SessionStore;

use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// What happened to a `load_messages` call
#[derive(Debug)]
pub enum LoadOutcome {
    /// The fetched list replaced the displayed one; holds its length
    Applied(usize),
    /// No request was made (empty id, or a fetch was already in flight)
    Skipped,
    /// The response arrived after the loader moved to another chat
    Discarded,
    /// The request failed; the displayed list was left as it was
    Failed(anyhow::Error),
}

impl LoadOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

#[derive(Debug, Default)]
struct LoaderState {
    chat_id: Option<String>,
    messages: Vec<Message>,
    loading: bool,
    generation: u64,
    /// Generation of the fetch currently in flight
    active: Option<u64>,
    /// Messages appended by sends while a fetch was in flight
    appended_during_fetch: Vec<Message>,
    /// Message ids deleted while a fetch was in flight
    deleted_during_fetch: Vec<String>,
}

impl LoaderState {
    fn apply_fetched(&mut self, fetched: Vec<Message>) {
        let appended = mem::take(&mut self.appended_during_fetch);
        let deleted = mem::take(&mut self.deleted_during_fetch);

        self.messages = fetched;
        for msg in appended {
            if !self.messages.iter().any(|m| m.msg_id == msg.msg_id) {
                self.messages.push(msg);
            }
        }
        self.messages.retain(|m| !deleted.contains(&m.msg_id));
    }
}

/// Per-chat message list controller
pub struct ChatLoader {
    service: Arc<dyn ChatService>,
    store: Arc<SessionStore>,
    state: Mutex<LoaderState>,
}

impl ChatLoader {
    /// Create an unbound loader
    ///
    /// Title changes reported by sends are forwarded to `store`.
    pub fn new(service: Arc<dyn ChatService>, store: Arc<SessionStore>) -> Self {
        Self {
            service,
            store,
            state: Mutex::new(LoaderState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, LoaderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bind the loader to a chat, or to none
    ///
    /// When the chat changes the message list is cleared at once and any
    /// in-flight fetch is invalidated. Returns `true` if the binding changed.
    pub fn bind(&self, chat_id: Option<&str>) -> bool {
        let mut state = self.state();
        if state.chat_id.as_deref() == chat_id {
            return false;
        }

        state.generation = state.generation.wrapping_add(1);
        state.chat_id = chat_id.map(str::to_string);
        state.messages.clear();
        state.appended_during_fetch.clear();
        state.deleted_during_fetch.clear();
        state.active = None;
        state.loading = false;

        tracing::debug!(
            "Message loader bound to {:?} (generation {})",
            state.chat_id,
            state.generation
        );
        true
    }

    /// Fetch the messages of `chat_id` and display them
    ///
    /// Binds to `chat_id` first if the loader is bound elsewhere. Failures
    /// are logged and leave the list untouched.
    pub async fn load_messages(&self, chat_id: &str) -> LoadOutcome {
        if chat_id.trim().is_empty() {
            return LoadOutcome::Skipped;
        }
        self.bind(Some(chat_id));

        let generation = {
            let mut state = self.state();
            if state.active.is_some() {
                tracing::debug!("Fetch already in flight for {}, dropping request", chat_id);
                return LoadOutcome::Skipped;
            }
            state.active = Some(state.generation);
            state.loading = true;
            state.generation
        };

        let result = self.service.list_messages(chat_id).await;

        let mut state = self.state();
        if state.generation != generation || state.active != Some(generation) {
            tracing::debug!(
                "Discarding stale messages for {} (generation {}, now {})",
                chat_id,
                generation,
                state.generation
            );
            return LoadOutcome::Discarded;
        }
        state.active = None;
        state.loading = false;

        match result {
            Ok(messages) => {
                state.apply_fetched(messages);
                tracing::debug!("Loaded {} messages for {}", state.messages.len(), chat_id);
                LoadOutcome::Applied(state.messages.len())
            }
            Err(e) => {
                state.appended_during_fetch.clear();
                state.deleted_during_fetch.clear();
                tracing::warn!("Failed to load messages for {}: {:#}", chat_id, e);
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Send a message and append the stored turn and the reply
    ///
    /// Nothing is appended before the backend confirms. If the loader moved
    /// to another chat meanwhile, the reply is not appended to that chat's
    /// list. A renamed chat is propagated to the session store.
    ///
    /// # Errors
    ///
    /// Returns the service error; the message list is unchanged.
    pub async fn send_message(
        &self,
        chat_id: &str,
        content: &str,
        model: &ModelSelection,
    ) -> Result<SendMessageResponse> {
        let generation = self.state().generation;

        let response = self.service.send_message(chat_id, content, model).await?;

        {
            let mut state = self.state();
            let still_current =
                state.generation == generation && state.chat_id.as_deref() == Some(chat_id);
            if still_current {
                // A fetch that finished while the send was pending may
                // already hold the stored turn.
                for msg in [&response.user_message, &response.ai_message] {
                    if !state.messages.iter().any(|m| m.msg_id == msg.msg_id) {
                        state.messages.push(msg.clone());
                    }
                }
                if state.active.is_some() {
                    state
                        .appended_during_fetch
                        .push(response.user_message.clone());
                    state.appended_during_fetch.push(response.ai_message.clone());
                }
            } else {
                tracing::debug!("Reply for {} arrived after switching chats", chat_id);
            }
        }

        if let Some(updated) = &response.updated_chat {
            self.store.update_chat_title(chat_id, &updated.title);
        }

        Ok(response)
    }

    /// Delete a message on the backend, then from the displayed list
    ///
    /// # Errors
    ///
    /// Returns the service error, or [`ChatShellError::DeleteRejected`] when
    /// the backend reports the delete was not applied. The list is unchanged
    /// in both cases and the caller must tell the user.
    pub async fn delete_message(&self, msg_id: &str) -> Result<()> {
        if !self.service.delete_message(msg_id).await? {
            tracing::warn!("Backend refused to delete message {}", msg_id);
            return Err(ChatShellError::DeleteRejected(msg_id.to_string()).into());
        }

        let mut state = self.state();
        state.messages.retain(|m| m.msg_id != msg_id);
        if state.active.is_some() {
            state.appended_during_fetch.retain(|m| m.msg_id != msg_id);
            state.deleted_during_fetch.push(msg_id.to_string());
        }
        Ok(())
    }

    /// Snapshot of the displayed messages
    pub fn messages(&self) -> Vec<Message> {
        self.state().messages.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    /// Chat the loader is bound to
    pub fn chat_id(&self) -> Option<String> {
        self.state().chat_id.clone()
    }
}
