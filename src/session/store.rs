//! Session store
//!
//! Single source of truth for the chat list, the selected chat, the active
//! model, and the chat-list loading flag. One store is constructed per
//! session and shared by handle; nothing here is a process-wide singleton.
//!
//! The chat list is only ever replaced wholesale from the backend, edited by
//! title, or shortened by a confirmed delete. Selection changes go through the
//! navigation policy and are published on a watch channel.

use crate::api::{Chat, ChatService, ModelSelection};
use crate::config::SessionConfig;
use crate::error::{ChatShellError, Result};
use crate::session::navigation::{self, Navigation};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

#[derive(Debug)]
struct StoreState {
    chats: Vec<Chat>,
    selected: Option<String>,
    model: ModelSelection,
    models: Vec<ModelSelection>,
    loading: bool,
    /// Chat-list fetches currently in flight
    refreshes: usize,
}

/// Tracks one chat-list fetch; the loading flag clears when the last one ends
struct LoadingGuard<'a> {
    store: &'a SessionStore,
}

impl<'a> LoadingGuard<'a> {
    fn engage(store: &'a SessionStore) -> Self {
        let mut state = store.state();
        state.refreshes += 1;
        state.loading = true;
        drop(state);
        Self { store }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.store.state();
        state.refreshes = state.refreshes.saturating_sub(1);
        state.loading = state.refreshes > 0;
    }
}

/// Session-lifetime state shared by the views
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use chatshell::api::HttpChatService;
/// use chatshell::config::Config;
/// use chatshell::session::SessionStore;
///
/// # async fn example() -> chatshell::Result<()> {
/// let config = Config::default();
/// let service = Arc::new(HttpChatService::new(&config.api)?);
/// let store = SessionStore::new(service, &config.session);
/// store.initialize().await;
/// println!("{} chats", store.chats().len());
/// # Ok(())
/// # }
/// ```
pub struct SessionStore {
    service: Arc<dyn ChatService>,
    new_chat_title: String,
    state: Mutex<StoreState>,
    selection: watch::Sender<Option<String>>,
}

impl SessionStore {
    /// Create a store with an empty chat list and the configured default model
    ///
    /// The store reports `loading` until the first chat-list fetch settles.
    pub fn new(service: Arc<dyn ChatService>, config: &SessionConfig) -> Self {
        let (selection, _) = watch::channel(None);
        Self {
            service,
            new_chat_title: config.new_chat_title.clone(),
            state: Mutex::new(StoreState {
                chats: Vec::new(),
                selected: None,
                model: config.default_model.clone(),
                models: Vec::new(),
                loading: true,
                refreshes: 0,
            }),
            selection,
        }
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load models and chats for a fresh session
    ///
    /// Both requests are issued together and applied independently, in
    /// whichever order they complete. The first listed model replaces the
    /// default; the chat list goes through [`Self::refresh_chats`].
    pub async fn initialize(&self) {
        let models = async {
            match self.service.list_models().await {
                Ok(models) => self.apply_models(models),
                Err(e) => tracing::warn!("Failed to load models: {:#}", e),
            }
        };
        let chats = async {
            self.refresh_chats().await;
        };
        tokio::join!(models, chats);
    }

    fn apply_models(&self, models: Vec<ModelSelection>) {
        let mut state = self.state();
        if let Some(first) = models.first() {
            tracing::info!("Default model set to {}", first);
            state.model = first.clone();
        } else {
            tracing::debug!("Backend listed no models, keeping {}", state.model);
        }
        state.models = models;
    }

    /// Replace the chat list with the backend's
    ///
    /// Returns `true` when the list was replaced. On failure the previous
    /// list is kept and the failure is only logged. The loading flag is
    /// cleared however the fetch ends.
    pub async fn refresh_chats(&self) -> bool {
        let _loading = LoadingGuard::engage(self);

        match self.service.list_chats().await {
            Ok(chats) => {
                let decision = {
                    let mut state = self.state();
                    tracing::info!("Chat list replaced: {} chats", chats.len());
                    let decision =
                        navigation::after_list_replaced(state.selected.as_deref(), &chats);
                    state.chats = chats;
                    decision
                };
                self.navigate(decision);
                true
            }
            Err(e) => {
                tracing::warn!("Failed to load chats: {:#}", e);
                false
            }
        }
    }

    /// Create a chat on the backend, refresh the list, and select it
    ///
    /// Nothing is inserted locally before the backend confirms; the chat
    /// shows up through the refreshed list.
    ///
    /// # Errors
    ///
    /// Returns the service error when creation fails; state is unchanged.
    pub async fn create_new_chat(&self) -> Result<Chat> {
        let created = self.service.create_chat(&self.new_chat_title).await?;
        tracing::info!("Created chat {}", created.chat_id);

        if !self.refresh_chats().await {
            tracing::debug!(
                "Chat {} selected before the list could be refreshed",
                created.chat_id
            );
        }
        self.navigate(navigation::after_chat_created(&created));

        Ok(created)
    }

    /// Rewrite the title of a chat in the local list only
    ///
    /// Returns `false` when no chat has that id.
    pub fn update_chat_title(&self, chat_id: &str, title: &str) -> bool {
        let mut state = self.state();
        match state.chats.iter_mut().find(|chat| chat.chat_id == chat_id) {
            Some(chat) => {
                chat.title = title.to_string();
                tracing::debug!("Chat {} renamed to {:?}", chat_id, title);
                true
            }
            None => false,
        }
    }

    /// Remove a chat whose deletion the backend already confirmed
    ///
    /// If it was selected, the first remaining chat (or nothing) becomes
    /// selected. Returns the navigation that was applied.
    pub fn delete_chat_locally(&self, chat_id: &str) -> Navigation {
        let decision = {
            let mut state = self.state();
            state.chats.retain(|chat| chat.chat_id != chat_id);
            navigation::after_chat_removed(state.selected.as_deref(), chat_id, &state.chats)
        };
        tracing::info!("Chat {} removed from list", chat_id);
        self.navigate(decision.clone());
        decision
    }

    /// Delete a chat on the backend, then locally
    ///
    /// # Errors
    ///
    /// Returns the service error, or [`ChatShellError::DeleteRejected`] when
    /// the backend reports the delete was not applied. The list is unchanged
    /// in both cases.
    pub async fn delete_chat(&self, chat_id: &str) -> Result<Navigation> {
        if !self.service.delete_chat(chat_id).await? {
            tracing::warn!("Backend refused to delete chat {}", chat_id);
            return Err(ChatShellError::DeleteRejected(chat_id.to_string()).into());
        }
        Ok(self.delete_chat_locally(chat_id))
    }

    /// Select a chat from the list
    ///
    /// Ids not present in the list are ignored and `false` is returned.
    pub fn select_chat(&self, chat_id: &str) -> bool {
        let known = self.state().chats.iter().any(|chat| chat.chat_id == chat_id);
        if !known {
            tracing::warn!("Ignoring selection of unknown chat {}", chat_id);
            return false;
        }
        self.navigate(Navigation::Select(chat_id.to_string()));
        true
    }

    /// Overwrite the active model
    pub fn set_model(&self, selection: ModelSelection) {
        tracing::info!("Model switched to {}", selection);
        self.state().model = selection;
    }

    fn navigate(&self, decision: Navigation) {
        let next = {
            let mut state = self.state();
            let next = decision.resolve(state.selected.as_deref());
            if next == state.selected {
                return;
            }
            state.selected = next.clone();
            next
        };

        match &next {
            Some(id) => tracing::info!("Selected chat {}", id),
            None => tracing::info!("Selection cleared"),
        }
        self.selection.send_replace(next);
    }

    /// Snapshot of the chat list in backend order
    pub fn chats(&self) -> Vec<Chat> {
        self.state().chats.clone()
    }

    pub fn selected_chat_id(&self) -> Option<String> {
        self.state().selected.clone()
    }

    /// The selected chat's entry, when it is in the list
    pub fn selected_chat(&self) -> Option<Chat> {
        let state = self.state();
        let selected = state.selected.as_deref()?;
        state
            .chats
            .iter()
            .find(|chat| chat.chat_id == selected)
            .cloned()
    }

    pub fn model(&self) -> ModelSelection {
        self.state().model.clone()
    }

    /// Models reported by the backend at initialization
    pub fn available_models(&self) -> Vec<ModelSelection> {
        self.state().models.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    /// Receive every selection change
    pub fn subscribe_selection(&self) -> watch::Receiver<Option<String>> {
        self.selection.subscribe()
    }
}
