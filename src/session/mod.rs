//! Client-side session state
//!
//! - `store`: chat list, selection, model, and chat-list loading flag
//! - `loader`: message list of the selected chat, guarded against stale fetches
//! - `navigation`: which chat becomes selected after list changes
//!
//! [`Session`] bundles one store and one loader and is what views talk to:
//! every intent goes through it, and after each intent the loader is made to
//! follow the store's selection.

pub mod loader;
pub mod navigation;
pub mod store;

pub use loader::{ChatLoader, LoadOutcome};
pub use navigation::Navigation;
pub use store::SessionStore;

use crate::api::{Chat, ChatService, SendMessageResponse};
use crate::config::SessionConfig;
use crate::error::{ChatShellError, Result};
use std::sync::Arc;

/// One user session: a store plus the loader for its selected chat
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use chatshell::api::HttpChatService;
/// use chatshell::config::Config;
/// use chatshell::session::Session;
///
/// # async fn example() -> chatshell::Result<()> {
/// let config = Config::default();
/// let session = Session::new(Arc::new(HttpChatService::new(&config.api)?), &config.session);
/// session.start().await;
/// if let Some(chat) = session.store().selected_chat() {
///     session.send_message("Hello!").await?;
///     println!("{}: {} messages", chat.title, session.loader().messages().len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Session {
    store: Arc<SessionStore>,
    loader: ChatLoader,
}

impl Session {
    pub fn new(service: Arc<dyn ChatService>, config: &SessionConfig) -> Self {
        let store = Arc::new(SessionStore::new(service.clone(), config));
        let loader = ChatLoader::new(service, store.clone());
        Self { store, loader }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn loader(&self) -> &ChatLoader {
        &self.loader
    }

    /// Load models and chats, then the messages of whatever got selected
    pub async fn start(&self) -> Option<LoadOutcome> {
        self.store.initialize().await;
        self.follow_selection().await
    }

    /// Bind the loader to the store's selection, loading it if it changed
    ///
    /// Returns the load outcome when a fetch was attempted.
    pub async fn follow_selection(&self) -> Option<LoadOutcome> {
        let selected = self.store.selected_chat_id();
        if self.loader.chat_id() == selected {
            return None;
        }
        match selected {
            Some(id) => Some(self.loader.load_messages(&id).await),
            None => {
                self.loader.bind(None);
                None
            }
        }
    }

    /// Switch to a chat in the list
    ///
    /// Returns `false` when the id is not in the list.
    pub async fn select_chat(&self, chat_id: &str) -> bool {
        if !self.store.select_chat(chat_id) {
            return false;
        }
        self.follow_selection().await;
        true
    }

    /// Re-fetch the chat list and the selected chat's messages
    ///
    /// Returns whether the chat list was replaced, and the outcome of the
    /// message fetch when one was attempted.
    pub async fn refresh(&self) -> (bool, Option<LoadOutcome>) {
        let replaced = self.store.refresh_chats().await;
        let outcome = match self.follow_selection().await {
            Some(outcome) => Some(outcome),
            None => match self.store.selected_chat_id() {
                Some(id) => Some(self.loader.load_messages(&id).await),
                None => None,
            },
        };
        (replaced, outcome)
    }

    /// Create a chat and switch to it
    ///
    /// # Errors
    ///
    /// Returns the service error; the chat list and selection are unchanged.
    pub async fn create_new_chat(&self) -> Result<Chat> {
        let created = self.store.create_new_chat().await?;
        self.follow_selection().await;
        Ok(created)
    }

    /// Delete a chat on the backend and move off it if it was selected
    ///
    /// # Errors
    ///
    /// Returns the service error or [`ChatShellError::DeleteRejected`].
    pub async fn delete_chat(&self, chat_id: &str) -> Result<Navigation> {
        let decision = self.store.delete_chat(chat_id).await?;
        self.follow_selection().await;
        Ok(decision)
    }

    /// Send to the selected chat with the active model
    ///
    /// # Errors
    ///
    /// Returns [`ChatShellError::NoChatSelected`] when nothing is selected,
    /// otherwise the service error. Nothing is appended on failure.
    pub async fn send_message(&self, content: &str) -> Result<SendMessageResponse> {
        let chat_id = self
            .store
            .selected_chat_id()
            .ok_or(ChatShellError::NoChatSelected)?;
        let model = self.store.model();
        self.loader.send_message(&chat_id, content, &model).await
    }

    /// Delete a message of the selected chat
    ///
    /// # Errors
    ///
    /// Returns the service error or [`ChatShellError::DeleteRejected`]; the
    /// caller must tell the user the message is still there.
    pub async fn delete_message(&self, msg_id: &str) -> Result<()> {
        self.loader.delete_message(msg_id).await
    }
}
