//! Navigation policy
//!
//! Decides which chat becomes selected after the chat list or the selection
//! changes. The functions here are pure: they inspect the new state and
//! return a [`Navigation`]; the session store applies it.
//!
//! Rules:
//! - nothing selected and the list is non-empty: select the first chat
//! - the selected chat left the list: select the first remaining chat, or none
//! - a chat was just created: select it, whatever was selected before
//!
//! There is no most-recently-used heuristic and nothing is remembered across
//! sessions.

use crate::api::Chat;

/// Selection change decided by the navigation policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Keep the current selection
    Stay,
    /// Select the given chat id
    Select(String),
    /// Clear the selection (empty view)
    Clear,
}

impl Navigation {
    /// Selection that results from applying this decision to `current`
    ///
    /// # Examples
    ///
    /// ```
    /// use chatshell::session::Navigation;
    ///
    /// assert_eq!(Navigation::Stay.resolve(Some("a")), Some("a".to_string()));
    /// assert_eq!(Navigation::Select("b".into()).resolve(Some("a")), Some("b".to_string()));
    /// assert_eq!(Navigation::Clear.resolve(Some("a")), None);
    /// ```
    pub fn resolve(&self, current: Option<&str>) -> Option<String> {
        match self {
            Self::Stay => current.map(str::to_string),
            Self::Select(id) => Some(id.clone()),
            Self::Clear => None,
        }
    }
}

fn first_or_clear(chats: &[Chat]) -> Navigation {
    chats
        .first()
        .map(|chat| Navigation::Select(chat.chat_id.clone()))
        .unwrap_or(Navigation::Clear)
}

/// Decision after the chat list was replaced by a fetch
///
/// A selection that no longer appears in the fetched list falls back to the
/// first chat, keeping the selection a member of the list.
pub fn after_list_replaced(selected: Option<&str>, chats: &[Chat]) -> Navigation {
    match selected {
        None if chats.is_empty() => Navigation::Stay,
        None => first_or_clear(chats),
        Some(id) if chats.iter().any(|chat| chat.chat_id == id) => Navigation::Stay,
        Some(_) => first_or_clear(chats),
    }
}

/// Decision after `removed` was taken out of the list
///
/// `remaining` is the list after the removal, in its current order.
pub fn after_chat_removed(selected: Option<&str>, removed: &str, remaining: &[Chat]) -> Navigation {
    match selected {
        Some(id) if id == removed => first_or_clear(remaining),
        _ => Navigation::Stay,
    }
}

/// Decision after the backend confirmed a new chat
pub fn after_chat_created(created: &Chat) -> Navigation {
    Navigation::Select(created.chat_id.clone())
}
