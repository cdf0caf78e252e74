//! Remote chat service client
//!
//! This module contains the chat service abstraction, its HTTP
//! implementation, and the wire types both sides share.

pub mod http;
pub mod service;
pub mod types;

pub use http::HttpChatService;
pub use service::ChatService;
pub use types::{Chat, Message, ModelSelection, Role, SendMessageResponse};
