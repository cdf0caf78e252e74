//! HTTP implementation of the chat service
//!
//! Talks REST/JSON to the backend configured in [`ApiConfig`]. Every method
//! issues exactly one request; transport failures become
//! [`ChatShellError::Network`] and non-success statuses become
//! [`ChatShellError::Api`].

use crate::api::service::ChatService;
use crate::api::types::{Chat, Message, ModelSelection, SendMessageResponse};
use crate::config::ApiConfig;
use crate::error::{ChatShellError, Result};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Chat service backed by the remote HTTP API
///
/// # Examples
///
/// ```
/// use chatshell::api::HttpChatService;
/// use chatshell::config::ApiConfig;
///
/// let service = HttpChatService::new(&ApiConfig::default()).unwrap();
/// assert_eq!(service.base_url(), "http://localhost:8000/api");
/// ```
#[derive(Debug, Clone)]
pub struct HttpChatService {
    client: Client,
    base: Url,
    token: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateChatRequest<'a> {
    title: &'a str,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    content: &'a str,
    model: &'a ModelSelection,
}

/// Delete endpoints answer either a bare boolean or `{"success": bool}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DeleteResponse {
    Flag(bool),
    Object { success: bool },
}

impl DeleteResponse {
    fn applied(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Object { success } => *success,
        }
    }
}

impl HttpChatService {
    /// Create a new HTTP chat service
    ///
    /// # Errors
    ///
    /// Returns error if the base URL does not parse or the HTTP client
    /// cannot be built
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            ChatShellError::Config(format!("Invalid API base URL {}: {}", config.base_url, e))
        })?;
        if base.cannot_be_a_base() {
            return Err(ChatShellError::Config(format!(
                "API base URL cannot carry paths: {}",
                config.base_url
            ))
            .into());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("chatshell/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ChatShellError::Network(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!("Initialized chat service client: base_url={}", config.base_url);

        Ok(Self {
            client,
            base,
            token: config.token.clone(),
        })
    }

    /// Base URL as configured, without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// Build an endpoint URL, percent-encoding each path segment
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.authorize(request).send().await.map_err(|e| {
            tracing::warn!("Chat service request failed: {}", e);
            ChatShellError::Network(e.to_string())
        })?;

        let response = check_status(response).await?;

        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to decode chat service response: {}", e);
            ChatShellError::Network(format!("Failed to decode response: {}", e)).into()
        })
    }
}

/// Turn a non-success response into [`ChatShellError::Api`]
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });

    tracing::error!("Chat service returned error {}: {}", status, message);
    Err(ChatShellError::Api {
        status: status.as_u16(),
        message,
    }
    .into())
}

/// Pull a human-readable message out of an error body
///
/// Prefers the `detail`, `message`, or `error` string fields of a JSON body,
/// falling back to the raw text.
fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(trimmed)
    {
        for key in ["detail", "message", "error"] {
            if let Some(text) = map.get(key).and_then(|v| v.as_str()) {
                return Some(text.to_string());
            }
        }
    }

    Some(trimmed.to_string())
}

#[async_trait]
impl ChatService for HttpChatService {
    async fn list_chats(&self) -> Result<Vec<Chat>> {
        let url = self.endpoint(&["chats"]);
        tracing::debug!("GET {}", url);
        self.execute(self.client.get(url)).await
    }

    async fn create_chat(&self, title: &str) -> Result<Chat> {
        let url = self.endpoint(&["chats"]);
        tracing::debug!("POST {}", url);
        self.execute(self.client.post(url).json(&CreateChatRequest { title }))
            .await
    }

    async fn delete_chat(&self, chat_id: &str) -> Result<bool> {
        let url = self.endpoint(&["chats", chat_id]);
        tracing::debug!("DELETE {}", url);
        let response: DeleteResponse = self.execute(self.client.delete(url)).await?;
        Ok(response.applied())
    }

    async fn list_messages(&self, chat_id: &str) -> Result<Vec<Message>> {
        let url = self.endpoint(&["chats", chat_id, "messages"]);
        tracing::debug!("GET {}", url);
        self.execute(self.client.get(url)).await
    }

    async fn send_message(
        &self,
        chat_id: &str,
        content: &str,
        model: &ModelSelection,
    ) -> Result<SendMessageResponse> {
        let url = self.endpoint(&["chats", chat_id, "messages"]);
        tracing::debug!("POST {} (model={})", url, model);
        self.execute(
            self.client
                .post(url)
                .json(&SendMessageRequest { content, model }),
        )
        .await
    }

    async fn delete_message(&self, msg_id: &str) -> Result<bool> {
        let url = self.endpoint(&["messages", msg_id]);
        tracing::debug!("DELETE {}", url);
        let response: DeleteResponse = self.execute(self.client.delete(url)).await?;
        Ok(response.applied())
    }

    async fn list_models(&self) -> Result<Vec<ModelSelection>> {
        let url = self.endpoint(&["models"]);
        tracing::debug!("GET {}", url);
        self.execute(self.client.get(url)).await
    }
}
