//! Session integration tests over HTTP
//!
//! Drives a `Session` backed by `HttpChatService` against a `wiremock`
//! backend: startup, chat creation, sending, deletion, and failures.

mod common;

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chatshell::config::SessionConfig;
use chatshell::{ChatShellError, LoadOutcome, Session};

use common::{chat_json, http_service, message_json, mount_json};

async fn backend_with_two_chats() -> MockServer {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/models",
        json!([{ "name": "llama3.2", "provider": "ollama" }]),
    )
    .await;
    mount_json(
        &server,
        "GET",
        "/chats/a/messages",
        json!([message_json("a1", "a", "user", "hello a")]),
    )
    .await;
    mount_json(&server, "GET", "/chats/b/messages", json!([])).await;
    server
}

async fn mount_chats(server: &MockServer, chats: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/chats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chats))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_start_selects_first_chat() {
    let server = backend_with_two_chats().await;
    mount_chats(&server, json!([chat_json("a", "First"), chat_json("b", "Second")])).await;

    let session = Session::new(http_service(&server), &SessionConfig::default());
    let outcome = session.start().await;

    assert!(matches!(outcome, Some(LoadOutcome::Applied(1))));
    assert_eq!(session.store().selected_chat_id().as_deref(), Some("a"));
    assert_eq!(session.store().model().name, "llama3.2");
    assert!(!session.store().is_loading());
    assert!(!session.loader().is_loading());
}

#[tokio::test]
async fn test_create_new_chat_selects_created() {
    let server = backend_with_two_chats().await;

    // The list before creation, then the list including the new chat.
    Mock::given(method("GET"))
        .and(path("/chats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([chat_json("a", "First")])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_chats(
        &server,
        json!([chat_json("x", "New Chat"), chat_json("a", "First")]),
    )
    .await;
    mount_json(&server, "POST", "/chats", chat_json("x", "New Chat")).await;
    mount_json(&server, "GET", "/chats/x/messages", json!([])).await;

    let session = Session::new(http_service(&server), &SessionConfig::default());
    session.start().await;
    assert_eq!(session.store().selected_chat_id().as_deref(), Some("a"));

    let created = session.create_new_chat().await.expect("create chat");
    assert_eq!(created.chat_id, "x");
    assert_eq!(session.store().selected_chat_id().as_deref(), Some("x"));
    assert_eq!(session.store().chats().len(), 2);
    assert_eq!(session.loader().chat_id().as_deref(), Some("x"));
    assert!(session.loader().messages().is_empty());
}

#[tokio::test]
async fn test_send_appends_both_turns_and_renames() {
    let server = backend_with_two_chats().await;
    mount_chats(&server, json!([chat_json("a", "First")])).await;
    mount_json(
        &server,
        "POST",
        "/chats/a/messages",
        json!({
            "userMessage": message_json("u1", "a", "user", "how are you"),
            "aiMessage": message_json("r1", "a", "assistant", "fine"),
            "updatedChat": chat_json("a", "Small talk"),
        }),
    )
    .await;

    let session = Session::new(http_service(&server), &SessionConfig::default());
    session.start().await;
    session.send_message("how are you").await.expect("send");

    let ids: Vec<String> = session
        .loader()
        .messages()
        .into_iter()
        .map(|m| m.msg_id)
        .collect();
    assert_eq!(ids, vec!["a1", "u1", "r1"]);
    assert_eq!(
        session.store().selected_chat().map(|c| c.title).as_deref(),
        Some("Small talk")
    );
}

#[tokio::test]
async fn test_failed_send_leaves_messages_untouched() {
    let server = backend_with_two_chats().await;
    mount_chats(&server, json!([chat_json("a", "First")])).await;
    Mock::given(method("POST"))
        .and(path("/chats/a/messages"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "model down" })))
        .mount(&server)
        .await;

    let session = Session::new(http_service(&server), &SessionConfig::default());
    session.start().await;

    let err = session.send_message("hi").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ChatShellError>(),
        Some(ChatShellError::Api { status: 500, .. })
    ));
    assert_eq!(session.loader().messages().len(), 1);
}

#[tokio::test]
async fn test_delete_selected_chat_moves_to_next() {
    let server = backend_with_two_chats().await;
    mount_chats(&server, json!([chat_json("a", "First"), chat_json("b", "Second")])).await;
    mount_json(&server, "DELETE", "/chats/a", json!({ "success": true })).await;

    let session = Session::new(http_service(&server), &SessionConfig::default());
    session.start().await;

    session.delete_chat("a").await.expect("delete chat");
    assert_eq!(session.store().selected_chat_id().as_deref(), Some("b"));
    assert_eq!(session.loader().chat_id().as_deref(), Some("b"));
    assert!(session.loader().messages().is_empty());
}

#[tokio::test]
async fn test_rejected_message_delete_keeps_message() {
    let server = backend_with_two_chats().await;
    mount_chats(&server, json!([chat_json("a", "First")])).await;
    mount_json(&server, "DELETE", "/messages/a1", json!(false)).await;

    let session = Session::new(http_service(&server), &SessionConfig::default());
    session.start().await;

    let err = session.delete_message("a1").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ChatShellError>(),
        Some(ChatShellError::DeleteRejected(_))
    ));
    assert_eq!(session.loader().messages().len(), 1);
}

#[tokio::test]
async fn test_failed_chat_list_keeps_session_usable() {
    let server = backend_with_two_chats().await;
    Mock::given(method("GET"))
        .and(path("/chats"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let session = Session::new(http_service(&server), &SessionConfig::default());
    assert!(session.start().await.is_none());
    assert!(session.store().chats().is_empty());
    assert_eq!(session.store().selected_chat_id(), None);
    assert!(!session.store().is_loading());
}

#[tokio::test]
async fn test_slow_fetch_for_previous_chat_is_discarded() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/models", json!([])).await;
    mount_chats(&server, json!([chat_json("a", "First"), chat_json("b", "Second")])).await;
    Mock::given(method("GET"))
        .and(path("/chats/a/messages"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([message_json("a1", "a", "user", "late")]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    mount_json(
        &server,
        "GET",
        "/chats/b/messages",
        json!([message_json("b1", "b", "user", "current")]),
    )
    .await;

    let session = Session::new(http_service(&server), &SessionConfig::default());
    session.store().initialize().await;
    assert_eq!(session.store().selected_chat_id().as_deref(), Some("a"));

    let (slow, _) = tokio::join!(session.loader().load_messages("a"), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        session.select_chat("b").await
    });

    assert!(matches!(slow, LoadOutcome::Discarded));
    let ids: Vec<String> = session
        .loader()
        .messages()
        .into_iter()
        .map(|m| m.msg_id)
        .collect();
    assert_eq!(ids, vec!["b1"]);
}
