//! End-to-end tests of the `chatshell` binary against a mock backend

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use wiremock::MockServer;

use common::{chat_json, message_json, mount_json, temp_config_file};

fn chatshell() -> Command {
    let mut cmd = Command::cargo_bin("chatshell").expect("binary built");
    cmd.env_remove("CHATSHELL_CONFIG")
        .env_remove("CHATSHELL_API_BASE")
        .env_remove("CHATSHELL_API_TOKEN")
        .env_remove("CHATSHELL_MODEL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    chatshell()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("shell"))
        .stdout(predicate::str::contains("chats"))
        .stdout(predicate::str::contains("models"));
}

#[test]
fn test_invalid_base_url_is_rejected() {
    let (_dir, config) = temp_config_file("api:\n  base_url: \"not a url\"\n");
    chatshell()
        .args(["--config", config.to_str().expect("utf-8 path")])
        .args(["chats", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("api.base_url"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_chats_list_json_from_config_file() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/chats",
        json!([chat_json("a", "First"), chat_json("b", "Second")]),
    )
    .await;

    let (_dir, config) = temp_config_file(&format!("api:\n  base_url: {}\n", server.uri()));
    let output = chatshell()
        .args(["--config", config.to_str().expect("utf-8 path")])
        .args(["chats", "list", "--json"])
        .output()
        .expect("run chatshell");

    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(parsed[0]["chat_id"], "a");
    assert_eq!(parsed[1]["title"], "Second");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_api_base_flag_overrides_config() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/chats/a/messages",
        json!([message_json("m1", "a", "assistant", "stored reply")]),
    )
    .await;

    let (_dir, config) = temp_config_file("api:\n  base_url: http://127.0.0.1:9\n");
    chatshell()
        .args(["--config", config.to_str().expect("utf-8 path")])
        .args(["--api-base", &server.uri()])
        .args(["messages", "list", "a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stored reply"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_message_delete_fails() {
    let server = MockServer::start().await;
    mount_json(&server, "DELETE", "/messages/m1", json!({ "success": false })).await;

    chatshell()
        .args(["--api-base", &server.uri()])
        .args(["messages", "delete", "m1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to delete message"));
}
