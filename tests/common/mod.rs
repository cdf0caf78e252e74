use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chatshell::api::HttpChatService;
use chatshell::config::ApiConfig;

/// API configuration pointing at a mock server
#[allow(dead_code)]
pub fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
        token: None,
    }
}

#[allow(dead_code)]
pub fn http_service(server: &MockServer) -> Arc<HttpChatService> {
    Arc::new(HttpChatService::new(&api_config(server)).expect("valid mock server url"))
}

#[allow(dead_code)]
pub fn chat_json(id: &str, title: &str) -> Value {
    json!({ "chat_id": id, "title": title })
}

#[allow(dead_code)]
pub fn message_json(msg_id: &str, chat_id: &str, role: &str, content: &str) -> Value {
    json!({ "msg_id": msg_id, "chat_id": chat_id, "role": role, "content": content })
}

/// Answer `verb path` with a JSON body
#[allow(dead_code)]
pub async fn mount_json(server: &MockServer, verb: &str, route: &str, body: Value) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
