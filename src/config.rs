//! Configuration management for ChatShell
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::api::ModelSelection;
use crate::error::{ChatShellError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for ChatShell
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote chat API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Session defaults
    #[serde(default)]
    pub session: SessionConfig,
}

/// Remote chat API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Optional bearer token sent with every request
    #[serde(default)]
    pub token: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            token: None,
        }
    }
}

/// Session defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Model used until the backend's model list resolves
    #[serde(default)]
    pub default_model: ModelSelection,

    /// Title given to chats created from the client
    #[serde(default = "default_new_chat_title")]
    pub new_chat_title: String,
}

fn default_new_chat_title() -> String {
    "New Chat".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_model: ModelSelection::default(),
            new_chat_title: default_new_chat_title(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ChatShellError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ChatShellError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("CHATSHELL_API_BASE") {
            self.api.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("CHATSHELL_API_TIMEOUT") {
            match timeout.parse() {
                Ok(seconds) => self.api.timeout_seconds = seconds,
                Err(_) => tracing::warn!("Ignoring invalid CHATSHELL_API_TIMEOUT: {}", timeout),
            }
        }

        if let Ok(token) = std::env::var("CHATSHELL_API_TOKEN") {
            self.api.token = Some(token);
        }

        if let Ok(model) = std::env::var("CHATSHELL_MODEL") {
            match ModelSelection::parse(&model) {
                Some(selection) => self.session.default_model = selection,
                None => tracing::warn!(
                    "Ignoring CHATSHELL_MODEL={}, expected provider/name",
                    model
                ),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(base_url) = &cli.api_base {
            tracing::debug!("Using API base override from CLI: {}", base_url);
            self.api.base_url = base_url.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ChatShellError::Config("api.base_url cannot be empty".to_string()).into());
        }

        let parsed = url::Url::parse(&self.api.base_url).map_err(|e| {
            ChatShellError::Config(format!(
                "api.base_url is not a valid URL ({}): {}",
                self.api.base_url, e
            ))
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ChatShellError::Config(format!(
                "api.base_url must use http or https, got {}",
                parsed.scheme()
            ))
            .into());
        }

        if self.api.timeout_seconds == 0 {
            return Err(ChatShellError::Config(
                "api.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.session.default_model.name.is_empty()
            || self.session.default_model.provider.is_empty()
        {
            return Err(ChatShellError::Config(
                "session.default_model needs both name and provider".to_string(),
            )
            .into());
        }

        if self.session.new_chat_title.trim().is_empty() {
            return Err(ChatShellError::Config(
                "session.new_chat_title cannot be empty".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
