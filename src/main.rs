//! ChatShell - terminal client for a remote chat API
//!
#![doc = "ChatShell - terminal client for a remote chat API"]
#![doc = "Main entry point for the chatshell binary."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chatshell::cli::{ChatCommand, Cli, Commands, MessageCommand, ModelCommand};
use chatshell::commands;
use chatshell::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;
    tracing::debug!("Using API at {}", config.api.base_url);

    // Execute command
    match cli.command {
        Commands::Shell => {
            tracing::info!("Starting interactive shell");
            commands::shell::run_shell(config).await?;
            Ok(())
        }
        Commands::Chats { command } => match command {
            ChatCommand::List { json } => {
                tracing::info!("Listing chats");
                commands::chats::list_chats(&config, json).await?;
                Ok(())
            }
            ChatCommand::New => {
                tracing::info!("Creating chat");
                commands::chats::new_chat(&config).await?;
                Ok(())
            }
            ChatCommand::Delete { chat_id } => {
                tracing::info!("Deleting chat {}", chat_id);
                commands::chats::delete_chat(&config, &chat_id).await?;
                Ok(())
            }
        },
        Commands::Messages { command } => match command {
            MessageCommand::List { chat_id, json } => {
                tracing::info!("Listing messages of {}", chat_id);
                commands::messages::list_messages(&config, &chat_id, json).await?;
                Ok(())
            }
            MessageCommand::Send {
                chat_id,
                content,
                model,
            } => {
                tracing::info!("Sending message to {}", chat_id);
                if let Some(m) = &model {
                    tracing::debug!("Using model override: {}", m);
                }
                commands::messages::send_message(&config, &chat_id, &content, model.as_deref())
                    .await?;
                Ok(())
            }
            MessageCommand::Delete { msg_id } => {
                tracing::info!("Deleting message {}", msg_id);
                commands::messages::delete_message(&config, &msg_id).await?;
                Ok(())
            }
        },
        Commands::Models { command } => match command {
            ModelCommand::List { json } => {
                tracing::info!("Listing models");
                commands::models::list_models(&config, json).await?;
                Ok(())
            }
        },
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "chatshell=debug"
    } else {
        "chatshell=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
