//! Model listing command

use crate::api::ChatService;
use crate::commands::{connect, render};
use crate::config::Config;
use crate::error::Result;

/// List the models the backend can route messages to
///
/// The first listed model is the one new sessions start with; without any,
/// the configured default applies.
pub async fn list_models(config: &Config, json: bool) -> Result<()> {
    let service = connect(config)?;
    let models = service.list_models().await?;
    tracing::info!("Listed {} models", models.len());

    if json {
        return render::print_json(&models);
    }
    if models.is_empty() {
        println!(
            "No models listed by the server; using {}",
            config.session.default_model
        );
        return Ok(());
    }

    println!("\nAvailable models:\n");
    render::models_table(&models, models.first()).printstd();
    println!();
    Ok(())
}
