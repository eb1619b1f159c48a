use anyhow::Result;
use hana_app::config::Config;
use hana_app::repl::Repl;
use hana_core::{Agent, AgentSettings};
use hana_executor::{AuditLog, Executor};
use hana_policy::SafetyPolicy;
use hana_providers::OpenRouterClient;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;

    let provider = Arc::new(OpenRouterClient::new(
        config.api_url.clone(),
        config.api_key.clone(),
    ));
    let agent = Agent::new(
        provider,
        AgentSettings {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            language: config.language.clone(),
        },
    );

    let log = AuditLog::open(&config.db_path)?;
    let executor = Executor::new(SafetyPolicy::new(), log, config.trash_dir.clone());

    Repl::new(agent, executor, config).run().await?;
    Ok(())
}
