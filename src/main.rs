use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use chat_relay::channels::{EventSource, TelegramClient};
use chat_relay::config::RelayConfig;
use chat_relay::pipeline::RuleSets;
use chat_relay::relay::Relay;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // Validate configuration before touching the network
    let config = RelayConfig::from_env()?;
    let rules = RuleSets::new(&config.stop_phrases, &config.key_phrases)?;

    info!(
        chats = config.chats.len(),
        primary = config.primary_destination,
        quarantine = config.stop_destination,
        "Configuration loaded"
    );

    let client = Arc::new(TelegramClient::new(config.bot_token, config.chats));
    client.health_check().await?;

    let events = client.subscribe().await?;

    info!("Relay is starting...");
    let relay = Relay::new(
        rules,
        client,
        config.primary_destination,
        config.stop_destination,
    );
    relay.run(events).await;

    Ok(())
}
