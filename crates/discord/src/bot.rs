use std::sync::Arc;

use {
    secrecy::ExposeSecret,
    serenity::Client,
    tracing::{info, warn},
};

use {
    tempvoice_config::TempVoiceConfig,
    tempvoice_rooms::{ChannelRegistry, RoomService},
};

use crate::{
    error::{Error, Result},
    handler::TempVoiceHandler,
};

/// Connect to the gateway and process events until the connection ends or
/// Ctrl-C is received.
pub async fn start(config: &TempVoiceConfig) -> Result<()> {
    if !config.discord.has_token() {
        return Err(Error::message(
            "discord token is not set (config `discord.token` or DISCORD_TOKEN)",
        ));
    }

    let registry = Arc::new(ChannelRegistry::new());
    let service = Arc::new(RoomService::new(config.rooms.clone(), registry));
    let handler = TempVoiceHandler::new(service);

    let mut client = Client::builder(
        config.discord.token.expose_secret(),
        TempVoiceHandler::intents(),
    )
    .event_handler(handler)
    .await?;

    let shard_manager = Arc::clone(&client.shard_manager);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for shutdown signal");
            return;
        }
        info!("shutdown signal received, closing gateway connection");
        shard_manager.shutdown_all().await;
    });

    info!(
        lobby = %config.rooms.lobby_channel_name,
        prefix = %config.rooms.command_prefix,
        "connecting to discord"
    );
    client.start().await?;
    info!("discord client stopped");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn refuses_to_start_without_token() {
        let err = start(&TempVoiceConfig::default()).await.unwrap_err();
        assert!(err.to_string().contains("DISCORD_TOKEN"));
    }
}
