//! Entry points for platform events.

use std::sync::Arc;

use tracing::{debug, error};

use tempvoice_config::RoomsConfig;

use crate::{
    error::Result,
    platform::{VoiceChannelInfo, VoicePlatform, VoiceStateChange},
    registry::ChannelRegistry,
};

/// Room business logic.
///
/// Holds the room settings and the registry; the platform is passed per
/// event so the adapter can hand over whatever client the event came with.
pub struct RoomService {
    config: RoomsConfig,
    registry: Arc<ChannelRegistry>,
}

impl RoomService {
    pub fn new(config: RoomsConfig, registry: Arc<ChannelRegistry>) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &RoomsConfig {
        &self.config
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    #[must_use]
    pub fn is_lobby(&self, channel: &VoiceChannelInfo) -> bool {
        channel.name == self.config.lobby_channel_name
    }

    /// Handle one voice-state transition. Never fails; errors are logged.
    pub async fn handle_voice_state(&self, platform: &dyn VoicePlatform, change: VoiceStateChange) {
        if let Err(e) = self.process_voice_state(platform, &change).await {
            error!(
                guild_id = %change.guild_id,
                user_id = %change.member.id,
                error = %e,
                "error in voice state update"
            );
        }
    }

    async fn process_voice_state(
        &self,
        platform: &dyn VoicePlatform,
        change: &VoiceStateChange,
    ) -> Result<()> {
        debug!(
            guild_id = %change.guild_id,
            user_id = %change.member.id,
            transition = ?change.transition(),
            "voice state update"
        );

        if let Some(from) = change.departure()
            && from.remaining_members == 0
            && self.registry.contains(from.channel.id)
        {
            self.on_temp_channel_emptied(platform, from.channel.id)
                .await;
        }

        let Some(to) = change.arrival() else {
            return Ok(());
        };

        if self.is_lobby(to) {
            self.on_user_entered_lobby(platform, change.guild_id, &change.member, to)
                .await;
        } else if let Some(record) = self.registry.get(to.id) {
            self.enforce_access(platform, change.guild_id, &change.member, to.id, &record)
                .await?;
        }
        Ok(())
    }
}
