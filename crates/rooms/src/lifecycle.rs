//! Room creation and cleanup.

use tracing::{error, info, warn};

use tempvoice_common::{ChannelId, GuildId};

#[cfg(feature = "metrics")]
use tempvoice_metrics::{counter, rooms as room_metrics};

use crate::{
    platform::{MemberInfo, NewVoiceChannel, VoiceChannelInfo, VoicePlatform},
    registry::TempChannelRecord,
    service::RoomService,
};

/// Audit-log reason for deleting an empty room.
pub const CLEANUP_REASON: &str = "Temporary channel cleanup";

impl RoomService {
    /// Create a room for `member` next to `lobby` and move them into it.
    ///
    /// Returns the new channel id, or `None` if creation failed (the member
    /// stays in the lobby). A failed move leaves the room tracked.
    pub async fn on_user_entered_lobby(
        &self,
        platform: &dyn VoicePlatform,
        guild_id: GuildId,
        member: &MemberInfo,
        lobby: &VoiceChannelInfo,
    ) -> Option<ChannelId> {
        let request = NewVoiceChannel {
            name: self.config().channel_name_for(&member.display_name),
            parent_id: lobby.parent_id,
            owner: member.id,
        };

        let channel = match platform.create_voice_channel(guild_id, request).await {
            Ok(channel) => channel,
            Err(e) => {
                #[cfg(feature = "metrics")]
                counter!(room_metrics::CREATE_ERRORS_TOTAL).increment(1);
                error!(
                    %guild_id,
                    user_id = %member.id,
                    error = %e,
                    "error creating temp channel"
                );
                return None;
            },
        };

        self.registry()
            .insert(channel.id, TempChannelRecord::new(guild_id, member.id));

        #[cfg(feature = "metrics")]
        counter!(room_metrics::CREATED_TOTAL).increment(1);

        if let Err(e) = platform.move_member(guild_id, member.id, channel.id).await {
            warn!(
                channel_id = %channel.id,
                user_id = %member.id,
                error = %e,
                "created temp channel but could not move its owner"
            );
        }

        info!(
            channel_id = %channel.id,
            channel_name = %channel.name,
            owner = %member.display_name,
            "created temp channel"
        );
        Some(channel.id)
    }

    /// Delete an empty room and forget it.
    ///
    /// The record is dropped even when the delete call fails, so a failed
    /// delete leaves an untracked channel behind rather than a stale record.
    pub async fn on_temp_channel_emptied(
        &self,
        platform: &dyn VoicePlatform,
        channel_id: ChannelId,
    ) {
        let result = platform.delete_channel(channel_id, CLEANUP_REASON).await;
        let record = self.registry().remove(channel_id);

        match result {
            Ok(()) => {
                #[cfg(feature = "metrics")]
                counter!(room_metrics::DELETED_TOTAL).increment(1);
                info!(
                    %channel_id,
                    lifetime_secs = record.map(|r| r.created_at.elapsed().as_secs()),
                    "deleted empty temp channel"
                );
            },
            Err(e) => {
                #[cfg(feature = "metrics")]
                counter!(room_metrics::DELETE_ERRORS_TOTAL).increment(1);
                error!(%channel_id, error = %e, "error deleting temp channel");
            },
        }
    }
}
