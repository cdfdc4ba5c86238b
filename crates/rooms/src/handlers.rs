//! Owner commands sent as chat messages.

use tracing::{debug, error, info, warn};

use tempvoice_common::{ChannelId, GuildId};

#[cfg(feature = "metrics")]
use tempvoice_metrics::{commands as command_metrics, counter, labels};

use crate::{
    commands::{self, Command},
    error::{Context, Result},
    messages,
    platform::{CommandMessage, MemberInfo, VoicePlatform},
    resolver::resolve_member,
    service::RoomService,
};

/// Audit-log reason when a rejected member is kicked out of the room.
pub const REJECT_DISCONNECT_REASON: &str = "Rejected from voice channel";

/// Where a command runs: the invoking owner and their room.
struct Invocation<'a> {
    guild_id: GuildId,
    channel_id: ChannelId,
    owner: &'a MemberInfo,
}

impl RoomService {
    /// Handle one chat message. Messages without the command prefix, from
    /// bots, or outside a guild are ignored.
    pub async fn handle_message(&self, platform: &dyn VoicePlatform, msg: CommandMessage) {
        if msg.author_is_bot {
            return;
        }
        let Some(guild_id) = msg.guild_id else {
            return;
        };
        let Some(command) = commands::parse(&msg.content, &self.config().command_prefix) else {
            return;
        };

        let reply = match self.check_preconditions(&msg.author) {
            Err(refusal) => {
                #[cfg(feature = "metrics")]
                counter!(command_metrics::REFUSED_TOTAL).increment(1);
                debug!(user_id = %msg.author.id, reason = refusal, "command refused");
                refusal.to_string()
            },
            Ok(channel_id) => {
                let inv = Invocation {
                    guild_id,
                    channel_id,
                    owner: &msg.author,
                };
                self.dispatch(platform, &inv, command).await
            },
        };

        if let Err(e) = platform.reply(msg.reference, &reply).await {
            warn!(
                channel_id = %msg.reference.channel_id,
                error = %e,
                "failed to send command reply"
            );
        }
    }

    /// The author must be in a tracked room that they own. Returns the room,
    /// or the refusal text.
    fn check_preconditions(
        &self,
        author: &MemberInfo,
    ) -> std::result::Result<ChannelId, &'static str> {
        let channel_id = author.voice_channel.ok_or(messages::NOT_IN_VOICE)?;
        let record = self
            .registry()
            .get(channel_id)
            .ok_or(messages::NOT_TEMP_CHANNEL)?;
        if !record.is_owner(author.id) {
            return Err(messages::NOT_OWNER);
        }
        Ok(channel_id)
    }

    async fn dispatch(
        &self,
        platform: &dyn VoicePlatform,
        inv: &Invocation<'_>,
        command: Command<'_>,
    ) -> String {
        let Some(kind) = command.kind() else {
            return messages::UNKNOWN_COMMAND.to_string();
        };

        let result = match command {
            Command::Lock => self.lock(inv),
            Command::Reject { target: Some(t) } => self.reject(platform, inv, t).await,
            Command::Permit { target: Some(t) } => self.permit(platform, inv, t).await,
            Command::Transfer { target: Some(t) } => self.transfer(platform, inv, t).await,
            Command::Reject { target: None }
            | Command::Permit { target: None }
            | Command::Transfer { target: None } => {
                return messages::usage(
                    &self.config().command_prefix,
                    kind.name(),
                    kind.target_purpose(),
                );
            },
            Command::Unknown { .. } => return messages::UNKNOWN_COMMAND.to_string(),
        };

        match result {
            Ok(reply) => {
                #[cfg(feature = "metrics")]
                counter!(command_metrics::EXECUTED_TOTAL, labels::COMMAND => kind.name())
                    .increment(1);
                reply
            },
            Err(e) => {
                #[cfg(feature = "metrics")]
                counter!(command_metrics::FAILED_TOTAL, labels::COMMAND => kind.name())
                    .increment(1);
                error!(
                    command = %kind,
                    channel_id = %inv.channel_id,
                    error = %e,
                    "error in room command"
                );
                kind.failure_reply().to_string()
            },
        }
    }

    fn lock(&self, inv: &Invocation<'_>) -> Result<String> {
        let locked = self
            .registry()
            .update(inv.channel_id, |r| r.toggle_lock())
            .context("room is no longer tracked")?;
        info!(channel_id = %inv.channel_id, locked, "room lock toggled");
        Ok(if locked {
            messages::LOCKED
        } else {
            messages::UNLOCKED
        }
        .to_string())
    }

    async fn reject(
        &self,
        platform: &dyn VoicePlatform,
        inv: &Invocation<'_>,
        token: &str,
    ) -> Result<String> {
        let Some(target) = resolve_member(platform, inv.guild_id, token).await? else {
            return Ok(messages::USER_NOT_FOUND.to_string());
        };
        if target.id == inv.owner.id {
            return Ok(messages::CANNOT_REJECT_SELF.to_string());
        }

        self.registry()
            .update(inv.channel_id, |r| r.reject(target.id))
            .context("room is no longer tracked")?;

        if target.is_in(inv.channel_id) {
            platform
                .disconnect_member(inv.guild_id, target.id, REJECT_DISCONNECT_REASON)
                .await?;
        }

        info!(channel_id = %inv.channel_id, user_id = %target.id, "member rejected from room");
        Ok(messages::rejected(&target.display_name))
    }

    async fn permit(
        &self,
        platform: &dyn VoicePlatform,
        inv: &Invocation<'_>,
        token: &str,
    ) -> Result<String> {
        let Some(target) = resolve_member(platform, inv.guild_id, token).await? else {
            return Ok(messages::USER_NOT_FOUND.to_string());
        };

        self.registry()
            .update(inv.channel_id, |r| r.permit(target.id))
            .context("room is no longer tracked")?;

        info!(channel_id = %inv.channel_id, user_id = %target.id, "member permitted into room");
        Ok(messages::permitted(&target.display_name))
    }

    /// Hand the room to another member who is in it. Steps are not rolled
    /// back: a failure after the owner change leaves the new owner recorded.
    async fn transfer(
        &self,
        platform: &dyn VoicePlatform,
        inv: &Invocation<'_>,
        token: &str,
    ) -> Result<String> {
        let Some(target) = resolve_member(platform, inv.guild_id, token).await? else {
            return Ok(messages::USER_NOT_FOUND.to_string());
        };
        if target.id == inv.owner.id {
            return Ok(messages::CANNOT_TRANSFER_TO_SELF.to_string());
        }
        if !target.is_in(inv.channel_id) {
            return Ok(messages::TARGET_NOT_IN_CHANNEL.to_string());
        }

        self.registry()
            .update(inv.channel_id, |r| r.owner_id = target.id)
            .context("room is no longer tracked")?;

        platform
            .revoke_owner_permissions(inv.channel_id, inv.owner.id)
            .await?;
        platform
            .grant_owner_permissions(inv.channel_id, target.id)
            .await?;
        platform
            .rename_channel(
                inv.channel_id,
                &self.config().channel_name_for(&target.display_name),
            )
            .await?;

        info!(
            channel_id = %inv.channel_id,
            from = %inv.owner.id,
            to = %target.id,
            "room ownership transferred"
        );
        Ok(messages::transferred(&target.display_name))
    }
}
