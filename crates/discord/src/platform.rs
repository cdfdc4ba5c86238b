//! [`VoicePlatform`] over serenity's HTTP client and cache.

use std::sync::Arc;

use {
    async_trait::async_trait,
    serenity::all::{
        self as serenity_model, Cache, ChannelType, CreateChannel, CreateMessage, EditChannel,
        EditMember, Http, PermissionOverwriteType,
    },
    tracing::debug,
};

use {
    tempvoice_common::{ChannelId, GuildId, UserId},
    tempvoice_rooms::{
        Error, MemberInfo, MessageRef, NewVoiceChannel, Result, VoiceChannelInfo, VoicePlatform,
    },
};

use crate::convert::{
    from_channel, from_user, member_info, owner_overwrite, to_channel, to_guild, to_message,
    to_user,
};

/// Page size for guild member listing (the API maximum).
const MEMBER_PAGE_SIZE: u64 = 1000;

/// Audit-log reason attached to room creation.
const CREATE_REASON: &str = "Temporary voice channel";

/// Serenity-backed platform handle. Cheap to clone; built per event from the
/// gateway context.
#[derive(Clone)]
pub struct SerenityPlatform {
    http: Arc<Http>,
    cache: Arc<Cache>,
}

impl SerenityPlatform {
    pub fn new(http: Arc<Http>, cache: Arc<Cache>) -> Self {
        Self { http, cache }
    }

    /// Voice channel `user_id` is connected to, from the gateway cache.
    pub fn cached_voice_channel(&self, guild_id: GuildId, user_id: UserId) -> Option<ChannelId> {
        let guild = self.cache.guild(to_guild(guild_id))?;
        guild
            .voice_states
            .get(&to_user(user_id))
            .and_then(|state| state.channel_id)
            .map(from_channel)
    }

    fn voice_channels(&self, guild_id: GuildId) -> Vec<(UserId, ChannelId)> {
        let Some(guild) = self.cache.guild(to_guild(guild_id)) else {
            return Vec::new();
        };
        guild
            .voice_states
            .iter()
            .filter_map(|(user, state)| {
                state
                    .channel_id
                    .map(|c| (from_user(*user), from_channel(c)))
            })
            .collect()
    }
}

#[async_trait]
impl VoicePlatform for SerenityPlatform {
    async fn create_voice_channel(
        &self,
        guild_id: GuildId,
        request: NewVoiceChannel,
    ) -> Result<VoiceChannelInfo> {
        let mut builder = CreateChannel::new(request.name.as_str())
            .kind(ChannelType::Voice)
            .permissions(vec![owner_overwrite(request.owner)])
            .audit_log_reason(CREATE_REASON);
        if let Some(parent) = request.parent_id {
            builder = builder.category(to_channel(parent));
        }

        let channel = to_guild(guild_id)
            .create_channel(&*self.http, builder)
            .await
            .map_err(|e| Error::platform("create voice channel", e))?;

        Ok(VoiceChannelInfo {
            id: from_channel(channel.id),
            name: channel.name,
            parent_id: channel.parent_id.map(from_channel),
        })
    }

    async fn delete_channel(&self, channel_id: ChannelId, reason: &str) -> Result<()> {
        self.http
            .delete_channel(to_channel(channel_id), Some(reason))
            .await
            .map_err(|e| Error::platform("delete channel", e))?;
        Ok(())
    }

    async fn move_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> Result<()> {
        to_guild(guild_id)
            .move_member(&*self.http, to_user(user_id), to_channel(channel_id))
            .await
            .map_err(|e| Error::platform("move member", e))?;
        Ok(())
    }

    async fn disconnect_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> Result<()> {
        let builder = EditMember::new()
            .disconnect_member()
            .audit_log_reason(reason);
        to_guild(guild_id)
            .edit_member(&*self.http, to_user(user_id), builder)
            .await
            .map_err(|e| Error::platform("disconnect member", e))?;
        Ok(())
    }

    async fn notify(&self, user_id: UserId, text: &str) {
        let builder = CreateMessage::new().content(text);
        if let Err(e) = to_user(user_id).direct_message(&*self.http, builder).await {
            debug!(%user_id, error = %e, "could not send direct message");
        }
    }

    async fn grant_owner_permissions(&self, channel_id: ChannelId, user_id: UserId) -> Result<()> {
        to_channel(channel_id)
            .create_permission(&*self.http, owner_overwrite(user_id))
            .await
            .map_err(|e| Error::platform("grant owner permissions", e))
    }

    async fn revoke_owner_permissions(
        &self,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Result<()> {
        to_channel(channel_id)
            .delete_permission(
                &*self.http,
                PermissionOverwriteType::Member(to_user(user_id)),
            )
            .await
            .map_err(|e| Error::platform("revoke owner permissions", e))
    }

    async fn rename_channel(&self, channel_id: ChannelId, name: &str) -> Result<()> {
        to_channel(channel_id)
            .edit(&*self.http, EditChannel::new().name(name))
            .await
            .map_err(|e| Error::platform("rename channel", e))?;
        Ok(())
    }

    async fn fetch_member(&self, guild_id: GuildId, user_id: UserId) -> Result<MemberInfo> {
        if user_id.get() == 0 {
            return Err(Error::message("user id 0 is not a valid snowflake"));
        }
        let member = to_guild(guild_id)
            .member(&*self.http, to_user(user_id))
            .await
            .map_err(|e| Error::platform("fetch member", e))?;
        let voice = self.cached_voice_channel(guild_id, user_id);
        Ok(member_info(&member, voice))
    }

    async fn fetch_members(&self, guild_id: GuildId) -> Result<Vec<MemberInfo>> {
        let guild = to_guild(guild_id);
        let voice = self.voice_channels(guild_id);
        let voice_of = |id: UserId| voice.iter().find(|(u, _)| *u == id).map(|(_, c)| *c);

        let mut out = Vec::new();
        let mut after: Option<serenity_model::UserId> = None;
        loop {
            let page = guild
                .members(&*self.http, Some(MEMBER_PAGE_SIZE), after)
                .await
                .map_err(|e| Error::platform("list guild members", e))?;
            let Some(last) = page.last() else {
                break;
            };
            after = Some(last.user.id);
            let full_page = page.len() as u64 == MEMBER_PAGE_SIZE;

            out.extend(page.iter().map(|m| {
                member_info(m, voice_of(from_user(m.user.id)))
            }));

            if !full_page {
                break;
            }
        }

        debug!(%guild_id, count = out.len(), "fetched guild members");
        Ok(out)
    }

    async fn reply(&self, to: MessageRef, text: &str) -> Result<()> {
        let channel = to_channel(to.channel_id);
        let builder = CreateMessage::new()
            .content(text)
            .reference_message((channel, to_message(to.message_id)));
        channel
            .send_message(&*self.http, builder)
            .await
            .map_err(|e| Error::platform("send reply", e))?;
        Ok(())
    }
}
