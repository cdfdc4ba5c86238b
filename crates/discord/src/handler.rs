//! Discord event handler for serenity.
//!
//! Turns gateway events into room events and hands them to the
//! [`RoomService`].

use std::{collections::HashMap, sync::Arc};

use {
    serenity::{
        all::{
            Cache, ChannelId, Context, EventHandler, GatewayIntents, GuildChannel, GuildId,
            Member, Message, Ready, UserId, VoiceState,
        },
        async_trait,
    },
    tracing::{debug, info},
};

use tempvoice_rooms::{
    CommandMessage, MemberInfo, MessageRef, RoomService, VoiceChannelInfo, VoiceChannelPresence,
    VoiceStateChange,
};

use crate::{
    convert::{
        channel_info, count_in_channel, display_name, from_channel, from_guild, from_message,
        from_user, member_info,
    },
    platform::SerenityPlatform,
};

/// Handler for Discord gateway events.
pub struct TempVoiceHandler {
    service: Arc<RoomService>,
}

impl TempVoiceHandler {
    pub fn new(service: Arc<RoomService>) -> Self {
        Self { service }
    }

    /// Required gateway intents for the bot.
    ///
    /// Voice states drive the room lifecycle, message content carries the
    /// commands, and the member intent lets name lookups list the guild.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_VOICE_STATES
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
            | GatewayIntents::GUILD_MEMBERS
    }
}

/// Build a [`VoiceStateChange`] from the gateway event and the (already
/// updated) cache. Returns `None` for events outside a cached guild.
fn voice_change(
    cache: &Cache,
    old: Option<&VoiceState>,
    new: &VoiceState,
) -> Option<VoiceStateChange> {
    let guild_id = new.guild_id?;
    let guild = cache.guild(guild_id)?;
    let member = new
        .member
        .as_ref()
        .or_else(|| guild.members.get(&new.user_id));

    Some(translate_voice_state(
        guild_id,
        &guild.channels,
        guild.voice_states.values().map(|vs| vs.channel_id.as_ref()),
        member,
        new.user_id,
        old.and_then(|o| o.channel_id),
        new.channel_id,
    ))
}

/// `occupied` holds the channel of every voice state in the guild after the
/// update, so the count for the old channel excludes the member who left.
fn translate_voice_state<'a>(
    guild_id: GuildId,
    channels: &HashMap<ChannelId, GuildChannel>,
    occupied: impl IntoIterator<Item = Option<&'a ChannelId>>,
    member: Option<&Member>,
    user_id: UserId,
    old_channel: Option<ChannelId>,
    new_channel: Option<ChannelId>,
) -> VoiceStateChange {
    let describe = |id: ChannelId| {
        channels
            .get(&id)
            .map(channel_info)
            .unwrap_or_else(|| VoiceChannelInfo {
                id: from_channel(id),
                name: String::new(),
                parent_id: None,
            })
    };

    let old = old_channel.map(|id| VoiceChannelPresence {
        channel: describe(id),
        remaining_members: count_in_channel(occupied, id),
    });

    let voice = new_channel.map(from_channel);
    let member = member
        .map(|m| member_info(m, voice))
        .unwrap_or_else(|| MemberInfo {
            id: from_user(user_id),
            username: user_id.to_string(),
            display_name: user_id.to_string(),
            voice_channel: voice,
        });

    VoiceStateChange {
        guild_id: from_guild(guild_id),
        member,
        old,
        new: new_channel.map(describe),
    }
}

fn command_message(platform: &SerenityPlatform, msg: &Message) -> CommandMessage {
    let guild_id = msg.guild_id.map(from_guild);
    let author_id = from_user(msg.author.id);
    let nick = msg.member.as_ref().and_then(|m| m.nick.as_deref());

    CommandMessage {
        guild_id,
        reference: MessageRef {
            channel_id: from_channel(msg.channel_id),
            message_id: from_message(msg.id),
        },
        author: MemberInfo {
            id: author_id,
            username: msg.author.name.clone(),
            display_name: display_name(nick, msg.author.global_name.as_deref(), &msg.author.name),
            voice_channel: guild_id.and_then(|g| platform.cached_voice_channel(g, author_id)),
        },
        author_is_bot: msg.author.bot,
        content: msg.content.clone(),
    }
}

#[async_trait]
impl EventHandler for TempVoiceHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            bot_name = %ready.user.name,
            guilds = ready.guilds.len(),
            lobby = %self.service.config().lobby_channel_name,
            "discord bot ready"
        );
    }

    async fn cache_ready(&self, _ctx: Context, guilds: Vec<GuildId>) {
        debug!(guild_count = guilds.len(), "discord cache ready");
    }

    async fn voice_state_update(&self, ctx: Context, old: Option<VoiceState>, new: VoiceState) {
        let Some(change) = voice_change(&ctx.cache, old.as_ref(), &new) else {
            debug!(user_id = %new.user_id, "voice state outside a cached guild");
            return;
        };
        let platform = SerenityPlatform::new(Arc::clone(&ctx.http), Arc::clone(&ctx.cache));
        self.service.handle_voice_state(&platform, change).await;
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Skip bot messages to prevent loops
        if msg.author.bot {
            return;
        }
        let platform = SerenityPlatform::new(Arc::clone(&ctx.http), Arc::clone(&ctx.cache));
        let command = command_message(&platform, &msg);
        self.service.handle_message(&platform, command).await;
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        serenity::all::User,
        tempvoice_common::{ChannelId as RoomChannelId, UserId as RoomUserId},
    };

    const GUILD: GuildId = GuildId::new(1);
    const USER: UserId = UserId::new(10);

    fn voice(id: u64, name: &str, parent: Option<u64>) -> (ChannelId, GuildChannel) {
        let mut channel = GuildChannel::default();
        channel.id = ChannelId::new(id);
        channel.name = name.into();
        channel.parent_id = parent.map(ChannelId::new);
        (channel.id, channel)
    }

    fn channels() -> HashMap<ChannelId, GuildChannel> {
        HashMap::from([
            voice(2, "Join to Create", Some(100)),
            voice(3, "Alice's Channel", Some(100)),
        ])
    }

    fn alice() -> Member {
        let mut user = User::default();
        user.id = USER;
        user.name = "alice".into();
        user.global_name = Some("Alice".into());
        let mut member = Member::default();
        member.user = user;
        member
    }

    fn ch(id: u64) -> ChannelId {
        ChannelId::new(id)
    }

    #[test]
    fn join_describes_arrival() {
        let change = translate_voice_state(
            GUILD,
            &channels(),
            [Some(&ch(2))],
            Some(&alice()),
            USER,
            None,
            Some(ch(2)),
        );
        assert!(change.old.is_none());
        let arrival = change.arrival().unwrap();
        assert_eq!(arrival.id, RoomChannelId(2));
        assert_eq!(arrival.name, "Join to Create");
        assert_eq!(arrival.parent_id, Some(RoomChannelId(100)));
        assert_eq!(change.member.display_name, "Alice");
        assert_eq!(change.member.voice_channel, Some(RoomChannelId(2)));
    }

    #[test]
    fn leave_counts_who_is_still_there() {
        let others = [ch(3), ch(3), ch(2)];
        let change = translate_voice_state(
            GUILD,
            &channels(),
            others.iter().map(Some),
            Some(&alice()),
            USER,
            Some(ch(3)),
            None,
        );
        let departed = change.departure().unwrap();
        assert_eq!(departed.channel.id, RoomChannelId(3));
        assert_eq!(departed.remaining_members, 2);
        assert!(change.arrival().is_none());
        assert_eq!(change.member.voice_channel, None);
    }

    #[test]
    fn last_member_leaving_leaves_zero() {
        let change = translate_voice_state(
            GUILD,
            &channels(),
            [None, Some(&ch(2))],
            Some(&alice()),
            USER,
            Some(ch(3)),
            None,
        );
        assert_eq!(change.departure().unwrap().remaining_members, 0);
    }

    #[test]
    fn switch_has_both_sides() {
        let occupied = ch(3);
        let change = translate_voice_state(
            GUILD,
            &channels(),
            [Some(&occupied)],
            Some(&alice()),
            USER,
            Some(ch(3)),
            Some(ch(2)),
        );
        let departed = change.departure().unwrap();
        assert_eq!(departed.channel.id, RoomChannelId(3));
        assert_eq!(departed.remaining_members, 1);
        assert_eq!(change.arrival().map(|c| c.id), Some(RoomChannelId(2)));
    }

    #[test]
    fn same_channel_is_neither_arrival_nor_departure() {
        let occupied = ch(3);
        let change = translate_voice_state(
            GUILD,
            &channels(),
            [Some(&occupied)],
            Some(&alice()),
            USER,
            Some(ch(3)),
            Some(ch(3)),
        );
        assert!(change.arrival().is_none());
        assert!(change.departure().is_none());
    }

    #[test]
    fn uncached_member_and_channel_fall_back() {
        let change = translate_voice_state(
            GUILD,
            &HashMap::new(),
            Vec::<Option<&ChannelId>>::new(),
            None,
            USER,
            None,
            Some(ch(7)),
        );
        assert_eq!(change.member.id, RoomUserId(10));
        assert_eq!(change.member.username, "10");
        assert_eq!(change.member.display_name, "10");
        assert_eq!(change.member.voice_channel, Some(RoomChannelId(7)));
        let arrival = change.arrival().unwrap();
        assert_eq!(arrival.id, RoomChannelId(7));
        assert!(arrival.name.is_empty());
        assert_eq!(arrival.parent_id, None);
    }

    #[test]
    fn intents_cover_voice_and_commands() {
        let intents = TempVoiceHandler::intents();
        assert!(intents.contains(GatewayIntents::GUILD_VOICE_STATES));
        assert!(intents.contains(GatewayIntents::MESSAGE_CONTENT));
        assert!(intents.contains(GatewayIntents::GUILD_MEMBERS));
        assert!(!intents.contains(GatewayIntents::DIRECT_MESSAGES));
    }
}
