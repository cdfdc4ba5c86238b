//! The slice of the chat platform that rooms depend on.
//!
//! Inbound events are reduced to the few fields the room logic reads; the
//! outbound side is the [`VoicePlatform`] capability trait.

use async_trait::async_trait;

use tempvoice_common::{ChannelId, GuildId, MessageId, UserId};

use crate::error::Result;

/// A guild member as seen by the room logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    pub id: UserId,
    /// Account name, unique per platform.
    pub username: String,
    /// Guild nickname, falling back to the global/account name.
    pub display_name: String,
    /// Voice channel the member is connected to right now, if any.
    pub voice_channel: Option<ChannelId>,
}

impl MemberInfo {
    /// True if `query` names this member (case-insensitive, username or
    /// display name).
    #[must_use]
    pub fn answers_to(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.username.to_lowercase() == query || self.display_name.to_lowercase() == query
    }

    #[must_use]
    pub fn is_in(&self, channel: ChannelId) -> bool {
        self.voice_channel == Some(channel)
    }
}

/// A guild voice channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceChannelInfo {
    pub id: ChannelId,
    pub name: String,
    /// Category the channel sits in.
    pub parent_id: Option<ChannelId>,
}

/// A channel a member just left, with how many members are still connected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceChannelPresence {
    pub channel: VoiceChannelInfo,
    pub remaining_members: usize,
}

/// One voice-state transition for a member.
#[derive(Debug, Clone)]
pub struct VoiceStateChange {
    pub guild_id: GuildId,
    pub member: MemberInfo,
    /// Channel before the transition.
    pub old: Option<VoiceChannelPresence>,
    /// Channel after the transition.
    pub new: Option<VoiceChannelInfo>,
}

/// What kind of move a [`VoiceStateChange`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<'a> {
    Joined(&'a VoiceChannelInfo),
    Left(&'a VoiceChannelPresence),
    Switched {
        from: &'a VoiceChannelPresence,
        to: &'a VoiceChannelInfo,
    },
    /// Same channel before and after (mute, deafen, stream toggles) or no
    /// channel at all.
    Unchanged,
}

impl VoiceStateChange {
    #[must_use]
    pub fn transition(&self) -> Transition<'_> {
        match (&self.old, &self.new) {
            (None, Some(to)) => Transition::Joined(to),
            (Some(from), None) => Transition::Left(from),
            (Some(from), Some(to)) if from.channel.id != to.id => Transition::Switched { from, to },
            _ => Transition::Unchanged,
        }
    }

    /// Channel the member arrived in, for joins and switches.
    #[must_use]
    pub fn arrival(&self) -> Option<&VoiceChannelInfo> {
        match self.transition() {
            Transition::Joined(to) | Transition::Switched { to, .. } => Some(to),
            _ => None,
        }
    }

    /// Channel the member departed, for leaves and switches.
    #[must_use]
    pub fn departure(&self) -> Option<&VoiceChannelPresence> {
        match self.transition() {
            Transition::Left(from) | Transition::Switched { from, .. } => Some(from),
            _ => None,
        }
    }
}

/// Where a chat message lives, for replying to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
}

/// An inbound chat message that may carry a room command.
#[derive(Debug, Clone)]
pub struct CommandMessage {
    /// `None` for direct messages.
    pub guild_id: Option<GuildId>,
    pub reference: MessageRef,
    pub author: MemberInfo,
    pub author_is_bot: bool,
    pub content: String,
}

/// Permissions the room owner holds on their room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnerPermission {
    ManageChannel,
    MoveMembers,
    MuteMembers,
    DeafenMembers,
}

/// The full bundle granted to an owner and revoked on transfer.
pub const OWNER_PERMISSIONS: [OwnerPermission; 4] = [
    OwnerPermission::ManageChannel,
    OwnerPermission::MoveMembers,
    OwnerPermission::MuteMembers,
    OwnerPermission::DeafenMembers,
];

/// Request to create a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVoiceChannel {
    pub name: String,
    /// Category to create the channel in (the lobby's).
    pub parent_id: Option<ChannelId>,
    /// Member receiving [`OWNER_PERMISSIONS`] on the new channel.
    pub owner: UserId,
}

/// Outbound platform operations.
///
/// Every method maps to a single platform request; implementations do not
/// retry.
#[async_trait]
pub trait VoicePlatform: Send + Sync {
    async fn create_voice_channel(
        &self,
        guild_id: GuildId,
        request: NewVoiceChannel,
    ) -> Result<VoiceChannelInfo>;

    async fn delete_channel(&self, channel_id: ChannelId, reason: &str) -> Result<()>;

    async fn move_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> Result<()>;

    async fn disconnect_member(&self, guild_id: GuildId, user_id: UserId, reason: &str)
    -> Result<()>;

    /// Send a direct message, ignoring the outcome.
    ///
    /// Members may block DMs from the bot; implementations log the failure
    /// and return normally.
    async fn notify(&self, user_id: UserId, text: &str);

    async fn grant_owner_permissions(&self, channel_id: ChannelId, user_id: UserId) -> Result<()>;

    async fn revoke_owner_permissions(&self, channel_id: ChannelId, user_id: UserId)
    -> Result<()>;

    async fn rename_channel(&self, channel_id: ChannelId, name: &str) -> Result<()>;

    async fn fetch_member(&self, guild_id: GuildId, user_id: UserId) -> Result<MemberInfo>;

    /// Every member of the guild. Potentially slow on large guilds.
    async fn fetch_members(&self, guild_id: GuildId) -> Result<Vec<MemberInfo>>;

    async fn reply(&self, to: MessageRef, text: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(id: u64) -> VoiceChannelInfo {
        VoiceChannelInfo {
            id: ChannelId(id),
            name: format!("vc-{id}"),
            parent_id: None,
        }
    }

    fn presence(id: u64) -> VoiceChannelPresence {
        VoiceChannelPresence {
            channel: channel(id),
            remaining_members: 0,
        }
    }

    fn change(old: Option<u64>, new: Option<u64>) -> VoiceStateChange {
        VoiceStateChange {
            guild_id: GuildId(1),
            member: MemberInfo {
                id: UserId(7),
                username: "alice".into(),
                display_name: "Alice".into(),
                voice_channel: new.map(ChannelId),
            },
            old: old.map(presence),
            new: new.map(channel),
        }
    }

    #[test]
    fn classifies_transitions() {
        assert!(matches!(
            change(None, Some(2)).transition(),
            Transition::Joined(c) if c.id == ChannelId(2)
        ));
        assert!(matches!(
            change(Some(2), None).transition(),
            Transition::Left(p) if p.channel.id == ChannelId(2)
        ));
        assert!(matches!(
            change(Some(2), Some(3)).transition(),
            Transition::Switched { from, to }
                if from.channel.id == ChannelId(2) && to.id == ChannelId(3)
        ));
        assert_eq!(change(Some(2), Some(2)).transition(), Transition::Unchanged);
        assert_eq!(change(None, None).transition(), Transition::Unchanged);
    }

    #[test]
    fn switch_has_both_arrival_and_departure() {
        let c = change(Some(2), Some(3));
        assert_eq!(c.arrival().map(|c| c.id), Some(ChannelId(3)));
        assert_eq!(c.departure().map(|p| p.channel.id), Some(ChannelId(2)));

        let same = change(Some(2), Some(2));
        assert!(same.arrival().is_none());
        assert!(same.departure().is_none());
    }

    #[test]
    fn member_name_match_is_case_insensitive() {
        let m = MemberInfo {
            id: UserId(1),
            username: "bob_99".into(),
            display_name: "Bobby".into(),
            voice_channel: None,
        };
        assert!(m.answers_to("BOB_99"));
        assert!(m.answers_to("bobby"));
        assert!(!m.answers_to("bob"));
    }
}
