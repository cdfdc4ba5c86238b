//! Mapping between serenity models and room types.

use serenity::all::{
    self as serenity_model, GuildChannel, Member, PermissionOverwrite, PermissionOverwriteType,
    Permissions,
};

use {
    tempvoice_common::{ChannelId, GuildId, MessageId, UserId},
    tempvoice_rooms::{MemberInfo, OWNER_PERMISSIONS, OwnerPermission, VoiceChannelInfo},
};

// Discord never hands out a zero snowflake, so ids that came from the gateway
// are always valid for serenity's non-zero constructors.

pub(crate) fn to_channel(id: ChannelId) -> serenity_model::ChannelId {
    serenity_model::ChannelId::new(id.get())
}

pub(crate) fn to_guild(id: GuildId) -> serenity_model::GuildId {
    serenity_model::GuildId::new(id.get())
}

pub(crate) fn to_user(id: UserId) -> serenity_model::UserId {
    serenity_model::UserId::new(id.get())
}

pub(crate) fn to_message(id: MessageId) -> serenity_model::MessageId {
    serenity_model::MessageId::new(id.get())
}

pub(crate) fn from_channel(id: serenity_model::ChannelId) -> ChannelId {
    ChannelId(id.get())
}

pub(crate) fn from_guild(id: serenity_model::GuildId) -> GuildId {
    GuildId(id.get())
}

pub(crate) fn from_user(id: serenity_model::UserId) -> UserId {
    UserId(id.get())
}

pub(crate) fn from_message(id: serenity_model::MessageId) -> MessageId {
    MessageId(id.get())
}

fn permission(p: OwnerPermission) -> Permissions {
    match p {
        OwnerPermission::ManageChannel => Permissions::MANAGE_CHANNELS,
        OwnerPermission::MoveMembers => Permissions::MOVE_MEMBERS,
        OwnerPermission::MuteMembers => Permissions::MUTE_MEMBERS,
        OwnerPermission::DeafenMembers => Permissions::DEAFEN_MEMBERS,
    }
}

/// The owner bundle as a serenity bitset.
pub(crate) fn owner_permissions() -> Permissions {
    OWNER_PERMISSIONS
        .into_iter()
        .fold(Permissions::empty(), |acc, p| acc | permission(p))
}

/// Member overwrite granting the owner bundle.
pub(crate) fn owner_overwrite(user_id: UserId) -> PermissionOverwrite {
    PermissionOverwrite {
        allow: owner_permissions(),
        deny: Permissions::empty(),
        kind: PermissionOverwriteType::Member(to_user(user_id)),
    }
}

/// Guild nickname, then global name, then account name.
pub(crate) fn display_name(
    nick: Option<&str>,
    global_name: Option<&str>,
    username: &str,
) -> String {
    nick.or(global_name).unwrap_or(username).to_string()
}

pub(crate) fn member_info(member: &Member, voice_channel: Option<ChannelId>) -> MemberInfo {
    MemberInfo {
        id: from_user(member.user.id),
        username: member.user.name.clone(),
        display_name: display_name(
            member.nick.as_deref(),
            member.user.global_name.as_deref(),
            &member.user.name,
        ),
        voice_channel,
    }
}

pub(crate) fn channel_info(channel: &GuildChannel) -> VoiceChannelInfo {
    VoiceChannelInfo {
        id: from_channel(channel.id),
        name: channel.name.clone(),
        parent_id: channel.parent_id.map(from_channel),
    }
}

/// Members whose voice state points at `channel`.
pub(crate) fn count_in_channel<'a>(
    states: impl IntoIterator<Item = Option<&'a serenity_model::ChannelId>>,
    channel: serenity_model::ChannelId,
) -> usize {
    states
        .into_iter()
        .filter(|c| *c == Some(&channel))
        .count()
}
