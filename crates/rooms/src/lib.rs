//! Temporary voice rooms.
//!
//! A member who joins the lobby channel gets a personal voice room that they
//! own. The owner controls it with chat commands (`lock`, `reject`, `permit`,
//! `transfer`); the room is deleted as soon as it empties.
//!
//! Everything here is platform-agnostic. Platform calls go through the
//! [`VoicePlatform`] capability trait and inbound events arrive as the narrow
//! types in [`platform`], so the Discord adapter only translates.

pub mod access;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod messages;
pub mod platform;
pub mod registry;
pub mod resolver;
pub mod service;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod testing;

pub use {
    access::{Admission, DenyReason},
    commands::{Command, CommandKind},
    error::{Error, Result},
    platform::{
        CommandMessage, MemberInfo, MessageRef, NewVoiceChannel, OWNER_PERMISSIONS,
        OwnerPermission, VoiceChannelInfo, VoiceChannelPresence, VoicePlatform, VoiceStateChange,
    },
    registry::{ChannelRegistry, TempChannelRecord},
    service::RoomService,
};
