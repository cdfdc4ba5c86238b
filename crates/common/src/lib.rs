//! Shared types and error definitions used across all tempvoice crates.

pub mod error;
pub mod types;

pub use {
    error::{Error, FromMessage, Result},
    types::{ChannelId, GuildId, MessageId, UserId},
};
