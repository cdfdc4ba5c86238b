//! Discord adapter for temporary voice rooms.
//!
//! Runs a serenity gateway client, translates voice-state and message events
//! into [`tempvoice_rooms`] types, and implements
//! [`VoicePlatform`](tempvoice_rooms::VoicePlatform) on top of the REST client
//! and the gateway cache.

pub mod bot;
mod convert;
pub mod error;
pub mod handler;
pub mod platform;

pub use {
    bot::start,
    error::{Error, Result},
    handler::TempVoiceHandler,
    platform::SerenityPlatform,
};
