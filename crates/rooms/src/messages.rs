//! User-facing texts.

pub const NOT_IN_VOICE: &str = "❌ You need to be in a voice channel to use voice commands.";
pub const NOT_TEMP_CHANNEL: &str = "❌ This command can only be used in temporary voice channels.";
pub const NOT_OWNER: &str = "❌ Only the channel owner can use this command.";
pub const UNKNOWN_COMMAND: &str =
    "❌ Unknown command. Available commands: `reject`, `lock`, `permit`, `transfer`";

pub const USER_NOT_FOUND: &str = "❌ User not found.";
pub const CANNOT_REJECT_SELF: &str = "❌ You cannot reject yourself.";
pub const CANNOT_TRANSFER_TO_SELF: &str = "❌ You cannot transfer ownership to yourself.";
pub const TARGET_NOT_IN_CHANNEL: &str =
    "❌ The target user must be in the voice channel to receive ownership.";

pub const LOCKED: &str = "🔒 Channel has been locked. Only permitted users can join now.";
pub const UNLOCKED: &str = "🔓 Channel has been unlocked. Anyone can join now.";

pub const LOCKED_NOTICE: &str =
    "❌ That voice channel is locked. You need permission from the owner to join.";
pub const REJECTED_NOTICE: &str = "❌ You have been rejected from that voice channel.";

pub fn rejected(name: &str) -> String {
    format!("✅ {name} has been rejected from this channel.")
}

pub fn permitted(name: &str) -> String {
    format!("✅ {name} has been permitted to join this channel.")
}

pub fn transferred(name: &str) -> String {
    format!("✅ Channel ownership has been transferred to {name}.")
}

/// Reply for a targeted command sent without a target.
pub fn usage(prefix: &str, command: &str, purpose: &str) -> String {
    format!(
        "❌ Please specify a user to {purpose}. Usage: `{prefix} {command} @user` or `{prefix} {command} userId`"
    )
}
