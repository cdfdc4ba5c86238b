/// Config schema types (discord credentials, room behaviour).
use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Name of the voice channel that spawns personal rooms.
pub const DEFAULT_LOBBY_CHANNEL_NAME: &str = "JTC";

/// Chat prefix that introduces a room command.
pub const DEFAULT_COMMAND_PREFIX: &str = ",vc";

/// Placeholder replaced with the owner's display name.
pub const NAME_PLACEHOLDER: &str = "{name}";

pub const DEFAULT_CHANNEL_NAME_TEMPLATE: &str = "{name}'s Channel";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TempVoiceConfig {
    pub discord: DiscordConfig,
    pub rooms: RoomsConfig,
}

/// Discord bot credentials.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Bot token from the developer portal.
    #[serde(serialize_with = "serialize_secret")]
    pub token: Secret<String>,
}

impl DiscordConfig {
    #[must_use]
    pub fn has_token(&self) -> bool {
        !self.token.expose_secret().trim().is_empty()
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: Secret::new(String::new()),
        }
    }
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// Temporary room behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RoomsConfig {
    /// Exact name of the lobby voice channel.
    pub lobby_channel_name: String,

    /// Prefix that marks a chat message as a room command.
    pub command_prefix: String,

    /// Name given to a room; `{name}` becomes the owner's display name.
    pub channel_name_template: String,
}

impl RoomsConfig {
    /// Render the room name for an owner.
    #[must_use]
    pub fn channel_name_for(&self, display_name: &str) -> String {
        self.channel_name_template
            .replace(NAME_PLACEHOLDER, display_name)
    }
}

impl Default for RoomsConfig {
    fn default() -> Self {
        Self {
            lobby_channel_name: DEFAULT_LOBBY_CHANNEL_NAME.into(),
            command_prefix: DEFAULT_COMMAND_PREFIX.into(),
            channel_name_template: DEFAULT_CHANNEL_NAME_TEMPLATE.into(),
        }
    }
}
