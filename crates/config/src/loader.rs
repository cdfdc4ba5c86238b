use std::path::{Path, PathBuf};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{env_subst::substitute_env, schema::TempVoiceConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "tempvoice.toml",
    "tempvoice.yaml",
    "tempvoice.yml",
    "tempvoice.json",
];

/// Environment variable holding the bot token.
pub const TOKEN_ENV: &str = "DISCORD_TOKEN";
pub const LOBBY_ENV: &str = "TEMPVOICE_LOBBY_CHANNEL";
pub const PREFIX_ENV: &str = "TEMPVOICE_COMMAND_PREFIX";

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<TempVoiceConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./tempvoice.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/tempvoice/tempvoice.{toml,yaml,yml,json}` (user-global)
///
/// Returns `TempVoiceConfig::default()` if no config file is found or the
/// file fails to parse. Environment overrides are applied in both cases.
pub fn discover_and_load() -> TempVoiceConfig {
    let mut config = if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                TempVoiceConfig::default()
            },
        }
    } else {
        debug!("no config file found, using defaults");
        TempVoiceConfig::default()
    };
    apply_env_overrides(&mut config);
    config
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    let dirs = directories::ProjectDirs::from("", "", "tempvoice")?;
    find_in_dir(dirs.config_dir())
}

fn find_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Overlay `DISCORD_TOKEN` and the `TEMPVOICE_*` variables onto `config`.
pub fn apply_env_overrides(config: &mut TempVoiceConfig) {
    apply_env_overrides_with(config, |name| std::env::var(name).ok());
}

fn apply_env_overrides_with(
    config: &mut TempVoiceConfig,
    lookup: impl Fn(&str) -> Option<String>,
) {
    let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(token) = non_empty(TOKEN_ENV) {
        config.discord.token = Secret::new(token);
    }
    if let Some(lobby) = non_empty(LOBBY_ENV) {
        config.rooms.lobby_channel_name = lobby;
    }
    if let Some(prefix) = non_empty(PREFIX_ENV) {
        config.rooms.command_prefix = prefix;
    }
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<TempVoiceConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
