//! Configuration loading, validation, and env substitution.
//!
//! Config files: `tempvoice.toml`, `tempvoice.yaml`, or `tempvoice.json`,
//! searched in `./` then `~/.config/tempvoice/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values. `DISCORD_TOKEN`
//! and the `TEMPVOICE_*` variables override whatever the file says.

pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    loader::{apply_env_overrides, discover_and_load, find_config_file, load_config},
    schema::{DiscordConfig, RoomsConfig, TempVoiceConfig},
    validate::{Diagnostic, Severity, ValidationResult},
};
