//! Configuration validation.
//!
//! Checks a config file against the known schema, flags unknown or misspelled
//! keys, and reports settings that would keep the bot from working.

use std::{collections::HashMap, path::Path};

use crate::{
    env_subst::substitute_env,
    loader,
    schema::{NAME_PLACEHOLDER, TempVoiceConfig},
};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Category: "syntax", "unknown-field", "type-error", "missing", "file-ref"
    pub category: &'static str,
    /// Dotted path, e.g. "rooms.command_prefix"
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    fn new(
        severity: Severity,
        category: &'static str,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result of validating a configuration file.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub config_path: Option<std::path::PathBuf>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// Known keys per table.
fn known_keys() -> HashMap<&'static str, &'static [&'static str]> {
    HashMap::from([
        ("discord", &["token"][..]),
        (
            "rooms",
            &[
                "lobby_channel_name",
                "command_prefix",
                "channel_name_template",
            ][..],
        ),
    ])
}

// ── Levenshtein distance ────────────────────────────────────────────────────

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b_chars.len()]
}

/// Closest candidate within `max_distance` edits.
fn suggest<'a>(needle: &str, candidates: &[&'a str], max_distance: usize) -> Option<&'a str> {
    candidates
        .iter()
        .map(|c| (*c, levenshtein(needle, c)))
        .filter(|(_, d)| *d > 0 && *d <= max_distance)
        .min_by_key(|(_, d)| *d)
        .map(|(c, _)| c)
}

// ── Core validation ─────────────────────────────────────────────────────────

/// Validate a config file at the given path, or the discovered default
/// location if `path` is `None`.
///
/// Environment overrides are applied before the semantic checks, so a token
/// supplied only through `DISCORD_TOKEN` is not reported as missing.
#[must_use]
pub fn validate(path: Option<&Path>) -> ValidationResult {
    let config_path = path
        .map(Path::to_path_buf)
        .or_else(loader::find_config_file);

    let Some(actual_path) = config_path else {
        let mut config = TempVoiceConfig::default();
        loader::apply_env_overrides(&mut config);
        let mut diagnostics = vec![Diagnostic::new(
            Severity::Info,
            "file-ref",
            "",
            "no config file found; using defaults",
        )];
        check_semantics(&config, &mut diagnostics);
        return ValidationResult {
            diagnostics,
            config_path: None,
        };
    };

    let raw = match std::fs::read_to_string(&actual_path) {
        Ok(raw) => substitute_env(&raw),
        Err(e) => {
            return ValidationResult {
                diagnostics: vec![Diagnostic::new(
                    Severity::Error,
                    "syntax",
                    "",
                    format!("failed to read config file: {e}"),
                )],
                config_path: Some(actual_path),
            };
        },
    };

    let ext = actual_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("toml")
        .to_string();
    let mut result = validate_str(&raw, &ext, loader::apply_env_overrides);
    result.config_path = Some(actual_path);
    result
}

/// Validate config text of the given format without touching the
/// filesystem. `overlay` runs on the parsed config before semantic checks.
pub fn validate_str(
    raw: &str,
    ext: &str,
    overlay: impl FnOnce(&mut TempVoiceConfig),
) -> ValidationResult {
    let mut diagnostics = Vec::new();

    let value: serde_json::Value = match parse_value(raw, ext) {
        Ok(v) => v,
        Err(message) => {
            diagnostics.push(Diagnostic::new(Severity::Error, "syntax", "", message));
            return ValidationResult {
                diagnostics,
                config_path: None,
            };
        },
    };

    check_unknown_fields(&value, &mut diagnostics);

    match serde_json::from_value::<TempVoiceConfig>(value) {
        Ok(mut config) => {
            overlay(&mut config);
            check_semantics(&config, &mut diagnostics);
        },
        Err(e) => diagnostics.push(Diagnostic::new(
            Severity::Error,
            "type-error",
            "",
            format!("type error: {e}"),
        )),
    }

    ValidationResult {
        diagnostics,
        config_path: None,
    }
}

fn parse_value(raw: &str, ext: &str) -> Result<serde_json::Value, String> {
    match ext {
        "toml" => toml::from_str::<toml::Value>(raw)
            .map_err(|e| format!("TOML syntax error: {e}"))
            .and_then(|v| serde_json::to_value(v).map_err(|e| e.to_string())),
        "yaml" | "yml" => serde_yaml::from_str::<serde_json::Value>(raw)
            .map_err(|e| format!("YAML syntax error: {e}"))
            .map(|v| {
                // an empty document parses to null
                if v.is_null() {
                    serde_json::Value::Object(serde_json::Map::new())
                } else {
                    v
                }
            }),
        "json" => serde_json::from_str(raw).map_err(|e| format!("JSON syntax error: {e}")),
        other => Err(format!("unsupported config format: .{other}")),
    }
}

fn check_unknown_fields(value: &serde_json::Value, diagnostics: &mut Vec<Diagnostic>) {
    let Some(root) = value.as_object() else {
        return;
    };
    let schema = known_keys();
    let top_level: Vec<&str> = schema.keys().copied().collect();

    for (key, child) in root {
        let Some(fields) = schema.get(key.as_str()) else {
            let message = match suggest(key, &top_level, 3) {
                Some(s) => format!("unknown field at top level (did you mean \"{s}\"?)"),
                None => "unknown field at top level".to_string(),
            };
            diagnostics.push(Diagnostic::new(
                Severity::Warning,
                "unknown-field",
                key.clone(),
                message,
            ));
            continue;
        };

        let Some(table) = child.as_object() else {
            continue;
        };
        for field in table.keys() {
            if fields.contains(&field.as_str()) {
                continue;
            }
            let message = match suggest(field, fields, 3) {
                Some(s) => format!("unknown field (did you mean \"{s}\"?)"),
                None => "unknown field".to_string(),
            };
            diagnostics.push(Diagnostic::new(
                Severity::Warning,
                "unknown-field",
                format!("{key}.{field}"),
                message,
            ));
        }
    }
}

fn check_semantics(config: &TempVoiceConfig, diagnostics: &mut Vec<Diagnostic>) {
    if !config.discord.has_token() {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "missing",
            "discord.token",
            format!(
                "no bot token configured (set it here or via {})",
                loader::TOKEN_ENV
            ),
        ));
    }
    if config.rooms.lobby_channel_name.trim().is_empty() {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "missing",
            "rooms.lobby_channel_name",
            "lobby channel name must not be empty",
        ));
    }
    if config.rooms.command_prefix.trim().is_empty() {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "missing",
            "rooms.command_prefix",
            "command prefix must not be empty",
        ));
    }
    if !config.rooms.channel_name_template.contains(NAME_PLACEHOLDER) {
        diagnostics.push(Diagnostic::new(
            Severity::Warning,
            "missing",
            "rooms.channel_name_template",
            format!(
                "template has no {NAME_PLACEHOLDER} placeholder; every room gets the same name"
            ),
        ));
    }
}
