//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.mentorchat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::core::sound::DEFAULT_VOLUME;
use crate::inference::providers::gemini::DEFAULT_GEMINI_BASE_URL;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MentorChatConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub sound: SoundConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_mentor: Option<String>,
    pub scroll_threshold: Option<u16>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SoundConfig {
    pub enabled: Option<bool>,
    pub backend: Option<SoundBackendKind>,
    pub player: Option<String>,
    pub args: Option<Vec<String>>,
    pub volume: Option<f32>,
    pub send_cue: Option<String>,
    pub receive_cue: Option<String>,
}

/// Which audio backend plays the cues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundBackendKind {
    #[default]
    Command,
    Bell,
    Off,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_MENTOR: &str = "hitesh";
pub const DEFAULT_MODEL: &str = "gemini-pro";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
/// Rows from the bottom of the message list that still count as "at the bottom".
pub const DEFAULT_SCROLL_THRESHOLD: u16 = 3;
pub const DEFAULT_SEND_CUE: &str = "sounds/message-sent.mp3";
pub const DEFAULT_RECEIVE_CUE: &str = "sounds/message-received.mp3";

/// Platform default player and its argument template.
pub fn default_player() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "macos") {
        ("afplay", &["-v", "{volume}", "{file}"])
    } else {
        ("paplay", &["{file}"])
    }
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SoundSettings {
    pub enabled: bool,
    pub backend: SoundBackendKind,
    pub player: String,
    pub args: Vec<String>,
    pub volume: f32,
    pub send_cue: PathBuf,
    pub receive_cue: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub default_mentor: String,
    pub scroll_threshold: u16,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub timeout: Duration,
    pub sound: SoundSettings,
}

/// Values taken from command-line flags. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub mentor: Option<String>,
    pub model: Option<String>,
    pub no_sound: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.mentorchat`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".mentorchat"))
}

/// Returns the path to `~/.mentorchat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.mentorchat/config.toml`.
pub fn load_config() -> Result<MentorChatConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(MentorChatConfig::default())
        }
    }
}

/// Load config from `path`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `MentorChatConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config_from(path: &Path) -> Result<MentorChatConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(MentorChatConfig::default());
    }

    let contents = fs::read_to_string(path)?;
    let config: MentorChatConfig = toml::from_str(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# mentorchat configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_mentor = "hitesh"          # "hitesh" or "piyush"
# scroll_threshold = 3               # rows from the bottom that count as "at the bottom"

# [gemini]
# api_key = "..."                    # Or set GOOGLE_GEMINI_API_KEY env var
# model = "gemini-pro"               # Or set GEMINI_MODEL env var
# base_url = "https://generativelanguage.googleapis.com/v1beta"
# timeout_secs = 60

# [sound]
# enabled = true
# backend = "command"                # "command", "bell" or "off"
# player = "paplay"                  # "afplay" on macOS
# args = ["{file}"]                  # {file} and {volume} are substituted
# volume = 0.3
# send_cue = "sounds/message-sent.mp3"          # Relative to ~/.mentorchat/
# receive_cue = "sounds/message-received.mp3"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &MentorChatConfig, cli: &CliOverrides) -> ResolvedConfig {
    let base_dir = config_dir().unwrap_or_else(|| PathBuf::from("."));
    resolve_with(config, cli, &base_dir, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], with the environment lookup and the directory that
/// relative cue paths hang off supplied by the caller.
pub fn resolve_with(
    config: &MentorChatConfig,
    cli: &CliOverrides,
    base_dir: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Mentor: CLI → config → default
    let default_mentor = cli
        .mentor
        .clone()
        .or_else(|| config.general.default_mentor.clone())
        .unwrap_or_else(|| DEFAULT_MENTOR.to_string());

    // API key: env → legacy env → config. Blank values count as unset.
    let gemini_api_key = env("GOOGLE_GEMINI_API_KEY")
        .or_else(|| env("NEXT_PUBLIC_GOOGLE_GEMINI_API_KEY"))
        .or_else(|| config.gemini.api_key.clone())
        .filter(|k| !k.trim().is_empty());

    // Model: CLI → env → legacy env → config → default
    let gemini_model = cli
        .model
        .clone()
        .or_else(|| env("GEMINI_MODEL"))
        .or_else(|| env("NEXT_PUBLIC_GEMINI_MODEL"))
        .or_else(|| config.gemini.model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let gemini_base_url = env("GEMINI_BASE_URL")
        .or_else(|| config.gemini.base_url.clone())
        .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());

    ResolvedConfig {
        default_mentor,
        scroll_threshold: config
            .general
            .scroll_threshold
            .unwrap_or(DEFAULT_SCROLL_THRESHOLD),
        gemini_api_key,
        gemini_model,
        gemini_base_url,
        timeout: Duration::from_secs(config.gemini.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        sound: resolve_sound(&config.sound, cli.no_sound, base_dir),
    }
}

fn resolve_sound(sound: &SoundConfig, no_sound: bool, base_dir: &Path) -> SoundSettings {
    let (player, args) = default_player();
    let cue_path = |value: &Option<String>, default: &str| {
        let path = PathBuf::from(value.as_deref().unwrap_or(default));
        if path.is_absolute() { path } else { base_dir.join(path) }
    };

    SoundSettings {
        enabled: !no_sound && sound.enabled.unwrap_or(true),
        backend: sound.backend.unwrap_or_default(),
        player: sound.player.clone().unwrap_or_else(|| player.to_string()),
        args: sound
            .args
            .clone()
            .unwrap_or_else(|| args.iter().map(|a| a.to_string()).collect()),
        volume: sound.volume.unwrap_or(DEFAULT_VOLUME).clamp(0.0, 1.0),
        send_cue: cue_path(&sound.send_cue, DEFAULT_SEND_CUE),
        receive_cue: cue_path(&sound.receive_cue, DEFAULT_RECEIVE_CUE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn resolve_plain(config: &MentorChatConfig) -> ResolvedConfig {
        resolve_with(config, &CliOverrides::default(), Path::new("/home/u/.mentorchat"), no_env)
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_plain(&MentorChatConfig::default());
        assert_eq!(resolved.default_mentor, "hitesh");
        assert_eq!(resolved.gemini_model, "gemini-pro");
        assert_eq!(resolved.gemini_base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(resolved.gemini_api_key, None);
        assert_eq!(resolved.scroll_threshold, DEFAULT_SCROLL_THRESHOLD);
        assert_eq!(resolved.timeout, Duration::from_secs(60));
        assert!(resolved.sound.enabled);
        assert_eq!(resolved.sound.volume, 0.3);
        assert_eq!(
            resolved.sound.send_cue,
            PathBuf::from("/home/u/.mentorchat/sounds/message-sent.mp3")
        );
    }

    #[test]
    fn test_env_beats_config_and_legacy_names() {
        let config = MentorChatConfig {
            gemini: GeminiConfig {
                api_key: Some("from-file".into()),
                model: Some("file-model".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let env: HashMap<&str, &str> = HashMap::from([
            ("GOOGLE_GEMINI_API_KEY", "from-env"),
            ("NEXT_PUBLIC_GOOGLE_GEMINI_API_KEY", "legacy"),
            ("NEXT_PUBLIC_GEMINI_MODEL", "legacy-model"),
        ]);
        let resolved = resolve_with(&config, &CliOverrides::default(), Path::new("."), |k| {
            env.get(k).map(|v| v.to_string())
        });
        assert_eq!(resolved.gemini_api_key.as_deref(), Some("from-env"));
        assert_eq!(resolved.gemini_model, "legacy-model");
    }

    #[test]
    fn test_cli_wins() {
        let config = MentorChatConfig {
            general: GeneralConfig {
                default_mentor: Some("hitesh".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            mentor: Some("piyush".into()),
            model: Some("gemini-1.5-flash".into()),
            no_sound: true,
        };
        let resolved = resolve_with(&config, &cli, Path::new("."), |k| {
            (k == "GEMINI_MODEL").then(|| "env-model".to_string())
        });
        assert_eq!(resolved.default_mentor, "piyush");
        assert_eq!(resolved.gemini_model, "gemini-1.5-flash");
        assert!(!resolved.sound.enabled);
    }

    #[test]
    fn test_blank_api_key_is_unset() {
        let config = MentorChatConfig {
            gemini: GeminiConfig {
                api_key: Some("  ".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(resolve_plain(&config).gemini_api_key, None);
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[sound]
backend = "bell"
volume = 2.5
receive_cue = "/tmp/ding.wav"
"#;
        let config: MentorChatConfig = toml::from_str(toml_str).unwrap();
        assert!(config.general.default_mentor.is_none());

        let resolved = resolve_plain(&config);
        assert_eq!(resolved.sound.backend, SoundBackendKind::Bell);
        assert_eq!(resolved.sound.volume, 1.0);
        assert_eq!(resolved.sound.receive_cue, PathBuf::from("/tmp/ding.wav"));
    }

    #[test]
    fn test_full_toml_parses() {
        let toml_str = r#"
[general]
default_mentor = "piyush"
scroll_threshold = 5

[gemini]
api_key = "abc"
model = "gemini-1.5-pro"
base_url = "http://localhost:9000/v1beta"
timeout_secs = 10

[sound]
enabled = false
backend = "command"
player = "mpv"
args = ["--really-quiet", "{file}"]
"#;
        let config: MentorChatConfig = toml::from_str(toml_str).unwrap();
        let resolved = resolve_plain(&config);
        assert_eq!(resolved.default_mentor, "piyush");
        assert_eq!(resolved.scroll_threshold, 5);
        assert_eq!(resolved.gemini_base_url, "http://localhost:9000/v1beta");
        assert_eq!(resolved.timeout, Duration::from_secs(10));
        assert!(!resolved.sound.enabled);
        assert_eq!(resolved.sound.player, "mpv");
        assert_eq!(resolved.sound.args, vec!["--really-quiet", "{file}"]);
    }

    #[test]
    fn test_unknown_backend_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[sound]\nbackend = \"trumpet\"\n").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_generates_commented_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = load_config_from(&path).unwrap();
        assert!(config.gemini.api_key.is_none());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("# [gemini]"));
        // Everything is commented out, so it parses back to defaults
        let reparsed: MentorChatConfig = toml::from_str(&written).unwrap();
        assert!(reparsed.sound.enabled.is_none());
    }
}
