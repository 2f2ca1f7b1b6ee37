use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use count_core::model::{ObjectKind, PlaySettings, PlaySettingsDraft, SettingsError};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "count-along.toml";

#[derive(Debug, Parser)]
#[command(name = "count-along", about = "Counting toy for the terminal")]
pub struct Cli {
    /// Settings file (TOML).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Milliseconds between two revealed icons.
    #[arg(long)]
    pub reveal_ms: Option<u64>,

    /// Start without narration.
    #[arg(long)]
    pub muted: bool,

    /// Icon kind to start with, e.g. `star` or `ladybug`.
    #[arg(long)]
    pub kind: Option<ObjectKind>,

    #[arg(long)]
    pub voice: Option<String>,

    #[arg(long)]
    pub rate: Option<f32>,

    #[arg(long)]
    pub pitch: Option<f32>,

    #[arg(long)]
    pub volume: Option<f32>,

    /// Run without a narration device at all.
    #[arg(long)]
    pub silent: bool,

    /// Seed for reproducible quiz tasks.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Cli {
    fn draft(&self) -> PlaySettingsDraft {
        PlaySettingsDraft {
            reveal_ms: self.reveal_ms,
            muted: self.muted.then_some(true),
            initial_kind: self.kind,
            voice_id: self.voice.clone(),
            rate: self.rate,
            pitch: self.pitch,
            volume: self.volume,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    InvalidEnv { key: &'static str, raw: String },
    Settings(SettingsError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "invalid settings in {}: {source}", path.display())
            }
            ConfigError::InvalidEnv { key, raw } => write!(f, "invalid {key} value: {raw}"),
            ConfigError::Settings(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Settings(err) => Some(err),
            ConfigError::InvalidEnv { .. } => None,
        }
    }
}

/// Defaults, then the settings file, then `COUNT_*` variables, then flags.
///
/// # Errors
///
/// Returns `ConfigError` for an unreadable or malformed layer, or settings out of range.
pub fn load_settings(cli: &Cli) -> Result<PlaySettings, ConfigError> {
    let mut draft = PlaySettingsDraft::new();

    if let Some(file) = file_layer(cli.config.as_deref())? {
        draft = draft.merge(file);
    }
    draft = draft.merge(env_layer(|key| std::env::var(key).ok())?);
    draft = draft.merge(cli.draft());

    draft.validate().map_err(ConfigError::Settings)
}

/// An explicit path must exist; the default file is optional.
fn file_layer(explicit: Option<&Path>) -> Result<Option<PlaySettingsDraft>, ConfigError> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(ConfigError::Read { path, source }),
    };
    parse_file(&path, &raw).map(Some)
}

fn parse_file(path: &Path, raw: &str) -> Result<PlaySettingsDraft, ConfigError> {
    toml::from_str(raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn env_layer(lookup: impl Fn(&str) -> Option<String>) -> Result<PlaySettingsDraft, ConfigError> {
    let mut draft = PlaySettingsDraft::new();

    if let Some(raw) = lookup("COUNT_REVEAL_MS") {
        draft.reveal_ms = Some(parse_env("COUNT_REVEAL_MS", raw)?);
    }
    if let Some(raw) = lookup("COUNT_MUTED") {
        draft.muted = Some(parse_flag("COUNT_MUTED", raw)?);
    }
    if let Some(raw) = lookup("COUNT_RATE") {
        draft.rate = Some(parse_env("COUNT_RATE", raw)?);
    }
    if let Some(raw) = lookup("COUNT_VOLUME") {
        draft.volume = Some(parse_env("COUNT_VOLUME", raw)?);
    }
    if let Some(raw) = lookup("COUNT_VOICE") {
        draft.voice_id = Some(raw);
    }

    Ok(draft)
}

fn parse_env<T: std::str::FromStr>(key: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { key, raw })
}

fn parse_flag(key: &'static str, raw: String) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv { key, raw }),
    }
}
