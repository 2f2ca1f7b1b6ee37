use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ObjectKind;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("speaking rate must be between 0.5 and 1.5, got {provided}")]
    InvalidRate { provided: f32 },

    #[error("pitch must be between 0.0 and 2.0, got {provided}")]
    InvalidPitch { provided: f32 },

    #[error("volume must be between 0.0 and 1.0, got {provided}")]
    InvalidVolume { provided: f32 },
}

//
// ─── SPEECH PROFILE ────────────────────────────────────────────────────────────
//

/// Per-utterance narration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechProfile {
    voice_id: Option<String>,
    rate: f32,
    pitch: f32,
    volume: f32,
}

impl SpeechProfile {
    pub const DEFAULT_RATE: f32 = 0.95;
    pub const DEFAULT_PITCH: f32 = 1.05;
    pub const DEFAULT_VOLUME: f32 = 1.0;

    /// Creates a validated profile.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if rate, pitch or volume is non-finite or out of range.
    pub fn new(
        voice_id: Option<String>,
        rate: f32,
        pitch: f32,
        volume: f32,
    ) -> Result<Self, SettingsError> {
        if !rate.is_finite() || !(0.5..=1.5).contains(&rate) {
            return Err(SettingsError::InvalidRate { provided: rate });
        }
        if !pitch.is_finite() || !(0.0..=2.0).contains(&pitch) {
            return Err(SettingsError::InvalidPitch { provided: pitch });
        }
        if !volume.is_finite() || !(0.0..=1.0).contains(&volume) {
            return Err(SettingsError::InvalidVolume { provided: volume });
        }

        Ok(Self {
            voice_id: normalize_optional(voice_id),
            rate,
            pitch,
            volume,
        })
    }

    #[must_use]
    pub fn voice_id(&self) -> Option<&str> {
        self.voice_id.as_deref()
    }

    #[must_use]
    pub fn with_voice_id(mut self, voice_id: Option<String>) -> Self {
        self.voice_id = normalize_optional(voice_id);
        self
    }

    #[must_use]
    pub fn rate(&self) -> f32 {
        self.rate
    }

    #[must_use]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl Default for SpeechProfile {
    fn default() -> Self {
        Self {
            voice_id: None,
            rate: Self::DEFAULT_RATE,
            pitch: Self::DEFAULT_PITCH,
            volume: Self::DEFAULT_VOLUME,
        }
    }
}

//
// ─── PLAY SETTINGS ─────────────────────────────────────────────────────────────
//

/// Validated settings for a play session.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaySettings {
    reveal_period: Duration,
    muted: bool,
    initial_kind: ObjectKind,
    speech: SpeechProfile,
}

/// Unvalidated settings, as read from a config file or the environment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlaySettingsDraft {
    pub reveal_ms: Option<u64>,
    pub muted: Option<bool>,
    pub initial_kind: Option<ObjectKind>,
    pub voice_id: Option<String>,
    pub rate: Option<f32>,
    pub pitch: Option<f32>,
    pub volume: Option<f32>,
}

impl PlaySettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    #[must_use]
    pub fn merge(self, other: PlaySettingsDraft) -> Self {
        Self {
            reveal_ms: other.reveal_ms.or(self.reveal_ms),
            muted: other.muted.or(self.muted),
            initial_kind: other.initial_kind.or(self.initial_kind),
            voice_id: other.voice_id.or(self.voice_id),
            rate: other.rate.or(self.rate),
            pitch: other.pitch.or(self.pitch),
            volume: other.volume.or(self.volume),
        }
    }

    /// Validate and normalize the draft.
    ///
    /// The reveal period is clamped to `PlaySettings::MIN_REVEAL_PERIOD`, never rejected.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if a speech value is out of range.
    pub fn validate(self) -> Result<PlaySettings, SettingsError> {
        let speech = SpeechProfile::new(
            self.voice_id,
            self.rate.unwrap_or(SpeechProfile::DEFAULT_RATE),
            self.pitch.unwrap_or(SpeechProfile::DEFAULT_PITCH),
            self.volume.unwrap_or(SpeechProfile::DEFAULT_VOLUME),
        )?;

        let reveal_period = self
            .reveal_ms
            .map_or(PlaySettings::DEFAULT_REVEAL_PERIOD, Duration::from_millis);

        Ok(PlaySettings {
            reveal_period: PlaySettings::clamp_reveal_period(reveal_period),
            muted: self.muted.unwrap_or(false),
            initial_kind: self.initial_kind.unwrap_or_default(),
            speech,
        })
    }
}

impl PlaySettings {
    pub const DEFAULT_REVEAL_PERIOD: Duration = Duration::from_millis(250);
    pub const MIN_REVEAL_PERIOD: Duration = Duration::from_millis(100);

    #[must_use]
    pub fn clamp_reveal_period(period: Duration) -> Duration {
        period.max(Self::MIN_REVEAL_PERIOD)
    }

    #[must_use]
    pub fn reveal_period(&self) -> Duration {
        self.reveal_period
    }

    #[must_use]
    pub fn with_reveal_period(mut self, period: Duration) -> Self {
        self.reveal_period = Self::clamp_reveal_period(period);
        self
    }

    #[must_use]
    pub fn muted(&self) -> bool {
        self.muted
    }

    #[must_use]
    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    #[must_use]
    pub fn initial_kind(&self) -> ObjectKind {
        self.initial_kind
    }

    #[must_use]
    pub fn speech(&self) -> &SpeechProfile {
        &self.speech
    }

    #[must_use]
    pub fn with_speech(mut self, speech: SpeechProfile) -> Self {
        self.speech = speech;
        self
    }
}

impl Default for PlaySettings {
    fn default() -> Self {
        Self {
            reveal_period: Self::DEFAULT_REVEAL_PERIOD,
            muted: false,
            initial_kind: ObjectKind::default(),
            speech: SpeechProfile::default(),
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
