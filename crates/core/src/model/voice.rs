use serde::{Deserialize, Serialize};

/// Language tag used when no voice is selected.
pub const FALLBACK_LANGUAGE: &str = "de-DE";

/// A voice reported by the narration device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub id: String,
    pub language: String,
    pub display_name: String,
}

impl VoiceInfo {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        language: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            language: language.into(),
            display_name: display_name.into(),
        }
    }

    /// True for German voices (`de`, `de-DE`, `de-AT`, ...).
    #[must_use]
    pub fn is_target_language(&self) -> bool {
        self.language.to_lowercase().starts_with("de")
    }
}

/// Picks the default voice: the first German voice, else the first voice listed.
#[must_use]
pub fn default_voice(voices: &[VoiceInfo]) -> Option<&VoiceInfo> {
    voices
        .iter()
        .find(|v| v.is_target_language())
        .or_else(|| voices.first())
}

/// Everything the narration device needs to speak one line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub voice_id: Option<String>,
    pub language: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_german_voice() {
        let voices = vec![
            VoiceInfo::new("en-1", "en-US", "Samantha"),
            VoiceInfo::new("de-1", "DE-de", "Anna"),
        ];
        assert_eq!(default_voice(&voices).map(|v| v.id.as_str()), Some("de-1"));
    }

    #[test]
    fn falls_back_to_first_voice() {
        let voices = vec![
            VoiceInfo::new("en-1", "en-US", "Samantha"),
            VoiceInfo::new("fr-1", "fr-FR", "Thomas"),
        ];
        assert_eq!(default_voice(&voices).map(|v| v.id.as_str()), Some("en-1"));
        assert_eq!(default_voice(&[]), None);
    }
}
