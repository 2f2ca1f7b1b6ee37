//! Narration sequencing on top of a `NarrationDevice`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;
use tracing::debug;

use count_core::model::{FALLBACK_LANGUAGE, SpeechProfile, Utterance, VoiceInfo, default_voice};

use crate::devices::NarrationDevice;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Per-call narration options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeakOptions {
    /// Stop the current utterance before starting this one.
    pub cancel_prior: bool,
}

impl SpeakOptions {
    pub const INTERRUPT: Self = Self { cancel_prior: true };
    pub const QUEUE: Self = Self {
        cancel_prior: false,
    };
}

#[derive(Debug, Clone)]
struct VoiceSelection {
    profile: SpeechProfile,
    language: String,
}

/// Issues one utterance at a time and owns the stop switch for narration and
/// timer-driven animation.
///
/// `speak` always resolves, exactly once: when the utterance ends, when the
/// device fails, or immediately when there is no device or output is muted.
pub struct SpeechCoordinator {
    device: Option<Arc<dyn NarrationDevice>>,
    voice: Mutex<VoiceSelection>,
    muted: AtomicBool,
    animation: Mutex<CancellationToken>,
}

impl SpeechCoordinator {
    #[must_use]
    pub fn new(device: Option<Arc<dyn NarrationDevice>>, profile: SpeechProfile) -> Self {
        Self {
            device,
            voice: Mutex::new(VoiceSelection {
                profile,
                language: FALLBACK_LANGUAGE.to_string(),
            }),
            muted: AtomicBool::new(false),
            animation: Mutex::new(CancellationToken::new()),
        }
    }

    /// A coordinator with no narration device; every `speak` is a no-op.
    #[must_use]
    pub fn silent() -> Self {
        Self::new(None, SpeechProfile::default())
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.device.is_some()
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }

    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::SeqCst);
    }

    #[must_use]
    pub fn profile(&self) -> SpeechProfile {
        lock(&self.voice).profile.clone()
    }

    /// Replace the profile. The language tag of the previously chosen voice is kept
    /// when the voice id does not change.
    pub fn set_profile(&self, profile: SpeechProfile) {
        let mut voice = lock(&self.voice);
        if voice.profile.voice_id() != profile.voice_id() {
            voice.language = FALLBACK_LANGUAGE.to_string();
        }
        voice.profile = profile;
    }

    /// Voices offered by the device; empty without a device.
    pub async fn voices(&self) -> Vec<VoiceInfo> {
        match &self.device {
            Some(device) => device.voices().await,
            None => Vec::new(),
        }
    }

    /// Resolve the voice to use against the device's voice list.
    ///
    /// A configured voice id is kept when the device offers it; otherwise the
    /// first German voice wins, then the first voice listed.
    pub async fn select_default_voice(&self) -> Option<VoiceInfo> {
        let voices = self.voices().await;
        let configured = lock(&self.voice).profile.voice_id().map(str::to_owned);

        let chosen = configured
            .as_deref()
            .and_then(|id| voices.iter().find(|v| v.id == id))
            .or_else(|| default_voice(&voices))
            .cloned()?;

        let mut voice = lock(&self.voice);
        voice.profile = voice.profile.clone().with_voice_id(Some(chosen.id.clone()));
        voice.language = chosen.language.clone();
        debug!(voice = %chosen.id, language = %chosen.language, "selected narration voice");
        Some(chosen)
    }

    fn utterance(&self, text: &str) -> Utterance {
        let voice = lock(&self.voice);
        Utterance {
            text: text.to_string(),
            voice_id: voice.profile.voice_id().map(str::to_owned),
            language: voice.language.clone(),
            rate: voice.profile.rate(),
            pitch: voice.profile.pitch(),
            volume: voice.profile.volume(),
        }
    }

    /// Speak `text` and wait until it is finished or abandoned.
    pub async fn speak(&self, text: &str, options: SpeakOptions) {
        let Some(device) = &self.device else {
            return;
        };
        if self.is_muted() {
            return;
        }

        if options.cancel_prior {
            device.cancel().await;
        }

        let utterance = self.utterance(text);
        if let Err(err) = device.speak(&utterance).await {
            debug!(error = %err, text, "narration failed; continuing");
        }
    }

    /// Token for a timer-driven animation; cancelled by the next `stop_all`.
    #[must_use]
    pub fn animation_token(&self) -> CancellationToken {
        lock(&self.animation).clone()
    }

    /// Stop the active utterance and any running animation timer.
    ///
    /// Safe to call repeatedly or when nothing is active.
    pub async fn stop_all(&self) {
        {
            let mut animation = lock(&self.animation);
            animation.cancel();
            *animation = CancellationToken::new();
        }
        if let Some(device) = &self.device {
            device.cancel().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::InMemoryNarrator;
    use std::time::Duration;

    fn coordinator(narrator: &InMemoryNarrator) -> SpeechCoordinator {
        SpeechCoordinator::new(Some(Arc::new(narrator.clone())), SpeechProfile::default())
    }

    #[tokio::test(start_paused = true)]
    async fn speak_without_device_resolves_immediately() {
        let speech = SpeechCoordinator::silent();
        let started = tokio::time::Instant::now();
        speech.speak("Drei", SpeakOptions::INTERRUPT).await;
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert!(!speech.is_available());
    }

    #[tokio::test(start_paused = true)]
    async fn muted_speak_produces_no_utterance() {
        let narrator = InMemoryNarrator::new();
        let speech = coordinator(&narrator);
        speech.set_muted(true);
        speech.speak("Drei", SpeakOptions::INTERRUPT).await;
        assert!(narrator.spoken().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn device_failure_is_swallowed() {
        let narrator = InMemoryNarrator::new().failing();
        let speech = coordinator(&narrator);
        speech.speak("Vier", SpeakOptions::QUEUE).await;
        assert_eq!(narrator.texts(), vec!["Vier"]);
    }

    #[tokio::test(start_paused = true)]
    async fn applies_profile_to_every_utterance() {
        let narrator = InMemoryNarrator::new();
        let speech = coordinator(&narrator);
        let profile = SpeechProfile::new(Some("de-2".into()), 1.2, 1.0, 0.5).unwrap();
        speech.set_profile(profile);
        speech.speak("Eins", SpeakOptions::QUEUE).await;

        let spoken = narrator.spoken();
        assert_eq!(spoken[0].voice_id.as_deref(), Some("de-2"));
        assert_eq!(spoken[0].rate, 1.2);
        assert_eq!(spoken[0].volume, 0.5);
        assert_eq!(spoken[0].language, FALLBACK_LANGUAGE);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prior_interrupts_only_when_asked() {
        let narrator = InMemoryNarrator::new();
        let speech = coordinator(&narrator);
        speech.speak("Eins", SpeakOptions::QUEUE).await;
        assert_eq!(narrator.cancel_count(), 0);
        speech.speak("Zwei", SpeakOptions::INTERRUPT).await;
        assert_eq!(narrator.cancel_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_all_cuts_speech_short_and_is_idempotent() {
        let narrator = InMemoryNarrator::new().with_duration(Duration::from_secs(10));
        let speech = coordinator(&narrator);
        let token = speech.animation_token();

        let started = tokio::time::Instant::now();
        tokio::join!(speech.speak("Neun", SpeakOptions::QUEUE), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            speech.stop_all().await;
        });
        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(token.is_cancelled());

        speech.stop_all().await;
        speech.stop_all().await;
        assert!(!speech.animation_token().is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn selects_german_voice_and_language() {
        let narrator = InMemoryNarrator::new().with_voices(vec![
            VoiceInfo::new("en", "en-GB", "Daniel"),
            VoiceInfo::new("de", "de-AT", "Helena"),
        ]);
        let speech = coordinator(&narrator);
        let chosen = speech.select_default_voice().await.unwrap();
        assert_eq!(chosen.id, "de");

        speech.speak("Null", SpeakOptions::QUEUE).await;
        let spoken = narrator.spoken();
        assert_eq!(spoken[0].voice_id.as_deref(), Some("de"));
        assert_eq!(spoken[0].language, "de-AT");
    }
}
