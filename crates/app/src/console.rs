//! Terminal stand-ins for the narration and haptic devices.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use count_core::model::{FALLBACK_LANGUAGE, Utterance, VoiceInfo};
use services::{DeviceError, HapticDevice, NarrationDevice};

const MS_PER_CHAR: u64 = 70;
const MIN_UTTERANCE: Duration = Duration::from_millis(400);

/// Prints each utterance and holds it for roughly the time it takes to say it.
pub struct ConsoleNarrator {
    playing: Mutex<CancellationToken>,
}

impl ConsoleNarrator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            playing: Mutex::new(CancellationToken::new()),
        }
    }
}

impl Default for ConsoleNarrator {
    fn default() -> Self {
        Self::new()
    }
}

/// Playback time for `text` at `rate`.
pub fn speaking_time(text: &str, rate: f32) -> Duration {
    let chars = u64::try_from(text.chars().count()).unwrap_or(u64::MAX);
    let base = Duration::from_millis(chars.saturating_mul(MS_PER_CHAR));
    let scaled = if rate > 0.0 { base.div_f32(rate) } else { base };
    scaled.max(MIN_UTTERANCE)
}

#[async_trait]
impl NarrationDevice for ConsoleNarrator {
    async fn voices(&self) -> Vec<VoiceInfo> {
        vec![VoiceInfo::new("console", FALLBACK_LANGUAGE, "Konsole")]
    }

    async fn speak(&self, utterance: &Utterance) -> Result<(), DeviceError> {
        let playing = self
            .playing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        println!("  🔊 {}", utterance.text);

        tokio::select! {
            () = playing.cancelled() => debug!(text = %utterance.text, "utterance cut short"),
            () = tokio::time::sleep(speaking_time(&utterance.text, utterance.rate)) => {}
        }
        Ok(())
    }

    async fn cancel(&self) {
        let mut playing = self.playing.lock().unwrap_or_else(PoisonError::into_inner);
        playing.cancel();
        *playing = CancellationToken::new();
    }
}

pub struct ConsoleHaptics;

impl HapticDevice for ConsoleHaptics {
    fn pulse(&self, duration_ms: u32) -> Result<(), DeviceError> {
        debug!(duration_ms, "haptic pulse");
        Ok(())
    }
}
