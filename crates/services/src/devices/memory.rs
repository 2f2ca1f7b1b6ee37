use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use count_core::model::{Utterance, VoiceInfo};

use crate::devices::{HapticDevice, NarrationDevice};
use crate::error::DeviceError;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Narration device that records what it was asked to say.
///
/// Each utterance "plays" for a fixed duration on the tokio clock, so tests can
/// drive it with paused time. `cancel` cuts the current utterance short.
#[derive(Clone)]
pub struct InMemoryNarrator {
    voices: Arc<Vec<VoiceInfo>>,
    duration: Duration,
    fail: bool,
    spoken: Arc<Mutex<Vec<Utterance>>>,
    playing: Arc<Mutex<CancellationToken>>,
    cancels: Arc<AtomicUsize>,
}

impl InMemoryNarrator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            voices: Arc::new(Vec::new()),
            duration: Duration::from_millis(100),
            fail: false,
            spoken: Arc::new(Mutex::new(Vec::new())),
            playing: Arc::new(Mutex::new(CancellationToken::new())),
            cancels: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[must_use]
    pub fn with_voices(mut self, voices: Vec<VoiceInfo>) -> Self {
        self.voices = Arc::new(voices);
        self
    }

    /// How long each utterance plays before completing.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Report a failure at the end of every utterance.
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Utterances in the order they started.
    #[must_use]
    pub fn spoken(&self) -> Vec<Utterance> {
        lock(&self.spoken).clone()
    }

    /// Texts in the order they started.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        lock(&self.spoken).iter().map(|u| u.text.clone()).collect()
    }

    #[must_use]
    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryNarrator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NarrationDevice for InMemoryNarrator {
    async fn voices(&self) -> Vec<VoiceInfo> {
        self.voices.as_ref().clone()
    }

    async fn speak(&self, utterance: &Utterance) -> Result<(), DeviceError> {
        lock(&self.spoken).push(utterance.clone());
        let playing = lock(&self.playing).clone();

        tokio::select! {
            () = playing.cancelled() => {}
            () = tokio::time::sleep(self.duration) => {}
        }

        if self.fail {
            return Err(DeviceError::Failed("synthesis interrupted".into()));
        }
        Ok(())
    }

    async fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        let mut playing = lock(&self.playing);
        playing.cancel();
        *playing = CancellationToken::new();
    }
}

/// Haptic device that counts pulses.
#[derive(Clone, Default)]
pub struct InMemoryHaptics {
    pulses: Arc<Mutex<Vec<u32>>>,
    fail: bool,
}

impl InMemoryHaptics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Durations of accepted pulses, in milliseconds.
    #[must_use]
    pub fn pulses(&self) -> Vec<u32> {
        lock(&self.pulses).clone()
    }
}

impl HapticDevice for InMemoryHaptics {
    fn pulse(&self, duration_ms: u32) -> Result<(), DeviceError> {
        if self.fail {
            return Err(DeviceError::Unavailable);
        }
        lock(&self.pulses).push(duration_ms);
        Ok(())
    }
}
