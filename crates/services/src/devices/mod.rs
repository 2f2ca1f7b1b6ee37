//! Contracts for the output devices the session engine drives.

mod memory;

use async_trait::async_trait;

use count_core::model::{Utterance, VoiceInfo};

use crate::error::DeviceError;

pub use memory::{InMemoryHaptics, InMemoryNarrator};

/// Text-to-speech output.
///
/// `speak` must return once the utterance has finished, failed, or been cut
/// short by `cancel`. The device plays at most one utterance at a time only if
/// callers cancel before speaking; otherwise it may queue.
#[async_trait]
pub trait NarrationDevice: Send + Sync {
    /// Voices installed on the device.
    async fn voices(&self) -> Vec<VoiceInfo>;

    /// Speak one utterance and wait for it to end.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError` if the device reports a failure mid-utterance.
    async fn speak(&self, utterance: &Utterance) -> Result<(), DeviceError>;

    /// Stop whatever is currently playing. Must be safe to call when idle.
    async fn cancel(&self);
}

/// Vibration output, best-effort.
pub trait HapticDevice: Send + Sync {
    /// Vibrate for `duration_ms` milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError` if the device rejects the request.
    fn pulse(&self, duration_ms: u32) -> Result<(), DeviceError>;
}
