use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use count_core::grammar::phrase;
use count_core::model::{Count, ObjectKind, PlaySettings, VoiceInfo};
use count_core::narration;

use super::state::{AnswerOutcome, Mode, SessionSnapshot, SessionState, SessionToken, TaskEpoch};
use crate::devices::HapticDevice;
use crate::error::SessionError;
use crate::quiz::{TaskGenerator, TaskSource};
use crate::speech::{SpeakOptions, SpeechCoordinator};
use crate::timer::RevealTimer;

/// Pause after a correct digit before the next task.
pub const NUMBER_ADVANCE_DELAY: Duration = Duration::from_millis(1200);
/// Pause after a correct tile; the affirmation is longer.
pub const OBJECT_ADVANCE_DELAY: Duration = Duration::from_millis(1400);
/// Vibration after the final phrase.
pub const FINAL_PULSE_MS: u32 = 60;

/// Owns the interaction state for free counting and the quiz.
///
/// Handlers are meant to be spawned per input event; each runs its sequence to
/// the end or until a newer interaction supersedes it.
#[derive(Clone)]
pub struct SessionController {
    state: Arc<Mutex<SessionState>>,
    speech: Arc<SpeechCoordinator>,
    haptics: Option<Arc<dyn HapticDevice>>,
    tasks: Arc<dyn TaskSource>,
    kind_pool: Arc<[ObjectKind]>,
    snapshots: Arc<watch::Sender<SessionSnapshot>>,
}

impl SessionController {
    #[must_use]
    pub fn new(settings: &PlaySettings, speech: SpeechCoordinator) -> Self {
        speech.set_profile(settings.speech().clone());
        speech.set_muted(settings.muted());

        let state = SessionState::new(settings);
        let (snapshots, _) = watch::channel(state.snapshot());

        Self {
            state: Arc::new(Mutex::new(state)),
            speech: Arc::new(speech),
            haptics: None,
            tasks: Arc::new(TaskGenerator::new()),
            kind_pool: Arc::from(ObjectKind::ALL.as_slice()),
            snapshots: Arc::new(snapshots),
        }
    }

    #[must_use]
    pub fn with_haptics(mut self, haptics: Arc<dyn HapticDevice>) -> Self {
        self.haptics = Some(haptics);
        self
    }

    #[must_use]
    pub fn with_task_source(mut self, tasks: Arc<dyn TaskSource>) -> Self {
        self.tasks = tasks;
        self
    }

    /// Restrict the object kinds used for quiz tasks.
    #[must_use]
    pub fn with_kind_pool(mut self, pool: &[ObjectKind]) -> Self {
        self.kind_pool = Arc::from(pool);
        self
    }

    #[must_use]
    pub fn speech(&self) -> &SpeechCoordinator {
        &self.speech
    }

    /// Latest published state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that wakes on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    fn update<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let result = f(&mut state);
        let snapshot = state.snapshot();
        drop(state);

        self.snapshots.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
        result
    }

    //
    // ─── INPUT EVENTS ──────────────────────────────────────────────────────────
    //

    /// A digit key or button was pressed.
    ///
    /// In free mode this starts a new count sequence; in a quiz it answers a
    /// number task and is ignored for object tasks.
    pub async fn press_digit(&self, digit: Count) {
        let mode = self.update(|s| s.mode());
        match mode {
            Mode::Free => self.run_count(digit).await,
            Mode::Quiz => self.answer_number(digit).await,
        }
    }

    /// An answer tile was tapped.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInQuiz` outside quiz mode and
    /// `SessionError::UnknownOption` for an index the current task does not have.
    pub async fn choose_option(&self, index: usize) -> Result<(), SessionError> {
        let outcome = self.update(|s| {
            let outcome = s.answer_option(index)?;
            let option = s.task().and_then(|t| t.option(index).copied());
            Ok::<_, SessionError>((outcome, option))
        })?;

        match outcome {
            (AnswerOutcome::Correct(epoch), Some(option)) => {
                let affirmation = narration::object_affirmation(&option);
                tokio::join!(
                    self.speech.speak(&affirmation, SpeakOptions::INTERRUPT),
                    self.advance_after(epoch, OBJECT_ADVANCE_DELAY),
                );
            }
            (AnswerOutcome::Incorrect, _) => {
                self.speech
                    .speak(narration::OBJECT_RETRY, SpeakOptions::INTERRUPT)
                    .await;
            }
            _ => {}
        }
        Ok(())
    }

    /// The icon kind was changed.
    pub async fn select_kind(&self, kind: ObjectKind) {
        if let Some(count) = self.update(|s| s.select_kind(kind)) {
            debug!(count = %count, kind = ?kind, "re-announcing final phrase");
            self.speak_final(count, kind).await;
            self.pulse();
        }
    }

    /// Switch quiz mode on or off. Turning it on generates the first task.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Quiz` if the first task cannot be generated.
    pub async fn set_quiz_mode(&self, enabled: bool) -> Result<(), SessionError> {
        let mode = if enabled { Mode::Quiz } else { Mode::Free };
        self.update(|s| s.set_mode(mode));
        self.enter_mode(enabled).await
    }

    /// Flip between free counting and the quiz in one step; returns whether
    /// the quiz is now on.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Quiz` if the first task cannot be generated.
    pub async fn toggle_quiz_mode(&self) -> Result<bool, SessionError> {
        let enabled = self.update(|s| {
            let enabled = s.mode() != Mode::Quiz;
            s.set_mode(if enabled { Mode::Quiz } else { Mode::Free });
            enabled
        });
        self.enter_mode(enabled).await?;
        Ok(enabled)
    }

    async fn enter_mode(&self, enabled: bool) -> Result<(), SessionError> {
        self.speech.stop_all().await;
        info!(enabled, "quiz mode changed");
        if !enabled {
            return Ok(());
        }

        match self.next_task().await {
            Err(err @ SessionError::Quiz(_)) => {
                self.update(|s| s.set_mode(Mode::Free));
                warn!(error = %err, "no quiz task; back to free counting");
                Err(err)
            }
            other => other,
        }
    }

    /// Replace the current quiz task with a fresh one and announce it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInQuiz` outside quiz mode, or a generator error.
    pub async fn next_task(&self) -> Result<(), SessionError> {
        if self.update(|s| s.mode()) != Mode::Quiz {
            return Err(SessionError::NotInQuiz);
        }
        let task = self.tasks.next_task(&self.kind_pool)?;
        let prompt = narration::task_prompt(&task);

        self.speech.stop_all().await;
        self.update(|s| s.install_task(task))?;
        self.speech.speak(&prompt, SpeakOptions::INTERRUPT).await;
        Ok(())
    }

    //
    // ─── SETTINGS ──────────────────────────────────────────────────────────────
    //

    pub fn set_muted(&self, muted: bool) {
        self.speech.set_muted(muted);
    }

    /// Apply new settings; they take effect for the next utterance and count.
    pub fn apply_settings(&self, settings: &PlaySettings) {
        self.speech.set_profile(settings.speech().clone());
        self.speech.set_muted(settings.muted());
        self.update(|s| s.set_reveal_period(settings.reveal_period()));
    }

    /// Pick the narration voice from what the device offers.
    pub async fn init_voice(&self) -> Option<VoiceInfo> {
        self.speech.select_default_voice().await
    }

    /// Supersede everything in flight and silence all output.
    pub async fn shutdown(&self) {
        self.update(|s| s.invalidate());
        self.speech.stop_all().await;
    }

    //
    // ─── SEQUENCES ─────────────────────────────────────────────────────────────
    //

    async fn run_count(&self, digit: Count) {
        let token = self.update(|s| s.invalidate());
        self.speech.stop_all().await;

        if !self.update(|s| s.start_count(token, digit)) {
            return superseded(token);
        }

        self.speech.speak(digit.word(), SpeakOptions::INTERRUPT).await;
        if !self.update(|s| s.start_animating(token)) {
            return superseded(token);
        }

        if !digit.is_zero() {
            let period = self.update(|s| s.reveal_period());
            let mut timer =
                RevealTimer::start(period, digit.value(), self.speech.animation_token());
            while let Some(visible) = timer.next().await {
                if !self.update(|s| s.reveal(token, visible)) {
                    return superseded(token);
                }
            }
        }

        let Some(kind) = self.update(|s| s.start_final(token)) else {
            return superseded(token);
        };
        self.speak_final(digit, kind).await;
        if !self.update(|s| s.is_current(token)) {
            return superseded(token);
        }
        self.pulse();

        if !self.update(|s| s.finish_count(token)) {
            superseded(token);
        }
    }

    async fn speak_final(&self, count: Count, kind: ObjectKind) {
        self.speech
            .speak(&phrase(count, kind), SpeakOptions::QUEUE)
            .await;
    }

    fn pulse(&self) {
        if let Some(haptics) = &self.haptics {
            if let Err(err) = haptics.pulse(FINAL_PULSE_MS) {
                debug!(error = %err, "haptic pulse failed");
            }
        }
    }

    async fn answer_number(&self, digit: Count) {
        match self.update(|s| s.answer_number(digit)) {
            AnswerOutcome::Correct(epoch) => {
                let affirmation = narration::number_affirmation(digit);
                tokio::join!(
                    self.speech.speak(&affirmation, SpeakOptions::INTERRUPT),
                    self.advance_after(epoch, NUMBER_ADVANCE_DELAY),
                );
            }
            AnswerOutcome::Incorrect => {
                self.speech
                    .speak(narration::NUMBER_RETRY, SpeakOptions::INTERRUPT)
                    .await;
            }
            AnswerOutcome::Ignored => {}
        }
    }

    /// Move on to a new task after `delay`, counted from the answer and not
    /// from the end of the affirmation. Skipped if the answered task was
    /// replaced or the quiz was left in the meantime.
    async fn advance_after(&self, epoch: TaskEpoch, delay: Duration) {
        tokio::time::sleep(delay).await;
        if !self.update(|s| s.is_task_current(epoch)) {
            debug!(?epoch, "task already replaced; skipping advance");
            return;
        }
        if let Err(err) = self.next_task().await {
            warn!(error = %err, "could not advance to the next task");
        }
    }
}

fn superseded(token: SessionToken) {
    debug!(session = %token, "count sequence superseded");
}
