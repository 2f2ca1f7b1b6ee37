use std::fmt;
use std::time::Duration;

use count_core::model::{Count, Feedback, ObjectKind, PlaySettings, Task, TaskKind};

use crate::error::SessionError;

//
// ─── TOKENS ────────────────────────────────────────────────────────────────────
//

/// Identifies one run of the count sequence. A newer token supersedes all older ones.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SessionToken(u64);

impl SessionToken {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken({})", self.0)
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies the task an answer was given for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct TaskEpoch(u64);

//
// ─── MODES ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Free,
    Quiz,
}

/// Where the free-mode count sequence currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FreePhase {
    #[default]
    Idle,
    Narrating,
    Animating,
    NarratingFinal,
}

/// What an answer did to the current task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AnswerOutcome {
    Ignored,
    Correct(TaskEpoch),
    Incorrect,
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Everything the rendering layer needs to draw the board.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub mode: Mode,
    pub phase: FreePhase,
    pub session: SessionToken,
    pub selected: Option<Count>,
    pub displayed_count: u8,
    pub target: Count,
    pub active_kind: ObjectKind,
    pub busy: bool,
    pub task: Option<Task>,
    pub feedback: Feedback,
}

//
// ─── STATE MACHINE ─────────────────────────────────────────────────────────────
//

/// Shared interaction state. Every input event has exactly one transition here.
#[derive(Debug, Clone)]
pub(crate) struct SessionState {
    mode: Mode,
    phase: FreePhase,
    session: SessionToken,
    selected: Option<Count>,
    displayed_count: u8,
    target: Count,
    active_kind: ObjectKind,
    busy: bool,
    task: Option<Task>,
    feedback: Feedback,
    epoch: TaskEpoch,
    reveal_period: Duration,
}

impl SessionState {
    pub(crate) fn new(settings: &PlaySettings) -> Self {
        Self {
            mode: Mode::Free,
            phase: FreePhase::Idle,
            session: SessionToken::default(),
            selected: None,
            displayed_count: 0,
            target: Count::ZERO,
            active_kind: settings.initial_kind(),
            busy: false,
            task: None,
            feedback: Feedback::None,
            epoch: TaskEpoch::default(),
            reveal_period: settings.reveal_period(),
        }
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode,
            phase: self.phase,
            session: self.session,
            selected: self.selected,
            displayed_count: self.displayed_count,
            target: self.target,
            active_kind: self.active_kind,
            busy: self.busy,
            task: self.task.clone(),
            feedback: self.feedback,
        }
    }

    pub(crate) fn mode(&self) -> Mode {
        self.mode
    }

    pub(crate) fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    pub(crate) fn reveal_period(&self) -> Duration {
        self.reveal_period
    }

    pub(crate) fn set_reveal_period(&mut self, period: Duration) {
        self.reveal_period = PlaySettings::clamp_reveal_period(period);
    }

    pub(crate) fn is_current(&self, token: SessionToken) -> bool {
        self.session == token
    }

    /// Supersede every running sequence.
    pub(crate) fn invalidate(&mut self) -> SessionToken {
        self.session = self.session.next();
        self.session
    }

    fn clear_counting(&mut self) {
        self.phase = FreePhase::Idle;
        self.selected = None;
        self.displayed_count = 0;
        self.target = Count::ZERO;
        self.busy = false;
    }

    // ── free mode ───────────────────────────────────────────────────────────

    /// A digit was pressed in free mode: start narrating it.
    pub(crate) fn start_count(&mut self, token: SessionToken, digit: Count) -> bool {
        if !self.is_current(token) || self.mode != Mode::Free {
            return false;
        }
        self.phase = FreePhase::Narrating;
        self.busy = true;
        self.selected = Some(digit);
        self.target = digit;
        self.displayed_count = 0;
        true
    }

    pub(crate) fn start_animating(&mut self, token: SessionToken) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.phase = FreePhase::Animating;
        true
    }

    pub(crate) fn reveal(&mut self, token: SessionToken, visible: u8) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.displayed_count = visible.min(self.target.value());
        true
    }

    /// All icons are shown; returns the kind to name in the final phrase.
    pub(crate) fn start_final(&mut self, token: SessionToken) -> Option<ObjectKind> {
        if !self.is_current(token) || self.displayed_count != self.target.value() {
            return None;
        }
        self.phase = FreePhase::NarratingFinal;
        Some(self.active_kind)
    }

    pub(crate) fn finish_count(&mut self, token: SessionToken) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.phase = FreePhase::Idle;
        self.busy = false;
        true
    }

    /// Change the icon kind; returns the count to re-announce when a finished
    /// count is on screen.
    pub(crate) fn select_kind(&mut self, kind: ObjectKind) -> Option<Count> {
        let changed = self.active_kind != kind;
        self.active_kind = kind;

        let settled = matches!(self.phase, FreePhase::Idle | FreePhase::NarratingFinal);
        match self.selected {
            Some(selected)
                if changed
                    && settled
                    && self.mode == Mode::Free
                    && selected == self.target
                    && self.displayed_count == self.target.value() =>
            {
                Some(selected)
            }
            _ => None,
        }
    }

    // ── quiz mode ───────────────────────────────────────────────────────────

    pub(crate) fn set_mode(&mut self, mode: Mode) -> SessionToken {
        let token = self.invalidate();
        self.mode = mode;
        self.clear_counting();
        self.feedback = Feedback::None;
        self.task = None;
        self.epoch = TaskEpoch(self.epoch.0.wrapping_add(1));
        token
    }

    /// Make `task` the active question.
    pub(crate) fn install_task(&mut self, task: Task) -> Result<TaskEpoch, SessionError> {
        if self.mode != Mode::Quiz {
            return Err(SessionError::NotInQuiz);
        }
        self.invalidate();
        self.clear_counting();
        self.feedback = Feedback::None;
        self.task = Some(task);
        self.epoch = TaskEpoch(self.epoch.0.wrapping_add(1));
        Ok(self.epoch)
    }

    pub(crate) fn is_task_current(&self, epoch: TaskEpoch) -> bool {
        self.mode == Mode::Quiz && self.epoch == epoch
    }

    /// A digit was pressed during a quiz.
    pub(crate) fn answer_number(&mut self, digit: Count) -> AnswerOutcome {
        let Some(task) = self.task.as_ref() else {
            return AnswerOutcome::Ignored;
        };
        if self.mode != Mode::Quiz || task.kind() != TaskKind::NumberIdentification {
            return AnswerOutcome::Ignored;
        }

        if digit == task.target() {
            self.feedback = Feedback::Correct;
            AnswerOutcome::Correct(self.epoch)
        } else {
            self.feedback = Feedback::Incorrect;
            AnswerOutcome::Incorrect
        }
    }

    /// An option tile was tapped during a quiz.
    pub(crate) fn answer_option(&mut self, index: usize) -> Result<AnswerOutcome, SessionError> {
        if self.mode != Mode::Quiz {
            return Err(SessionError::NotInQuiz);
        }
        let Some(task) = self.task.as_ref() else {
            return Ok(AnswerOutcome::Ignored);
        };
        if task.kind() != TaskKind::ObjectCount {
            return Ok(AnswerOutcome::Ignored);
        }
        let option = *task
            .option(index)
            .ok_or(SessionError::UnknownOption { index })?;

        self.selected = None;
        self.displayed_count = option.count.value();
        self.target = option.count;

        if option.is_correct {
            self.feedback = Feedback::Correct;
            Ok(AnswerOutcome::Correct(self.epoch))
        } else {
            self.feedback = Feedback::Incorrect;
            Ok(AnswerOutcome::Incorrect)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use count_core::model::AnswerOption;

    fn count(value: u8) -> Count {
        Count::new(value).unwrap()
    }

    fn object_task() -> Task {
        Task::object_count(
            count(4),
            ObjectKind::Star,
            [
                AnswerOption::new(count(2), ObjectKind::Star, false),
                AnswerOption::new(count(4), ObjectKind::Star, true),
                AnswerOption::new(count(4), ObjectKind::Apple, false),
                AnswerOption::new(count(2), ObjectKind::Apple, false),
            ],
        )
        .unwrap()
    }

    #[test]
    fn stale_token_cannot_mutate() {
        let mut state = SessionState::new(&PlaySettings::default());
        let first = state.invalidate();
        assert!(state.start_count(first, count(5)));
        let second = state.invalidate();
        assert!(state.start_count(second, count(2)));

        assert!(!state.start_animating(first));
        assert!(!state.reveal(first, 3));
        assert_eq!(state.start_final(first), None);
        assert!(!state.finish_count(first));

        let snapshot = state.snapshot();
        assert_eq!(snapshot.selected, Some(count(2)));
        assert_eq!(snapshot.displayed_count, 0);
        assert!(snapshot.busy);
    }

    #[test]
    fn final_requires_all_icons() {
        let mut state = SessionState::new(&PlaySettings::default());
        let token = state.invalidate();
        state.start_count(token, count(2));
        state.start_animating(token);
        state.reveal(token, 1);
        assert_eq!(state.start_final(token), None);
        state.reveal(token, 2);
        assert_eq!(state.start_final(token), Some(ObjectKind::Balloon));
        assert!(state.finish_count(token));
        assert!(!state.snapshot().busy);
    }

    #[test]
    fn kind_change_replays_only_after_count_finished() {
        let mut state = SessionState::new(&PlaySettings::default());
        assert_eq!(state.select_kind(ObjectKind::Star), None);

        let token = state.invalidate();
        state.start_count(token, count(1));
        state.start_animating(token);
        assert_eq!(state.select_kind(ObjectKind::Apple), None);

        state.reveal(token, 1);
        state.start_final(token);
        state.finish_count(token);
        assert_eq!(state.select_kind(ObjectKind::Flower), Some(count(1)));
        assert_eq!(state.select_kind(ObjectKind::Flower), None);
    }

    #[test]
    fn digits_are_ignored_for_object_tasks() {
        let mut state = SessionState::new(&PlaySettings::default());
        state.set_mode(Mode::Quiz);
        state.install_task(object_task()).unwrap();
        assert_eq!(state.answer_number(count(4)), AnswerOutcome::Ignored);
        assert_eq!(state.snapshot().feedback, Feedback::None);
    }

    #[test]
    fn option_answers_set_feedback() {
        let mut state = SessionState::new(&PlaySettings::default());
        state.set_mode(Mode::Quiz);
        let epoch = state.install_task(object_task()).unwrap();

        assert_eq!(state.answer_option(0).unwrap(), AnswerOutcome::Incorrect);
        assert_eq!(state.snapshot().feedback, Feedback::Incorrect);
        assert_eq!(state.snapshot().displayed_count, 2);

        assert_eq!(state.answer_option(1).unwrap(), AnswerOutcome::Correct(epoch));
        assert_eq!(state.snapshot().feedback, Feedback::Correct);
        assert_eq!(
            state.answer_option(9).unwrap_err(),
            SessionError::UnknownOption { index: 9 }
        );
    }

    #[test]
    fn leaving_quiz_invalidates_pending_advance() {
        let mut state = SessionState::new(&PlaySettings::default());
        state.set_mode(Mode::Quiz);
        let epoch = state.install_task(Task::number(count(3))).unwrap();
        assert!(state.is_task_current(epoch));

        state.set_mode(Mode::Free);
        assert!(!state.is_task_current(epoch));
        assert_eq!(state.snapshot().task, None);
        assert_eq!(
            state.install_task(Task::number(count(1))).unwrap_err(),
            SessionError::NotInQuiz
        );
    }
}
