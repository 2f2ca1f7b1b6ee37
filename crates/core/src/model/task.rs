use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Count, ObjectKind};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TaskError {
    #[error("object tasks need a target of at least one")]
    ZeroObjectTarget,

    #[error("expected exactly one correct option, found {found}")]
    CorrectOptionCount { found: usize },

    #[error("options must be pairwise distinct")]
    DuplicateOption,

    #[error("the correct option does not match the task target")]
    CorrectOptionMismatch,
}

//
// ─── TASK ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Press the digit that was named.
    NumberIdentification,
    /// Tap the tile showing the named amount of the named object.
    ObjectCount,
}

/// One tappable tile of an object-count task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnswerOption {
    pub count: Count,
    pub kind: ObjectKind,
    pub is_correct: bool,
}

impl AnswerOption {
    #[must_use]
    pub fn new(count: Count, kind: ObjectKind, is_correct: bool) -> Self {
        Self {
            count,
            kind,
            is_correct,
        }
    }
}

/// The active quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    kind: TaskKind,
    target: Count,
    target_kind: Option<ObjectKind>,
    options: Vec<AnswerOption>,
}

impl Task {
    /// A "find the number" task.
    #[must_use]
    pub fn number(target: Count) -> Self {
        Self {
            kind: TaskKind::NumberIdentification,
            target,
            target_kind: None,
            options: Vec::new(),
        }
    }

    /// An object-count task with its four options in presentation order.
    ///
    /// # Errors
    ///
    /// Returns `TaskError` if the target is zero, if the options are not pairwise
    /// distinct, or if there is not exactly one correct option matching the target.
    pub fn object_count(
        target: Count,
        target_kind: ObjectKind,
        options: [AnswerOption; 4],
    ) -> Result<Self, TaskError> {
        if target.is_zero() {
            return Err(TaskError::ZeroObjectTarget);
        }

        let correct: Vec<_> = options.iter().filter(|o| o.is_correct).collect();
        if correct.len() != 1 {
            return Err(TaskError::CorrectOptionCount {
                found: correct.len(),
            });
        }
        if correct[0].count != target || correct[0].kind != target_kind {
            return Err(TaskError::CorrectOptionMismatch);
        }

        let distinct: HashSet<_> = options.iter().map(|o| (o.count, o.kind)).collect();
        if distinct.len() != options.len() {
            return Err(TaskError::DuplicateOption);
        }

        Ok(Self {
            kind: TaskKind::ObjectCount,
            target,
            target_kind: Some(target_kind),
            options: options.to_vec(),
        })
    }

    #[must_use]
    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    #[must_use]
    pub fn target(&self) -> Count {
        self.target
    }

    /// Target object for object-count tasks.
    #[must_use]
    pub fn target_kind(&self) -> Option<ObjectKind> {
        self.target_kind
    }

    /// Options in presentation order; empty for number tasks.
    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&AnswerOption> {
        self.options.get(index)
    }
}

/// Result of the latest answer to the current task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    #[default]
    None,
    Correct,
    Incorrect,
}
