//! Shared error types for the services crate.

use thiserror::Error;

use count_core::model::{CountError, TaskError};

/// Errors reported by narration and haptic devices.
///
/// These never leave the services layer: callers observe silence instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeviceError {
    #[error("device is not available")]
    Unavailable,
    #[error("device failed: {0}")]
    Failed(String),
}

/// Errors emitted by the task generator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("object tasks need at least two kinds in the pool, got {len}")]
    KindPoolTooSmall { len: usize },
    #[error(transparent)]
    Count(#[from] CountError),
    #[error(transparent)]
    Task(#[from] TaskError),
}

/// Errors emitted by `SessionController`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("quiz mode is not active")]
    NotInQuiz,
    #[error("no option at index {index}")]
    UnknownOption { index: usize },
    #[error(transparent)]
    Quiz(#[from] QuizError),
}
