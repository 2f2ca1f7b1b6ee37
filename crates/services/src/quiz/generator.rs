use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use tracing::debug;

use count_core::model::{AnswerOption, Count, ObjectKind, Task};

use crate::error::QuizError;

/// Anything that can hand out the next quiz task.
pub trait TaskSource: Send + Sync {
    /// Produce a new task using object kinds from `pool`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the pool cannot support an object-count task.
    fn next_task(&self, pool: &[ObjectKind]) -> Result<Task, QuizError>;
}

/// Picks a wrong count for an object task.
///
/// `draw` is a uniform draw from `1..=9`. A draw equal to the target is shifted
/// to `(draw % 9) + 1`, which is always a different value in `1..=9`.
#[must_use]
pub fn remap_decoy_count(draw: u8, target: u8) -> u8 {
    if draw == target { (draw % 9) + 1 } else { draw }
}

/// Random task generator.
pub struct TaskGenerator<R = StdRng> {
    rng: Mutex<R>,
}

impl TaskGenerator<StdRng> {
    /// Generator seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Reproducible generator for tests and demos.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for TaskGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> TaskGenerator<R> {
    #[must_use]
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Build the next task.
    ///
    /// Half of the tasks ask for a digit in `0..=9`; the other half ask for an
    /// amount in `1..=9` of one object kind among four tiles.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::KindPoolTooSmall` if `pool` has fewer than two distinct kinds.
    pub fn generate(&self, pool: &[ObjectKind]) -> Result<Task, QuizError> {
        let mut kinds = pool.to_vec();
        kinds.sort_unstable();
        kinds.dedup();
        if kinds.len() < 2 {
            return Err(QuizError::KindPoolTooSmall { len: kinds.len() });
        }

        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        if rng.random_bool(0.5) {
            let target = Count::new(rng.random_range(0..=9))?;
            debug!(target = %target, "generated number task");
            return Ok(Task::number(target));
        }

        let target_value: u8 = rng.random_range(1..=9);
        let decoy_value = remap_decoy_count(rng.random_range(1..=9), target_value);

        let target_kind = *kinds
            .choose(&mut *rng)
            .ok_or(QuizError::KindPoolTooSmall { len: 0 })?;
        let remaining: Vec<ObjectKind> =
            kinds.into_iter().filter(|k| *k != target_kind).collect();
        let decoy_kind = *remaining
            .choose(&mut *rng)
            .ok_or(QuizError::KindPoolTooSmall { len: 1 })?;

        let target = Count::new(target_value)?;
        let decoy = Count::new(decoy_value)?;

        let mut options = [
            AnswerOption::new(target, target_kind, true),
            AnswerOption::new(target, decoy_kind, false),
            AnswerOption::new(decoy, target_kind, false),
            AnswerOption::new(decoy, decoy_kind, false),
        ];
        options.as_mut_slice().shuffle(&mut *rng);

        let task = Task::object_count(target, target_kind, options)?;
        debug!(
            target = %target,
            kind = ?target_kind,
            decoy = %decoy,
            decoy_kind = ?decoy_kind,
            "generated object task"
        );
        Ok(task)
    }
}

impl<R: Rng + Send> TaskSource for TaskGenerator<R> {
    fn next_task(&self, pool: &[ObjectKind]) -> Result<Task, QuizError> {
        self.generate(pool)
    }
}
