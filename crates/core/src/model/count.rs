use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors raised when building a `Count`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CountError {
    #[error("count must be between 0 and 9, got {value}")]
    OutOfRange { value: u32 },

    #[error("failed to parse count from {raw:?}")]
    Parse { raw: String },
}

//
// ─── COUNT ────────────────────────────────────────────────────────────────────
//

/// A single digit the child can press: always in `0..=9`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Count(u8);

const NUMBER_WORDS: [&str; 10] = [
    "Null", "Eins", "Zwei", "Drei", "Vier", "Fünf", "Sechs", "Sieben", "Acht", "Neun",
];

impl Count {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1);
    pub const MAX: Self = Self(9);

    /// Creates a `Count` from a raw value.
    ///
    /// # Errors
    ///
    /// Returns `CountError::OutOfRange` if the value is greater than 9.
    pub fn new(value: u8) -> Result<Self, CountError> {
        if value > Self::MAX.0 {
            return Err(CountError::OutOfRange {
                value: u32::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Returns the underlying value.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Spoken word for this digit.
    #[must_use]
    pub fn word(self) -> &'static str {
        NUMBER_WORDS[usize::from(self.0)]
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// All ten digits in ascending order.
    pub fn all() -> impl Iterator<Item = Count> {
        (0..=Self::MAX.0).map(Count)
    }
}

impl TryFrom<u8> for Count {
    type Error = CountError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Count> for u8 {
    fn from(count: Count) -> Self {
        count.0
    }
}

impl fmt::Debug for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Count({})", self.0)
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Count {
    type Err = CountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = s.trim().parse::<u32>().map_err(|_| CountError::Parse {
            raw: s.to_string(),
        })?;
        u8::try_from(parsed)
            .map_err(|_| CountError::OutOfRange { value: parsed })
            .and_then(Self::new)
    }
}
