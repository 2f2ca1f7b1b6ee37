#![forbid(unsafe_code)]

pub mod devices;
pub mod error;
pub mod quiz;
pub mod session;
pub mod speech;
pub mod timer;

pub use error::{DeviceError, QuizError, SessionError};

pub use devices::{HapticDevice, InMemoryHaptics, InMemoryNarrator, NarrationDevice};
pub use quiz::{TaskGenerator, TaskSource};
pub use session::{FreePhase, Mode, SessionController, SessionSnapshot, SessionToken};
pub use speech::{SpeakOptions, SpeechCoordinator};
pub use timer::RevealTimer;
