mod controller;
mod state;

// Public API of the session subsystem.
pub use controller::{
    FINAL_PULSE_MS, NUMBER_ADVANCE_DELAY, OBJECT_ADVANCE_DELAY, SessionController,
};
pub use state::{FreePhase, Mode, SessionSnapshot, SessionToken};
