pub mod intake;
pub mod phase;

pub use intake::{normalize_photo, PhotoIntake, DEBOUNCE_WINDOW, MAX_DIMENSION};
pub use phase::{CapturePhase, CaptureProgress};
