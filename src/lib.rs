//! Session lifecycle core for photo-bracketed work sessions.
//!
//! A session is bounded by two capture checkpoints: a start bracket and an
//! end bracket, each requiring a workspace shot and a selfie. The crate owns
//! the accumulation-based timer, the capture-phase sequencer, the debounced
//! photo intake pipeline and the finalize handoff to persistence and sync
//! collaborators. Rendering, camera hardware and storage live behind the
//! traits in [`camera`], [`clock`] and [`session::handoff`].

pub mod camera;
pub mod capture;
pub mod clock;
pub mod logging;
pub mod models;
pub mod session;
pub mod timer;

pub use camera::{CameraCapability, CameraFacing};
pub use capture::{CapturePhase, CaptureProgress, PhotoIntake};
pub use clock::{Clock, MonotonicClock};
pub use models::{format_elapsed, SessionAssets, SessionRecord};
pub use session::{SessionController, SessionSnapshot, SessionStore, SessionSync};
pub use timer::{TimerState, TimerStatus};
