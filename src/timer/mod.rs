pub mod state;

pub use state::{TimerState, TimerStatus};
