use std::time::Instant;

/// Monotonic time source for the session core.
///
/// All elapsed-time arithmetic goes through this seam so the state machine can
/// be driven by a scripted clock in tests. Implementations must be immune to
/// wall-clock adjustments.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

/// Production clock backed by `std::time::Instant`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
