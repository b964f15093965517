use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
}

impl Default for TimerStatus {
    fn default() -> Self {
        TimerStatus::Idle
    }
}

/// Accumulation-based session timer.
///
/// Elapsed time is the sum of closed run intervals (`accumulated`) plus the
/// open interval since `run_anchor` while running. `frozen` holds the total
/// snapshotted when a stop is requested, so the display can stay constant
/// while the end-of-session capture flow is in progress.
///
/// `run_anchor` is Some iff the status is Running. Transitions with unmet
/// preconditions are silent no-ops.
#[derive(Debug, Clone, Default)]
pub struct TimerState {
    status: TimerStatus,
    accumulated: Duration,
    run_anchor: Option<Instant>,
    frozen: Duration,
}

impl TimerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }

    pub fn frozen(&self) -> Duration {
        self.frozen
    }

    /// Begins a fresh session. Only valid from idle with nothing accumulated.
    pub fn start(&mut self, now: Instant) {
        if self.status != TimerStatus::Idle || !self.accumulated.is_zero() {
            return;
        }
        self.run_anchor = Some(now);
        self.status = TimerStatus::Running;
    }

    /// Resumes a session that has banked time but is not currently running.
    /// Covers the paused state and the stopped-idle fallback.
    pub fn resume(&mut self, now: Instant) {
        if self.status == TimerStatus::Running || self.accumulated.is_zero() {
            return;
        }
        self.run_anchor = Some(now);
        self.status = TimerStatus::Running;
    }

    pub fn pause(&mut self, now: Instant) {
        if self.status != TimerStatus::Running {
            return;
        }
        self.fold_open_interval(now);
        self.status = TimerStatus::Paused;
    }

    /// Folds the open interval like `pause`, but leaves the session in a
    /// distinct stopped-for-capture condition (neither running nor paused;
    /// the active end bracket represents it) and snapshots the total into
    /// `frozen` for display.
    pub fn stop_and_freeze(&mut self, now: Instant) {
        if self.status == TimerStatus::Running {
            self.fold_open_interval(now);
        }
        self.status = TimerStatus::Idle;
        self.frozen = self.accumulated;
    }

    /// Undoes `stop_and_freeze` when the end bracket is cancelled: the session
    /// resumes running exactly where it was when stop was requested.
    pub fn restore_from_freeze(&mut self, now: Instant) {
        self.accumulated = self.frozen;
        self.run_anchor = Some(now);
        self.status = TimerStatus::Running;
    }

    pub fn reset_to_zero(&mut self) {
        *self = Self::default();
    }

    /// Pure read; safe to evaluate on every redraw tick.
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        match (self.status, self.run_anchor) {
            (TimerStatus::Running, Some(anchor)) => {
                self.accumulated + now.saturating_duration_since(anchor)
            }
            _ => self.accumulated,
        }
    }

    fn fold_open_interval(&mut self, now: Instant) {
        if let Some(anchor) = self.run_anchor.take() {
            self.accumulated += now.saturating_duration_since(anchor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: f64) -> Duration {
        Duration::from_secs_f64(n)
    }

    #[test]
    fn test_accumulates_across_pause_resume_cycles() {
        let base = Instant::now();
        let mut timer = TimerState::new();

        timer.start(base);
        timer.pause(base + secs(2.0));
        assert_eq!(timer.elapsed_at(base + secs(3.0)), secs(2.0));

        timer.resume(base + secs(5.0));
        timer.pause(base + secs(6.5));
        assert_eq!(timer.elapsed_at(base + secs(10.0)), secs(3.5));

        timer.resume(base + secs(12.0));
        assert_eq!(timer.elapsed_at(base + secs(14.0)), secs(5.5));
    }

    #[test]
    fn test_start_requires_fresh_idle_state() {
        let base = Instant::now();
        let mut timer = TimerState::new();

        timer.start(base);
        timer.pause(base + secs(4.0));

        // Banked time: start must not re-anchor from zero.
        timer.start(base + secs(9.0));
        assert_eq!(timer.status(), TimerStatus::Paused);
        assert_eq!(timer.elapsed_at(base + secs(9.0)), secs(4.0));
    }

    #[test]
    fn test_pause_while_not_running_is_noop() {
        let base = Instant::now();
        let mut timer = TimerState::new();

        timer.pause(base);
        assert_eq!(timer.status(), TimerStatus::Idle);

        timer.start(base);
        timer.pause(base + secs(1.0));
        timer.pause(base + secs(2.0));
        assert_eq!(timer.elapsed_at(base + secs(2.0)), secs(1.0));
    }

    #[test]
    fn test_resume_requires_banked_time() {
        let base = Instant::now();
        let mut timer = TimerState::new();

        timer.resume(base);
        assert_eq!(timer.status(), TimerStatus::Idle);
        assert_eq!(timer.elapsed_at(base + secs(5.0)), Duration::ZERO);
    }

    #[test]
    fn test_freeze_then_restore_preserves_elapsed() {
        let base = Instant::now();
        let mut timer = TimerState::new();

        timer.start(base);
        timer.stop_and_freeze(base + secs(4.0));
        assert_eq!(timer.status(), TimerStatus::Idle);
        assert_eq!(timer.frozen(), secs(4.0));
        // Display value does not drift while stopped.
        assert_eq!(timer.elapsed_at(base + secs(30.0)), secs(4.0));

        timer.restore_from_freeze(base + secs(10.0));
        assert_eq!(timer.status(), TimerStatus::Running);
        assert_eq!(timer.elapsed_at(base + secs(10.0)), secs(4.0));
        assert_eq!(timer.elapsed_at(base + secs(12.0)), secs(6.0));
    }

    #[test]
    fn test_stop_and_freeze_from_paused_keeps_total() {
        let base = Instant::now();
        let mut timer = TimerState::new();

        timer.start(base);
        timer.pause(base + secs(7.0));
        timer.stop_and_freeze(base + secs(20.0));
        assert_eq!(timer.frozen(), secs(7.0));
        assert_eq!(timer.status(), TimerStatus::Idle);
    }

    #[test]
    fn test_reset_to_zero_clears_everything() {
        let base = Instant::now();
        let mut timer = TimerState::new();

        timer.start(base);
        timer.stop_and_freeze(base + secs(3.0));
        timer.reset_to_zero();

        assert_eq!(timer.status(), TimerStatus::Idle);
        assert_eq!(timer.accumulated(), Duration::ZERO);
        assert_eq!(timer.frozen(), Duration::ZERO);
    }
}
