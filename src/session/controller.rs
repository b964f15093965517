use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::Utc;
use log::{error, info, warn};
use serde::Serialize;
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    camera::{CameraCapability, CameraFacing},
    capture::{normalize_photo, CapturePhase, CaptureProgress, PhotoIntake},
    clock::Clock,
    models::SessionRecord,
    session::{SessionStore, SessionSync},
    timer::{TimerState, TimerStatus},
};

/// Settle delay between the start bracket finishing and the timer actually
/// starting, so the first tick does not race the capture UI dismissal.
const SETTLE_DELAY: Duration = Duration::from_millis(350);

/// Presentation-facing view of the core, recomputed on demand and broadcast
/// on every transition.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub status: TimerStatus,
    pub elapsed_secs: f64,
    pub show_camera: bool,
    pub phase_label: Option<&'static str>,
}

#[derive(Default)]
struct CoreState {
    timer: TimerState,
    progress: CaptureProgress,
    bracket_open: bool,
    intake: PhotoIntake,
    /// Bumped by restart and every bracket request; a deferred timer start
    /// only fires when its generation still matches.
    generation: u64,
}

impl CoreState {
    fn active_phase(&self) -> Option<CapturePhase> {
        self.progress.active_phase(self.bracket_open)
    }

    fn end_bracket_active(&self) -> bool {
        self.active_phase().map_or(false, |p| p.is_end_bracket())
    }

    fn display_elapsed(&self, now: Instant) -> Duration {
        if self.end_bracket_active() {
            self.timer.frozen()
        } else {
            self.timer.elapsed_at(now)
        }
    }

    fn snapshot(&self, now: Instant) -> SessionSnapshot {
        SessionSnapshot {
            status: self.timer.status(),
            elapsed_secs: self.display_elapsed(now).as_secs_f64(),
            show_camera: self.bracket_open,
            phase_label: self.active_phase().map(|p| p.label()),
        }
    }
}

/// Orchestrates the session lifecycle: the accumulation timer, the two
/// capture brackets, photo intake and the finalize handoff.
///
/// Mutating operations are expected to arrive sequentially from one
/// coordinating context; the only background work is the deferred timer start
/// and the fire-and-forget save/sync dispatch, neither of which shares
/// mutable state with the caller.
#[derive(Clone)]
pub struct SessionController {
    state: Arc<Mutex<CoreState>>,
    clock: Arc<dyn Clock>,
    camera: Arc<dyn CameraCapability>,
    store: Arc<dyn SessionStore>,
    sync: Arc<dyn SessionSync>,
    deferred_start: Arc<Mutex<Option<(CancellationToken, JoinHandle<()>)>>>,
    events: Arc<watch::Sender<SessionSnapshot>>,
    settle_delay: Duration,
}

impl SessionController {
    pub fn new(
        clock: Arc<dyn Clock>,
        camera: Arc<dyn CameraCapability>,
        store: Arc<dyn SessionStore>,
        sync: Arc<dyn SessionSync>,
    ) -> Self {
        let initial = CoreState::default();
        let (events, _) = watch::channel(initial.snapshot(clock.now()));

        Self {
            state: Arc::new(Mutex::new(initial)),
            clock,
            camera,
            store,
            sync,
            deferred_start: Arc::new(Mutex::new(None)),
            events: Arc::new(events),
            settle_delay: SETTLE_DELAY,
        }
    }

    /// Overrides the capture-UI settle delay (tests).
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.events.subscribe()
    }

    /// Pure read for per-frame rendering.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        state.snapshot(self.clock.now())
    }

    /// Elapsed time as shown to the user: live while running, frozen while an
    /// end bracket is open, banked total otherwise.
    pub async fn live_elapsed(&self) -> Duration {
        let state = self.state.lock().await;
        state.display_elapsed(self.clock.now())
    }

    /// Start button: opens the start bracket for a fresh session, or resumes
    /// one with banked time.
    pub async fn start_or_resume(&self) {
        let mut state = self.state.lock().await;
        if state.bracket_open || state.timer.status() == TimerStatus::Running {
            return;
        }

        if state.timer.accumulated().is_zero() {
            if !matches!(state.progress, CaptureProgress::Empty) {
                // Start bracket already done, timer start still settling.
                return;
            }
            state.generation += 1;
            state.progress = CaptureProgress::Empty;
            state.bracket_open = true;
            self.ensure_facing(CameraFacing::Back);
            info!("start bracket opened");
        } else {
            state.timer.resume(self.clock.now());
        }
        self.emit(&state);
    }

    pub async fn pause(&self) {
        let mut state = self.state.lock().await;
        state.timer.pause(self.clock.now());
        self.emit(&state);
    }

    /// Stop button: freezes the elapsed display and opens the end bracket.
    /// The session stays recoverable until both end photos are taken.
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        if state.bracket_open || !matches!(state.progress, CaptureProgress::StartDone { .. }) {
            return;
        }

        state.generation += 1;
        state.timer.stop_and_freeze(self.clock.now());
        state.bracket_open = true;
        self.ensure_facing(CameraFacing::Back);
        info!(
            "end bracket opened at frozen elapsed {:.2}s",
            state.timer.frozen().as_secs_f64()
        );
        self.emit(&state);
    }

    /// Raw shutter callback from the capture presentation layer.
    pub async fn on_raw_capture(&self, raw: &[u8]) {
        let mut state = self.state.lock().await;

        if !state.intake.accept(self.clock.now()) {
            info!("capture inside debounce window, dropped");
            return;
        }

        let Some(phase) = state.active_phase() else {
            // Stray late camera callback.
            return;
        };

        let photo = match normalize_photo(raw) {
            Ok(photo) => photo,
            Err(err) => {
                warn!("photo normalization failed, retake needed: {err:#}");
                return;
            }
        };

        let progress = std::mem::take(&mut state.progress);
        state.progress = progress.advanced_with(photo);

        match phase {
            CapturePhase::StartWorkspace | CapturePhase::EndWorkspace => {
                self.ensure_facing(CameraFacing::Front);
            }
            CapturePhase::StartSelfie => {
                state.bracket_open = false;
                let generation = state.generation;
                self.schedule_deferred_start(generation).await;
                info!("start bracket complete, timer starts after settle delay");
            }
            CapturePhase::EndSelfie => {
                state.bracket_open = false;
                self.finalize(&mut state);
            }
        }
        self.emit(&state);
    }

    /// User backed out of the capture UI.
    pub async fn cancel_capture(&self) {
        let mut state = self.state.lock().await;
        let Some(phase) = state.active_phase() else {
            return;
        };

        state.bracket_open = false;
        if phase.is_end_bracket() {
            // Resume the same session where Stop left it.
            let progress = std::mem::take(&mut state.progress);
            state.progress = progress.discard_end_bracket();
            state.timer.restore_from_freeze(self.clock.now());
            info!("end bracket cancelled, session resumed");
        } else {
            state.progress = CaptureProgress::Empty;
            self.camera.reset_to_default_facing();
            info!("start bracket cancelled, session not started");
        }
        self.emit(&state);
    }

    /// Hard reset from any state: abandons capture flows, assets, elapsed
    /// time and any pending deferred timer start.
    pub async fn restart_session(&self) {
        let mut state = self.state.lock().await;
        state.generation += 1;
        state.bracket_open = false;
        state.progress = CaptureProgress::Empty;
        state.timer.reset_to_zero();
        self.cancel_deferred_start().await;
        self.camera.reset_to_default_facing();
        info!("session restarted");
        self.emit(&state);
    }

    /// Runs when the end bracket completes. Resets core state synchronously
    /// so a new session can begin immediately, then hands the record off.
    fn finalize(&self, state: &mut CoreState) {
        let CaptureProgress::Complete(assets) = std::mem::take(&mut state.progress) else {
            return;
        };

        let record = SessionRecord {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            duration_secs: state.timer.frozen().as_secs_f64().round() as u64,
            assets,
        };

        state.generation += 1;
        state.timer.reset_to_zero();
        self.camera.reset_to_default_facing();

        info!(
            "session {} finalized at {}s, dispatching save + sync",
            record.id, record.duration_secs
        );
        self.dispatch_handoff(record);
    }

    /// Fire-and-forget: persistence and sync run independently, failures are
    /// logged and never reach the state machine.
    fn dispatch_handoff(&self, record: SessionRecord) {
        let store = Arc::clone(&self.store);
        let for_store = record.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(err) = store.save(&for_store) {
                error!("session save failed for {}: {err:#}", for_store.id);
            }
        });

        let sync = Arc::clone(&self.sync);
        tokio::task::spawn_blocking(move || {
            if let Err(err) =
                sync.upload_and_insert(record.created_at, record.duration_secs, &record.assets)
            {
                error!("session sync failed for {}: {err:#}", record.id);
            }
        });
    }

    async fn schedule_deferred_start(&self, generation: u64) {
        let mut guard = self.deferred_start.lock().await;
        if let Some((token, handle)) = guard.take() {
            token.cancel();
            handle.abort();
        }

        let token = CancellationToken::new();
        let task_token = token.clone();
        let state = Arc::clone(&self.state);
        let clock = Arc::clone(&self.clock);
        let events = Arc::clone(&self.events);
        let delay = self.settle_delay;

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = task_token.cancelled() => return,
            }

            let mut state = state.lock().await;
            if state.generation != generation {
                // Flow was restarted or superseded while settling.
                return;
            }
            state.timer.start(clock.now());
            events.send_replace(state.snapshot(clock.now()));
        });

        *guard = Some((token, handle));
    }

    async fn cancel_deferred_start(&self) {
        if let Some((token, handle)) = self.deferred_start.lock().await.take() {
            token.cancel();
            handle.abort();
        }
    }

    fn ensure_facing(&self, facing: CameraFacing) {
        if !self.camera.is_current_facing(facing) {
            self.camera.prepare(facing);
        }
    }

    fn emit(&self, state: &CoreState) {
        // send_replace keeps the latest snapshot even with no subscribers.
        self.events.send_replace(state.snapshot(self.clock.now()));
    }
}
