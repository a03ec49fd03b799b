// Dedup/cooldown state machine reconciling the two failure channels into a
// single notification decision.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::model::{NotificationOutcome, SignalEvent};

/// Minimum spacing between two log-detected failure notifications. Collapses
/// a burst of related error lines into one alert.
pub const COOLDOWN_WINDOW: Duration = Duration::from_secs(10);

/// Cooldown and suppression bookkeeping for build failures.
#[derive(Debug, Default)]
pub struct CooldownState {
    last_log_failure: Option<Instant>,
    pending_suppression: bool,
}

impl CooldownState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the state machine by one signal, returning the notification to
    /// emit, if any.
    ///
    /// Success and upload-error signals pass straight through; only the two
    /// build-failure channels touch the cooldown state. The log channel is
    /// faster (the builder's own error callback can be stuck behind a modal
    /// dialog), so it notifies immediately and arms `pending_suppression` to
    /// swallow the structured echo that follows.
    pub fn apply(&mut self, signal: &SignalEvent) -> Option<NotificationOutcome> {
        match signal {
            SignalEvent::BuilderSuccess { .. } => Some(NotificationOutcome::Success),
            SignalEvent::BuilderError { .. } => Some(NotificationOutcome::Failure),
            SignalEvent::LogFailureDetected { at } => {
                if let Some(last) = self.last_log_failure {
                    if at.duration_since(last) < COOLDOWN_WINDOW {
                        // Same failure burst; already notified.
                        return None;
                    }
                }
                self.last_log_failure = Some(*at);
                self.pending_suppression = true;
                Some(NotificationOutcome::Failure)
            }
            SignalEvent::BuilderBuildError { .. } => {
                if self.pending_suppression {
                    // The delayed structured echo of a log-detected failure.
                    // The flag clears on arrival of this signal, not on a
                    // timer.
                    self.pending_suppression = false;
                    return None;
                }
                Some(NotificationOutcome::Failure)
            }
        }
    }

    pub fn pending_suppression(&self) -> bool {
        self.pending_suppression
    }
}

/// Shared front of the state machine. Both signal producers funnel through
/// the one mutex, so reads and writes of the cooldown state are serialized.
/// No I/O happens under the lock.
pub struct Coordinator {
    state: Mutex<CooldownState>,
}

impl Coordinator {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CooldownState::new()),
        }
    }

    pub fn process(&self, signal: &SignalEvent) -> Option<NotificationOutcome> {
        let mut state = self.state.lock().expect("cooldown state lock poisoned");
        state.apply(signal)
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_failure(base: Instant, secs: u64) -> SignalEvent {
        SignalEvent::LogFailureDetected {
            at: base + Duration::from_secs(secs),
        }
    }

    fn build_error() -> SignalEvent {
        SignalEvent::BuilderBuildError {
            message: "build failed".to_string(),
        }
    }

    #[test]
    fn success_passes_through_unconditionally() {
        let mut state = CooldownState::new();
        let signal = SignalEvent::BuilderSuccess {
            target: "world-123".to_string(),
        };

        assert_eq!(state.apply(&signal), Some(NotificationOutcome::Success));
        // No cooldown interaction: a second success still emits.
        assert_eq!(state.apply(&signal), Some(NotificationOutcome::Success));
        assert!(!state.pending_suppression());
    }

    #[test]
    fn upload_error_passes_through_unconditionally() {
        let mut state = CooldownState::new();
        let signal = SignalEvent::BuilderError {
            message: "upload rejected".to_string(),
        };

        assert_eq!(state.apply(&signal), Some(NotificationOutcome::Failure));
        assert_eq!(state.apply(&signal), Some(NotificationOutcome::Failure));
    }

    #[test]
    fn build_error_after_log_detection_is_suppressed_once() {
        let mut state = CooldownState::new();
        let base = Instant::now();

        // Log line "Failed to build MyWorld" at t=0 notifies immediately.
        assert_eq!(
            state.apply(&log_failure(base, 0)),
            Some(NotificationOutcome::Failure)
        );

        // The builder's own error event at t=2 is the same failure.
        assert_eq!(state.apply(&build_error()), None);
        assert!(!state.pending_suppression());

        // A further build error is a new failure and notifies again.
        assert_eq!(
            state.apply(&build_error()),
            Some(NotificationOutcome::Failure)
        );
    }

    #[test]
    fn log_failures_within_cooldown_are_dropped() {
        let mut state = CooldownState::new();
        let base = Instant::now();

        assert_eq!(
            state.apply(&log_failure(base, 0)),
            Some(NotificationOutcome::Failure)
        );
        // t=5 is inside the 10s window.
        assert_eq!(state.apply(&log_failure(base, 5)), None);
        // t=12 is past the window and notifies again.
        assert_eq!(
            state.apply(&log_failure(base, 12)),
            Some(NotificationOutcome::Failure)
        );
    }

    #[test]
    fn dropped_log_failure_does_not_move_the_cooldown() {
        let mut state = CooldownState::new();
        let base = Instant::now();

        assert_eq!(
            state.apply(&log_failure(base, 0)),
            Some(NotificationOutcome::Failure)
        );
        assert_eq!(state.apply(&log_failure(base, 9)), None);
        // Window is measured from t=0, not t=9.
        assert_eq!(
            state.apply(&log_failure(base, 11)),
            Some(NotificationOutcome::Failure)
        );
    }

    #[test]
    fn suppression_flag_clears_on_any_build_error() {
        let mut state = CooldownState::new();
        let base = Instant::now();

        state.apply(&log_failure(base, 0));
        assert!(state.pending_suppression());

        state.apply(&build_error());
        assert!(!state.pending_suppression());

        state.apply(&build_error());
        assert!(!state.pending_suppression());
    }

    #[test]
    fn build_error_suppressed_after_cooldown_expiry() {
        // The flag is cleared by build-error arrival, not by time: a build
        // error at t=15 is still swallowed because nothing cleared the flag
        // in between.
        let mut state = CooldownState::new();
        let base = Instant::now();

        assert_eq!(
            state.apply(&log_failure(base, 0)),
            Some(NotificationOutcome::Failure)
        );
        assert!(state.pending_suppression());

        assert_eq!(state.apply(&build_error()), None);
        assert!(!state.pending_suppression());
    }

    #[test]
    fn build_error_without_log_detection_notifies() {
        let mut state = CooldownState::new();

        assert_eq!(
            state.apply(&build_error()),
            Some(NotificationOutcome::Failure)
        );
    }

    #[test]
    fn coordinator_serializes_shared_state() {
        let coordinator = Coordinator::new();
        let base = Instant::now();

        assert_eq!(
            coordinator.process(&log_failure(base, 0)),
            Some(NotificationOutcome::Failure)
        );
        assert_eq!(coordinator.process(&build_error()), None);
    }
}
