// Notification dispatch: fans one decision out to the audio and toast
// collaborators without blocking the signal-producing thread.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::runtime::Handle;

use super::audio::AudioPlayer;
use super::config::Settings;
use super::model::NotificationOutcome;
use super::scanner::SELF_LOG_TAG;
use super::toast::ToastSink;

/// Title used for every toast.
pub const TOAST_TITLE: &str = "Upload Watcher";

/// A fully resolved notification: everything the worker needs, with no live
/// references back into caller-owned state.
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub outcome: NotificationOutcome,
    pub sound_path: Option<PathBuf>,
    pub volume: f32,
    pub toast: Option<(String, String)>,
}

impl NotificationRequest {
    /// Resolve settings into a self-contained request at call time.
    pub fn resolve(outcome: NotificationOutcome, settings: &Settings) -> Self {
        let message = match outcome {
            NotificationOutcome::Success => "Upload complete!",
            NotificationOutcome::Failure => "Upload failed...",
        };
        Self {
            outcome,
            sound_path: settings.sound_path(outcome),
            volume: settings.volume(outcome),
            toast: settings
                .toast_enabled
                .then(|| (TOAST_TITLE.to_string(), message.to_string())),
        }
    }
}

/// Triggers the sound and toast side effects for a notification decision on
/// a detached blocking worker. Fire-and-forget: no await, no retry, no
/// cancellation; collaborator errors stay inside the worker.
pub struct Dispatcher {
    audio: Arc<dyn AudioPlayer>,
    toast: Arc<dyn ToastSink>,
    runtime: Handle,
}

impl Dispatcher {
    pub fn new(audio: Arc<dyn AudioPlayer>, toast: Arc<dyn ToastSink>, runtime: Handle) -> Self {
        Self {
            audio,
            toast,
            runtime,
        }
    }

    /// Dispatch one outcome using an already-resolved settings snapshot. If
    /// notifications are disabled this returns immediately with no side
    /// effect.
    pub fn dispatch(&self, outcome: NotificationOutcome, settings: &Settings) {
        if !settings.enabled {
            return;
        }
        self.spawn(NotificationRequest::resolve(outcome, settings));
    }

    fn spawn(&self, request: NotificationRequest) {
        let audio = Arc::clone(&self.audio);
        let toast = Arc::clone(&self.toast);
        // The join handle is dropped on purpose: the worker self-terminates
        // and nothing waits on it.
        drop(self.runtime.spawn_blocking(move || {
            match &request.sound_path {
                Some(path) => audio.play(path, request.volume),
                None => log::warn!("{SELF_LOG_TAG} no sound configured for {:?}", request.outcome),
            }
            if let Some((title, body)) = &request.toast {
                toast.show(title, body);
            }
        }));
    }
}
