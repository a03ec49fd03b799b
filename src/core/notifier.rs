// Top-level wiring: owns the coordinator, dispatcher, scanner and hook
// registry, and exposes the host-facing entry points.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::runtime::Handle;

use super::audio::{AudioPlayer, RodioPlayer};
use super::config::Settings;
use super::coordinator::Coordinator;
use super::dispatch::Dispatcher;
use super::host::{BuilderKind, SdkPanel};
use super::model::{NotificationOutcome, Severity, SignalEvent, SignalSink};
use super::registry::HookRegistry;
use super::scanner::{LogScanner, SELF_LOG_TAG};
use super::toast::{DesktopToast, ToastSink};

struct NotifierInner {
    coordinator: Coordinator,
    dispatcher: Dispatcher,
    settings: Mutex<Settings>,
}

impl NotifierInner {
    fn snapshot(&self) -> Settings {
        self.settings.lock().expect("settings lock poisoned").clone()
    }
}

impl SignalSink for NotifierInner {
    fn signal(&self, event: SignalEvent) {
        let Some(outcome) = self.coordinator.process(&event) else {
            return;
        };

        match &event {
            SignalEvent::BuilderSuccess { target } => {
                log::info!("{SELF_LOG_TAG} upload finished: {target}");
            }
            SignalEvent::BuilderError { message } => {
                log::warn!("{SELF_LOG_TAG} upload error: {message}");
            }
            SignalEvent::BuilderBuildError { message } => {
                log::warn!("{SELF_LOG_TAG} build error: {message}");
            }
            SignalEvent::LogFailureDetected { .. } => {
                log::warn!("{SELF_LOG_TAG} build failure detected in log output");
            }
        }

        // Snapshot under the settings lock only; the dispatch worker gets
        // owned values, never references into this struct.
        let settings = self.snapshot();
        self.dispatcher.dispatch(outcome, &settings);
    }
}

/// Watches a host's build/upload pipelines and raises one sound + toast
/// notification per logical success or failure.
pub struct UploadNotifier {
    inner: Arc<NotifierInner>,
    scanner: Mutex<LogScanner>,
    registry: Mutex<HookRegistry>,
}

impl UploadNotifier {
    pub fn new(
        settings: Settings,
        audio: Arc<dyn AudioPlayer>,
        toast: Arc<dyn ToastSink>,
        runtime: Handle,
    ) -> Self {
        let scanner = LogScanner::new(&settings.failure_signatures);
        let inner = Arc::new(NotifierInner {
            coordinator: Coordinator::new(),
            dispatcher: Dispatcher::new(audio, toast, runtime),
            settings: Mutex::new(settings),
        });
        Self {
            inner,
            scanner: Mutex::new(scanner),
            registry: Mutex::new(HookRegistry::new()),
        }
    }

    /// Production wiring: rodio playback and desktop toasts.
    pub fn with_default_collaborators(settings: Settings, runtime: Handle) -> Self {
        Self::new(settings, Arc::new(RodioPlayer), Arc::new(DesktopToast), runtime)
    }

    /// The host panel became visible: attach builder hooks. Returns true if
    /// at least one capability attached.
    pub fn register_hooks(&self, panel: &dyn SdkPanel) -> bool {
        let sink: Arc<dyn SignalSink> = self.inner.clone();
        self.registry
            .lock()
            .expect("hook registry lock poisoned")
            .register(panel, &sink)
    }

    /// The host panel closed: detach everything. Never fails.
    pub fn unregister_hooks(&self) {
        self.registry
            .lock()
            .expect("hook registry lock poisoned")
            .unregister();
    }

    pub fn is_capability_available(&self, kind: BuilderKind) -> bool {
        self.registry
            .lock()
            .expect("hook registry lock poisoned")
            .is_capability_available(kind)
    }

    /// Feed one structured signal directly. Production signals arrive through
    /// the registry's callbacks; this is the seam for hosts that deliver
    /// events by other means.
    pub fn signal(&self, event: SignalEvent) {
        self.inner.signal(event);
    }

    /// Push callback for the host's log stream.
    pub fn on_log_message(&self, text: &str, severity: Severity) {
        if !self
            .inner
            .settings
            .lock()
            .expect("settings lock poisoned")
            .enabled
        {
            return;
        }
        let matched = self
            .scanner
            .lock()
            .expect("scanner lock poisoned")
            .matches(text, severity);
        if matched {
            self.inner.signal(SignalEvent::LogFailureDetected { at: Instant::now() });
        }
    }

    /// Fire a notification directly, bypassing dedup. Used by the host's
    /// settings panel to preview the configured sounds.
    pub fn test_notification(&self, outcome: NotificationOutcome) {
        let settings = self.inner.snapshot();
        self.inner.dispatcher.dispatch(outcome, &settings);
    }

    /// Replace the live settings (hot reload from the host's settings UI).
    /// The failure-signature set is recompiled as part of the swap.
    pub fn update_settings(&self, settings: Settings) {
        let scanner = LogScanner::new(&settings.failure_signatures);
        *self.scanner.lock().expect("scanner lock poisoned") = scanner;
        *self.inner.settings.lock().expect("settings lock poisoned") = settings;
    }
}
