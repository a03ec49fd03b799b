// Hook lifecycle: attach to each available builder's completion events when
// the host panel opens, detach when it closes.

use std::sync::Arc;

use super::host::{BindingId, BuilderApi, BuilderEventKind, BuilderKind, EventCallback, SdkPanel};
use super::model::{SignalEvent, SignalSink};

/// One live subscription. Owned exclusively by the registry; dropped on
/// detach.
struct HookBinding {
    kind: BuilderKind,
    event: BuilderEventKind,
    builder: Arc<dyn BuilderApi>,
    id: BindingId,
}

/// Tracks which builder hooks are attached. At most one binding exists per
/// (capability, event) pair; the `registered` latch makes both operations
/// idempotent.
pub struct HookRegistry {
    bindings: Vec<HookBinding>,
    registered: bool,
    world_attached: bool,
    avatar_attached: bool,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            registered: false,
            world_attached: false,
            avatar_attached: false,
        }
    }

    /// Attach to every capability the host currently exposes. A missing
    /// capability is skipped without aborting the rest. Returns true if at
    /// least one capability attached; while that holds, further calls are
    /// no-ops.
    pub fn register(&mut self, panel: &dyn SdkPanel, sink: &Arc<dyn SignalSink>) -> bool {
        if self.registered {
            return true;
        }

        self.world_attached = self.attach_builder(BuilderKind::World, panel, sink);
        self.avatar_attached = self.attach_builder(BuilderKind::Avatar, panel, sink);

        self.registered = self.world_attached || self.avatar_attached;
        self.registered
    }

    fn attach_builder(
        &mut self,
        kind: BuilderKind,
        panel: &dyn SdkPanel,
        sink: &Arc<dyn SignalSink>,
    ) -> bool {
        let Some(builder) = panel.try_get_builder(kind) else {
            log::info!("{} builder not available", kind.display_name());
            return false;
        };

        for event in BuilderEventKind::all() {
            let callback = route_event(*event, Arc::clone(sink));
            if let Some(id) = builder.subscribe(*event, callback) {
                self.bindings.push(HookBinding {
                    kind,
                    event: *event,
                    builder: Arc::clone(&builder),
                    id,
                });
            }
        }
        true
    }

    /// Detach every live binding. Detach failures are logged and ignored;
    /// cleanup never raises. Calling with zero bindings is a no-op.
    pub fn unregister(&mut self) {
        for binding in self.bindings.drain(..) {
            if let Err(e) = binding.builder.unsubscribe(binding.id) {
                log::debug!(
                    "detaching {}/{:?} failed: {}",
                    binding.kind.display_name(),
                    binding.event,
                    e
                );
            }
        }
        self.registered = false;
        self.world_attached = false;
        self.avatar_attached = false;
    }

    /// Whether the capability attached during the last registration.
    pub fn is_capability_available(&self, kind: BuilderKind) -> bool {
        match kind {
            BuilderKind::World => self.world_attached,
            BuilderKind::Avatar => self.avatar_attached,
        }
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a builder event payload onto the matching signal variant.
fn route_event(event: BuilderEventKind, sink: Arc<dyn SignalSink>) -> EventCallback {
    Box::new(move |payload: &str| {
        let signal = match event {
            BuilderEventKind::UploadSuccess => SignalEvent::BuilderSuccess {
                target: payload.to_string(),
            },
            BuilderEventKind::UploadError => SignalEvent::BuilderError {
                message: payload.to_string(),
            },
            BuilderEventKind::BuildError => SignalEvent::BuilderBuildError {
                message: payload.to_string(),
            },
        };
        sink.signal(signal);
    })
}
