// Narrow view of the host SDK: builders are optional capabilities exposing
// named completion events. Absence of a capability or an event is a normal,
// non-error outcome.

use std::sync::Arc;

use thiserror::Error;

/// Artifact-upload pipelines the host may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuilderKind {
    World,
    Avatar,
}

impl BuilderKind {
    pub fn all() -> &'static [BuilderKind] {
        &[Self::World, Self::Avatar]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::World => "world",
            Self::Avatar => "avatar",
        }
    }
}

/// Completion events a builder can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuilderEventKind {
    UploadSuccess,
    UploadError,
    BuildError,
}

impl BuilderEventKind {
    pub fn all() -> &'static [BuilderEventKind] {
        &[Self::UploadSuccess, Self::UploadError, Self::BuildError]
    }
}

/// Opaque identifier for one live event subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(pub u64);

#[derive(Debug, Error)]
pub enum HostError {
    #[error("binding is no longer live")]
    StaleBinding,
    #[error("builder has been disposed")]
    Disposed,
}

/// Callback invoked with the event payload (artifact id or error message).
pub type EventCallback = Box<dyn Fn(&str) + Send + Sync>;

/// One artifact-upload pipeline exposed by the host.
pub trait BuilderApi: Send + Sync {
    /// Attach a callback to a named event. `None` means this host build does
    /// not expose the event.
    fn subscribe(&self, event: BuilderEventKind, callback: EventCallback) -> Option<BindingId>;

    fn unsubscribe(&self, binding: BindingId) -> Result<(), HostError>;
}

/// The host control panel, through which builder capabilities are resolved.
pub trait SdkPanel {
    fn try_get_builder(&self, kind: BuilderKind) -> Option<Arc<dyn BuilderApi>>;
}
