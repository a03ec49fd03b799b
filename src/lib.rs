#![warn(clippy::all, clippy::pedantic)]
pub mod core;

pub use self::core::config::Settings;
pub use self::core::model::{NotificationOutcome, Severity, SignalEvent};
pub use self::core::notifier::UploadNotifier;
