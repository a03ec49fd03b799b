// Desktop toast collaborator.

/// Toast display, best-effort: implementations log failures and never
/// propagate them to the caller.
pub trait ToastSink: Send + Sync {
    fn show(&self, title: &str, message: &str);
}

/// Shows a toast through the OS notification service.
pub struct DesktopToast;

impl ToastSink for DesktopToast {
    fn show(&self, title: &str, message: &str) {
        let result = notify_rust::Notification::new()
            .appname("upload-watcher")
            .summary(title)
            .body(message)
            .show();
        if let Err(e) = result {
            log::warn!("toast notification failed: {e}");
        }
    }
}
