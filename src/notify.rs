use std::cell::RefCell;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;

/// How long a toast stays visible.
pub const TOAST_WINDOW: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Neutral,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

/// Receives status messages. Fire-and-forget: callers never wait on or branch
/// on delivery.
pub trait Notifier {
    fn notify(&self, message: &str, kind: NotificationKind);
}

/// Keeps every notification in order; the CLI prints them after a command.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: RefCell<Vec<Notification>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries.borrow().clone()
    }

    pub fn take(&self) -> Vec<Notification> {
        self.entries.take()
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, message: &str, kind: NotificationKind) {
        log::info!("notification kind={kind:?} message={message}");
        self.entries.borrow_mut().push(Notification {
            message: message.to_string(),
            kind,
        });
    }
}

/// A single toast slot. Each notification replaces the previous one and is
/// cleared after the toast window unless something newer replaced it.
#[derive(Clone)]
pub struct ToastBoard {
    inner: Arc<Mutex<ToastSlot>>,
    window: Duration,
}

#[derive(Debug, Default)]
struct ToastSlot {
    current: Option<Notification>,
    generation: u64,
}

impl Default for ToastBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastBoard {
    pub fn new() -> Self {
        Self::with_window(TOAST_WINDOW)
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ToastSlot::default())),
            window,
        }
    }

    pub fn current(&self) -> Option<Notification> {
        let guard = self.inner.lock().expect("toast poisoned");
        guard.current.clone()
    }

    fn show(&self, notification: Notification) -> u64 {
        let mut guard = self.inner.lock().expect("toast poisoned");
        guard.generation += 1;
        guard.current = Some(notification);
        guard.generation
    }

    /// Clears the toast if it is still the one shown as `generation`.
    pub fn dismiss(&self, generation: u64) -> bool {
        let mut guard = self.inner.lock().expect("toast poisoned");
        if guard.generation != generation || guard.current.is_none() {
            return false;
        }
        guard.current = None;
        true
    }

    /// Without a tokio runtime the toast simply stays until replaced.
    fn schedule_dismiss(&self, generation: u64) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let board = self.clone();
        handle.spawn(async move {
            tokio::time::sleep(board.window).await;
            board.dismiss(generation);
        });
    }
}

impl Notifier for ToastBoard {
    fn notify(&self, message: &str, kind: NotificationKind) {
        let generation = self.show(Notification {
            message: message.to_string(),
            kind,
        });
        self.schedule_dismiss(generation);
    }
}
