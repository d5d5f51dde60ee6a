use std::time::Duration;

use leptos::prelude::*;
use wasm_bindgen::JsCast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn css_class(self) -> &'static str {
        match self {
            Severity::Success => "notification success",
            Severity::Info => "notification info",
            Severity::Warning => "notification warning",
            Severity::Error => "notification error",
        }
    }
}

/// A message for the user, produced by controllers and shown by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub notice: Notice,
}

/// Visible notifications, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationQueue {
    items: Vec<Notification>,
    next_id: u64,
}

impl NotificationQueue {
    pub fn push(&mut self, notice: Notice) -> u64 {
        self.next_id += 1;
        self.items.push(Notification {
            id: self.next_id,
            notice,
        });
        self.next_id
    }

    /// Dismissing an id that is already gone is a no-op.
    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|n| n.id != id);
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }
}

/// Shared handle to the notification surface, provided as context by `App`.
#[derive(Clone, Copy)]
pub struct Notifier {
    queue: RwSignal<NotificationQueue>,
    ttl: Duration,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self {
            queue: RwSignal::new(NotificationQueue::default()),
            ttl,
        }
    }

    pub fn queue(&self) -> RwSignal<NotificationQueue> {
        self.queue
    }

    /// Show a notice and schedule its removal.
    pub fn notify(&self, notice: Notice) {
        if notice.severity == Severity::Error {
            leptos::logging::error!("{}", notice.message);
        }
        let mut id = 0;
        self.queue.update(|q| id = q.push(notice));

        let queue = self.queue;
        schedule(self.ttl, move || queue.update(|q| q.dismiss(id)));
    }

    pub fn notify_all(&self, notices: impl IntoIterator<Item = Notice>) {
        for notice in notices {
            self.notify(notice);
        }
    }

    pub fn dismiss(&self, id: u64) {
        self.queue.update(|q| q.dismiss(id));
    }
}

/// Run `callback` once after `delay` on the browser event loop.
pub fn schedule(delay: Duration, callback: impl FnOnce() + 'static) {
    let callback = wasm_bindgen::closure::Closure::once(callback);
    match web_sys::window() {
        Some(window) => {
            if window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    callback.as_ref().unchecked_ref(),
                    delay.as_millis() as i32,
                )
                .is_err()
            {
                leptos::logging::warn!("could not schedule a timer");
            }
        }
        None => leptos::logging::warn!("no window; timer dropped"),
    }
    callback.forget();
}

pub fn use_notifier() -> Notifier {
    use_context::<Notifier>().unwrap_or_else(|| Notifier::new(Duration::from_secs(3)))
}
