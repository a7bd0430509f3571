use std::sync::Mutex;

/// User-visible, fire-and-forget error notifications.
pub trait Notifier: Send + Sync {
    fn notify_error(&self, message: &str);
}

/// Collects notifications raised while a page is prepared; the handler
/// drains them into the rendered page's toast region.
#[derive(Default)]
pub struct Toasts {
    messages: Mutex<Vec<String>>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(mut messages) => messages.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Notifier for Toasts {
    fn notify_error(&self, message: &str) {
        tracing::warn!(toast = %message, "user-visible error notification");
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
