use std::time::Duration;

use dioxus::core::Task;
use dioxus::prelude::*;
use services::Status;

pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_millis(3000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }
}

impl From<Status> for Severity {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => Severity::Success,
            Status::Error => Severity::Error,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
}

/// At most one visible notification. Every `show` gets a fresh id and an
/// expiry only hides the instance it was issued for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Notifier {
    next_id: u64,
    current: Option<Notification>,
}

impl Notifier {
    pub fn show(&mut self, message: impl Into<String>, severity: Severity) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.current = Some(Notification {
            id,
            message: message.into(),
            severity,
        });
        id
    }

    /// Returns whether the notification was still visible.
    pub fn expire(&mut self, id: u64) -> bool {
        if self.current.as_ref().is_some_and(|n| n.id == id) {
            self.current = None;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }
}

/// Component-side handle: owns the notifier signal and the pending hide task.
#[derive(Clone, Copy, PartialEq)]
pub struct NotifierHandle {
    state: Signal<Notifier>,
    timer: Signal<Option<Task>>,
}

pub fn use_notifier() -> NotifierHandle {
    let state = use_signal(Notifier::default);
    let timer = use_signal(|| None);
    NotifierHandle { state, timer }
}

impl NotifierHandle {
    pub fn notify(mut self, message: impl Into<String>, severity: Severity) {
        if let Some(previous) = self.timer.write().take() {
            previous.cancel();
        }

        let id = self.state.write().show(message, severity);
        let mut state = self.state;
        let task = spawn(async move {
            tokio::time::sleep(NOTIFICATION_TIMEOUT).await;
            state.write().expire(id);
        });
        self.timer.set(Some(task));
    }

    #[must_use]
    pub fn current(&self) -> Option<Notification> {
        self.state.read().current().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_replaces_current_message() {
        let mut notifier = Notifier::default();
        notifier.show("first", Severity::Success);
        notifier.show("second", Severity::Error);

        let current = notifier.current().unwrap();
        assert_eq!(current.message, "second");
        assert_eq!(current.severity.class(), "error");
    }

    #[test]
    fn stale_expiry_does_not_hide_newer_message() {
        let mut notifier = Notifier::default();
        let first = notifier.show("first", Severity::Success);
        let second = notifier.show("second", Severity::Success);

        assert!(!notifier.expire(first));
        assert_eq!(notifier.current().unwrap().message, "second");

        assert!(notifier.expire(second));
        assert!(notifier.current().is_none());
    }

    #[test]
    fn severity_follows_status() {
        assert_eq!(Severity::from(Status::Success), Severity::Success);
        assert_eq!(Severity::from(Status::Error), Severity::Error);
    }
}
