//! Reminder scheduling: a task with a deadline and a lead time wants a
//! notification fired `lead` minutes before the deadline.

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::model::Task;

/// When this task's reminder should fire, if it has one. A lead time with
/// no deadline (or no lead at all) means no reminder.
pub fn trigger_at(task: &Task) -> Option<DateTime<Utc>> {
    let deadline = task.date_time?;
    let minutes = task.reminder.minutes();
    if minutes == 0 {
        return None;
    }
    Some(deadline - Duration::minutes(i64::from(minutes)))
}

/// Delivery backend for scheduled reminders. The engine only decides WHEN
/// a reminder fires; what a "notification" is belongs to the host.
pub trait Notifier {
    /// Schedule a notification, returning a handle when one was actually
    /// queued. Implementations are free to drop triggers already in the
    /// past.
    fn schedule(
        &mut self,
        title: &str,
        body: &str,
        trigger_at: DateTime<Utc>,
    ) -> Option<NotificationHandle>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationHandle(pub String);

/// Terminal sessions have no notification center; scheduled reminders go
/// to the log instead.
#[derive(Debug, Default)]
pub struct LogNotifier {
    scheduled: u64,
}

impl Notifier for LogNotifier {
    fn schedule(
        &mut self,
        title: &str,
        body: &str,
        trigger_at: DateTime<Utc>,
    ) -> Option<NotificationHandle> {
        if trigger_at <= Utc::now() {
            info!(title, %trigger_at, "reminder trigger already past, skipping");
            return None;
        }
        self.scheduled += 1;
        let handle = NotificationHandle(format!("log-{}", self.scheduled));
        info!(title, body, %trigger_at, handle = %handle.0, "reminder scheduled");
        Some(handle)
    }
}
