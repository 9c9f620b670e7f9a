//! Reminder scheduling seam, shared between the command engine and the
//! scheduler implementation.

use chrono::NaiveDateTime;

/// Receives reminder lifecycle events from the command engine.
///
/// Implemented by `ReminderScheduler` in `orbis-scheduler`; the executor only
/// sees this trait so the command path never depends on the scheduling crate.
/// Both methods must return quickly; scheduling spawns, it never waits.
pub trait ReminderSink: Send + Sync {
    /// Arrange notifications for an appointment at `when`. A second call with
    /// the same `when` replaces the earlier arrangement.
    fn schedule(&self, chat_id: i64, when: NaiveDateTime, text: &str);

    /// Retract any pending notifications for the appointment at `when`.
    /// A no-op when nothing is scheduled for that instant.
    fn cancel(&self, when: NaiveDateTime);
}
