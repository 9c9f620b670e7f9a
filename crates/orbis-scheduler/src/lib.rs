//! `orbis-scheduler` — reminder notifications for the agenda.
//!
//! # Overview
//!
//! Two cooperating mechanisms deliver reminders:
//!
//! | Mechanism             | Behaviour                                                      |
//! |-----------------------|----------------------------------------------------------------|
//! | [`ReminderScheduler`] | One tokio task per appointment, firing 15 minutes before and again at the appointment time |
//! | [`ReminderPoller`]    | Once-per-minute upcoming-window poll that notifies directly, the backstop for reminders lost to a restart |
//!
//! In-memory reminder tasks are never persisted; the poller is the
//! reconciliation mechanism that compensates for that.

pub mod notify;
pub mod poll;
pub mod reminders;

pub use notify::{Notifier, NotifyError};
pub use poll::ReminderPoller;
pub use reminders::ReminderScheduler;
