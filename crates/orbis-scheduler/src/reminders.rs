//! Per-appointment reminder tasks.
//!
//! Each scheduled appointment gets one independent tokio task. With the
//! default 900-second lead the task suspends until fifteen minutes before
//! the appointment, delivers the early notification, re-reads the clock (to
//! absorb suspension drift and clock changes), suspends until the
//! appointment itself and delivers the final notification. Appointments
//! closer than the lead get only the final notification; appointments
//! already past get nothing.
//!
//! Tasks are keyed by appointment time so deleting or rescheduling an
//! appointment retracts its pending notifications instead of leaving a stale
//! task to fire for an entry that no longer exists. Nothing here is
//! persisted: a restart drops all pending tasks, and the
//! [`ReminderPoller`](crate::poll::ReminderPoller) is the backstop.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info};

use orbis_core::config::ReminderConfig;
use orbis_core::timekey;
use orbis_core::ReminderSink;

use crate::notify::{deliver, Notifier};

/// Pending tasks, each tagged with the generation it was scheduled under so
/// a finishing task can tell its own map entry from a replacement's.
type TaskMap = DashMap<NaiveDateTime, (u64, JoinHandle<()>)>;

pub struct ReminderScheduler {
    notifier: Arc<dyn Notifier>,
    tasks: Arc<TaskMap>,
    next_generation: AtomicU64,
    lead_secs: i64,
    notify_timeout: Duration,
}

impl ReminderScheduler {
    /// Must be constructed inside a tokio runtime; `schedule` spawns.
    pub fn new(notifier: Arc<dyn Notifier>, config: &ReminderConfig) -> Self {
        Self {
            notifier,
            tasks: Arc::new(DashMap::new()),
            next_generation: AtomicU64::new(0),
            lead_secs: config.lead_secs,
            notify_timeout: Duration::from_millis(config.notify_timeout_ms),
        }
    }

    /// Arrange the two-stage notifications for an appointment.
    ///
    /// Scheduling for an instant that already has a pending task replaces
    /// (aborts) the earlier one. Appointments at or before now schedule
    /// nothing.
    pub fn schedule(&self, chat_id: i64, when: NaiveDateTime, text: String) {
        let now = Local::now().naive_local();
        let lead_secs = (when - now).num_seconds();
        if lead_secs <= 0 {
            debug!(when = %timekey::format_key(when), "appointment already past, nothing to schedule");
            return;
        }

        if let Some((_, (_, stale))) = self.tasks.remove(&when) {
            stale.abort();
            debug!(when = %timekey::format_key(when), "replaced pending reminder task");
        }

        let notifier = Arc::clone(&self.notifier);
        let tasks = Arc::clone(&self.tasks);
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let lead = self.lead_secs;
        let timeout = self.notify_timeout;

        let handle = tokio::spawn(async move {
            if lead_secs > lead {
                sleep(Duration::from_secs((lead_secs - lead) as u64)).await;
                let minutes = lead / 60;
                deliver(
                    &notifier,
                    timeout,
                    chat_id,
                    &format!("⏰ En {minutes} minutos: {text}"),
                )
                .await;

                // Re-read the clock: the suspension may have drifted or the
                // clock may have moved under us.
                let remaining = (when - Local::now().naive_local()).num_seconds();
                if remaining > 0 {
                    sleep(Duration::from_secs(remaining as u64)).await;
                }
            } else {
                sleep(Duration::from_secs(lead_secs as u64)).await;
            }

            deliver(
                &notifier,
                timeout,
                chat_id,
                &format!("⏰ Recordatorio: {text}"),
            )
            .await;
            clear_finished(&tasks, when, generation);
        });

        info!(when = %timekey::format_key(when), chat_id, "reminder scheduled");
        self.tasks.insert(when, (generation, handle));
    }

    /// Retract the pending task for `when`, if any.
    pub fn cancel(&self, when: NaiveDateTime) {
        if let Some((_, (_, handle))) = self.tasks.remove(&when) {
            handle.abort();
            info!(when = %timekey::format_key(when), "reminder cancelled");
        }
    }

    /// Number of reminder tasks currently pending.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }
}

/// Drop the map entry left by a finished task, but only when the entry still
/// belongs to that task. A replacement scheduled for the same instant carries
/// a newer generation and must stay cancellable through the map.
fn clear_finished(tasks: &TaskMap, when: NaiveDateTime, generation: u64) {
    tasks.remove_if(&when, |_, (g, _)| *g == generation);
}

impl ReminderSink for ReminderScheduler {
    fn schedule(&self, chat_id: i64, when: NaiveDateTime, text: &str) {
        ReminderScheduler::schedule(self, chat_id, when, text.to_string());
    }

    fn cancel(&self, when: NaiveDateTime) {
        ReminderScheduler::cancel(self, when);
    }
}
