//! Reconciliation poll.
//!
//! In-memory reminder tasks die with the process, and appointments may have
//! been registered before the current process started. This loop runs the
//! `UpcomingWithin` operation once per poll interval and notifies every hit
//! directly, so a reminder is delivered even when no task exists for it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};

use orbis_agenda::{CommandExecutor, ExecError, Operation, Outcome};
use orbis_core::config::ReminderConfig;

use crate::notify::{deliver, Notifier};

pub struct ReminderPoller {
    executor: Arc<CommandExecutor>,
    notifier: Arc<dyn Notifier>,
    /// The store does not record a chat per appointment; the poller's
    /// destination comes from the caller context instead.
    chat_id: i64,
    poll_interval: Duration,
    window_secs: u64,
    notify_timeout: Duration,
}

impl ReminderPoller {
    pub fn new(
        executor: Arc<CommandExecutor>,
        notifier: Arc<dyn Notifier>,
        chat_id: i64,
        config: &ReminderConfig,
    ) -> Self {
        Self {
            executor,
            notifier,
            chat_id,
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            window_secs: config.poll_interval_secs,
            notify_timeout: Duration::from_millis(config.notify_timeout_ms),
        }
    }

    /// Poll until `shutdown` broadcasts `true`.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(interval_secs = self.poll_interval.as_secs(), "reminder poller started");

        let mut interval = tokio::time::interval(self.poll_interval);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.tick().await {
                        error!(error = %e, "reminder poll failed");
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("reminder poller shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// One poll: fetch the upcoming window, notify each hit. Returns the
    /// number of notifications attempted.
    async fn tick(&self) -> Result<usize, ExecError> {
        let outcome = self.executor.execute(
            Operation::UpcomingWithin {
                window_secs: self.window_secs,
            },
            None,
        )?;

        let Outcome::Upcoming(entries) = outcome else {
            return Ok(0);
        };

        let count = entries.len();
        for appointment in entries {
            deliver(
                &self.notifier,
                self.notify_timeout,
                self.chat_id,
                &format!(
                    "⏰ Recordatorio: {}\n¿Completada ✅ o Reprogramar ⏳?",
                    appointment.text
                ),
            )
            .await;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotifyError;
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, Local, Timelike};
    use orbis_agenda::AppointmentStore;
    use orbis_core::timekey;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        calls: Mutex<Vec<(i64, String)>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, chat_id: i64, text: &str) -> Result<(), NotifyError> {
            self.calls.lock().unwrap().push((chat_id, text.to_string()));
            Ok(())
        }
    }

    fn poller(
        dir: &tempfile::TempDir,
        notifier: Arc<RecordingNotifier>,
    ) -> (Arc<CommandExecutor>, ReminderPoller) {
        let store = AppointmentStore::load(dir.path().join("agenda.json"));
        let executor = Arc::new(CommandExecutor::new(store));
        let p = ReminderPoller::new(
            Arc::clone(&executor),
            notifier,
            42,
            &ReminderConfig::default(),
        );
        (executor, p)
    }

    /// Register at the current minute (floored) plus `minutes`. Keys are
    /// minute-precision, so offsets are computed from the minute boundary.
    fn register_in_minutes(executor: &CommandExecutor, minutes: i64, text: &str) {
        let base = Local::now()
            .naive_local()
            .with_second(0)
            .unwrap()
            .with_nanosecond(0)
            .unwrap();
        let when = base + ChronoDuration::minutes(minutes);
        executor
            .execute(
                Operation::Register {
                    when: timekey::format_key(when),
                    text: text.into(),
                },
                None,
            )
            .unwrap();
    }

    #[tokio::test]
    async fn tick_notifies_appointments_inside_window() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = Arc::new(RecordingNotifier::default());
        let (executor, poller) = poller(&dir, Arc::clone(&notifier));

        // The next minute boundary is at most 60 s away, so it always falls
        // inside the poll window; 30 minutes out never does.
        register_in_minutes(&executor, 1, "dentro");
        register_in_minutes(&executor, 30, "fuera");

        let attempted = poller.tick().await.unwrap();
        assert_eq!(attempted, 1);

        let calls = notifier.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, 42);
        assert!(calls[0].1.contains("dentro"));
        assert!(calls[0].1.contains("¿Completada ✅ o Reprogramar ⏳?"));
    }

    #[tokio::test]
    async fn tick_with_empty_window_notifies_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = Arc::new(RecordingNotifier::default());
        let (_executor, poller) = poller(&dir, Arc::clone(&notifier));

        assert_eq!(poller.tick().await.unwrap(), 0);
        assert!(notifier.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn run_stops_on_shutdown_signal() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = Arc::new(RecordingNotifier::default());
        let (_executor, poller) = poller(&dir, notifier);

        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn(poller.run(rx));

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("poller did not shut down")
            .unwrap();
    }
}
