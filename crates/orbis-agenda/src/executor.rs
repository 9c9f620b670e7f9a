//! Applies parsed operations to the appointment store.
//!
//! Every invocation is serialized behind one coarse mutex: each operation is
//! a whole read-modify-write over the snapshot, and the periodic upcoming
//! poll shares the same lock, so lost updates cannot occur. Mutating
//! operations persist the snapshot synchronously before any success result
//! is returned; a save failure surfaces as [`ExecError::Io`] and the caller
//! must treat the mutation as not durably applied.
//!
//! When a chat id accompanies the call, Register and Reschedule hand the new
//! appointment to the attached [`ReminderSink`]; Delete, DeleteByDate,
//! DeleteAll and Reschedule retract reminders for the keys they remove.

use std::sync::{Arc, Mutex};

use chrono::{Duration, Local, NaiveDateTime};
use tracing::{debug, info};

use orbis_core::{timekey, Appointment, ReminderSink};

use crate::error::ExecError;
use crate::ops::{ListedEntry, Operation, Outcome};
use crate::store::AppointmentStore;

pub struct CommandExecutor {
    store: Mutex<AppointmentStore>,
    reminders: Option<Arc<dyn ReminderSink>>,
}

impl CommandExecutor {
    pub fn new(store: AppointmentStore) -> Self {
        Self {
            store: Mutex::new(store),
            reminders: None,
        }
    }

    /// Attach a reminder sink; Register/Reschedule with a chat id will
    /// schedule through it, deletions will cancel through it.
    pub fn with_reminders(mut self, sink: Arc<dyn ReminderSink>) -> Self {
        self.reminders = Some(sink);
        self
    }

    /// Execute one operation against the wall clock.
    pub fn execute(&self, op: Operation, chat_id: Option<i64>) -> Result<Outcome, ExecError> {
        self.execute_at(op, chat_id, Local::now().naive_local())
    }

    /// Execute one operation with an explicit `now` (the seam that makes
    /// time-window operations deterministic under test).
    pub fn execute_at(
        &self,
        op: Operation,
        chat_id: Option<i64>,
        now: NaiveDateTime,
    ) -> Result<Outcome, ExecError> {
        let mut store = self.store.lock().unwrap();
        match op {
            Operation::List => Ok(Outcome::Listing(self.list(&store))),
            Operation::Register { when, text } => self.register(&mut store, &when, text, chat_id),
            Operation::Delete { when } => self.delete(&mut store, &when),
            Operation::DeleteByDate { date } => self.delete_by_date(&mut store, date),
            Operation::DeleteAll => self.delete_all(&mut store),
            Operation::Search { query } => Ok(Outcome::Matches(search(&store, &query))),
            Operation::FindDatesByText { query } => Ok(Outcome::MatchedTimes(
                search(&store, &query).into_iter().map(|a| a.when).collect(),
            )),
            Operation::FindByDate { date } => {
                let mut entries: Vec<Appointment> = valid_entries(&store)
                    .filter(|a| a.when.date() == date)
                    .collect();
                entries.sort();
                Ok(Outcome::OnDate { date, entries })
            }
            Operation::Reschedule { old_when, new_when } => {
                self.reschedule(&mut store, &old_when, &new_when, chat_id)
            }
            Operation::Modify { when, new_text } => self.modify(&mut store, &when, new_text),
            Operation::UpcomingWithin { window_secs } => {
                let until = now + Duration::seconds(window_secs as i64);
                let mut entries: Vec<Appointment> = valid_entries(&store)
                    .filter(|a| a.when >= now && a.when <= until)
                    .collect();
                entries.sort();
                Ok(Outcome::Upcoming(entries))
            }
        }
    }

    /// Full listing. Keys that no longer parse sort after every valid entry
    /// (treated as maximal) instead of being dropped, so a listing's count
    /// always matches the store contents.
    fn list(&self, store: &AppointmentStore) -> Vec<ListedEntry> {
        let mut entries: Vec<ListedEntry> = store
            .iter()
            .map(|(key, text)| ListedEntry {
                key: key.to_string(),
                when: timekey::parse_key(key),
                text: text.to_string(),
            })
            .collect();
        entries.sort_by(|a, b| match (a.when, b.when) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.key.cmp(&b.key),
        });
        entries
    }

    fn register(
        &self,
        store: &mut AppointmentStore,
        when_raw: &str,
        text: String,
        chat_id: Option<i64>,
    ) -> Result<Outcome, ExecError> {
        let when = parse_when(when_raw)?;
        let appointment = Appointment::new(when, text);
        store.insert(appointment.key(), appointment.text.clone());
        store.save()?;
        info!(when = %appointment.key(), "appointment registered");
        self.schedule_reminder(chat_id, &appointment);
        Ok(Outcome::Registered(appointment))
    }

    fn delete(&self, store: &mut AppointmentStore, when_raw: &str) -> Result<Outcome, ExecError> {
        let when = parse_when(when_raw)?;
        let key = timekey::format_key(when);
        let text = store.remove(&key).ok_or(ExecError::NotFound {
            when: key.clone(),
        })?;
        store.save()?;
        info!(when = %key, "appointment deleted");
        self.cancel_reminder(when);
        Ok(Outcome::Deleted(Appointment::new(when, text)))
    }

    fn delete_by_date(
        &self,
        store: &mut AppointmentStore,
        date: chrono::NaiveDate,
    ) -> Result<Outcome, ExecError> {
        let keys: Vec<String> = store
            .iter()
            .filter(|(k, _)| timekey::parse_key(k).is_some_and(|dt| dt.date() == date))
            .map(|(k, _)| k.to_string())
            .collect();

        let mut removed: Vec<Appointment> = Vec::with_capacity(keys.len());
        for key in keys {
            if let (Some(when), Some(text)) = (timekey::parse_key(&key), store.remove(&key)) {
                removed.push(Appointment::new(when, text));
            }
        }
        removed.sort();

        // Zero removals is a zero-count success, and nothing changed, so
        // there is nothing to persist.
        if !removed.is_empty() {
            store.save()?;
            info!(date = %timekey::format_date(date), count = removed.len(), "day cleared");
            for a in &removed {
                self.cancel_reminder(a.when);
            }
        }
        Ok(Outcome::DeletedByDate { date, removed })
    }

    fn delete_all(&self, store: &mut AppointmentStore) -> Result<Outcome, ExecError> {
        let cancel: Vec<NaiveDateTime> = store
            .iter()
            .filter_map(|(k, _)| timekey::parse_key(k))
            .collect();
        let count = store.clear();
        store.save()?;
        info!(count, "agenda cleared");
        for when in cancel {
            self.cancel_reminder(when);
        }
        Ok(Outcome::Cleared { count })
    }

    fn reschedule(
        &self,
        store: &mut AppointmentStore,
        old_raw: &str,
        new_raw: &str,
        chat_id: Option<i64>,
    ) -> Result<Outcome, ExecError> {
        let old_when = parse_when(old_raw)?;
        let new_when = parse_when(new_raw)?;
        let old_key = timekey::format_key(old_when);

        let text = store.remove(&old_key).ok_or(ExecError::NotFound {
            when: old_key.clone(),
        })?;
        let appointment = Appointment::new(new_when, text);
        // Overwrites any appointment already at the new key (last-write-wins,
        // same as Register).
        store.insert(appointment.key(), appointment.text.clone());
        store.save()?;
        info!(from = %old_key, to = %appointment.key(), "appointment rescheduled");
        self.cancel_reminder(old_when);
        self.schedule_reminder(chat_id, &appointment);
        Ok(Outcome::Rescheduled {
            old_when,
            appointment,
        })
    }

    fn modify(
        &self,
        store: &mut AppointmentStore,
        when_raw: &str,
        new_text: String,
    ) -> Result<Outcome, ExecError> {
        let when = parse_when(when_raw)?;
        let key = timekey::format_key(when);
        if store.get(&key).is_none() {
            return Err(ExecError::NotFound { when: key });
        }
        store.insert(key.clone(), new_text.clone());
        store.save()?;
        info!(when = %key, "appointment text modified");
        Ok(Outcome::Modified(Appointment::new(when, new_text)))
    }

    fn schedule_reminder(&self, chat_id: Option<i64>, appointment: &Appointment) {
        if let (Some(sink), Some(chat)) = (self.reminders.as_deref(), chat_id) {
            sink.schedule(chat, appointment.when, &appointment.text);
        } else {
            debug!(when = %appointment.key(), "no reminder sink or chat id, skipping reminder");
        }
    }

    fn cancel_reminder(&self, when: NaiveDateTime) {
        if let Some(sink) = self.reminders.as_deref() {
            sink.cancel(when);
        }
    }
}

fn parse_when(raw: &str) -> Result<NaiveDateTime, ExecError> {
    timekey::parse_key(raw).ok_or_else(|| ExecError::InvalidDatetime {
        input: raw.to_string(),
    })
}

/// Entries with parseable keys, as owned appointments. Corrupt keys are
/// skipped here; only the full listing shows them.
fn valid_entries<'a>(store: &'a AppointmentStore) -> impl Iterator<Item = Appointment> + 'a {
    store
        .iter()
        .filter_map(|(k, v)| timekey::parse_key(k).map(|when| Appointment::new(when, v)))
}

/// Case-insensitive substring match over task texts, sorted by time.
fn search(store: &AppointmentStore, query: &str) -> Vec<Appointment> {
    let needle = query.to_lowercase();
    let mut matches: Vec<Appointment> = valid_entries(store)
        .filter(|a| a.text.to_lowercase().contains(&needle))
        .collect();
    matches.sort();
    matches
}
