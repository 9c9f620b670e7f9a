use chrono::{NaiveDate, NaiveDateTime};

use orbis_core::Appointment;

/// A validated agenda mutation or query, produced by [`parser::parse`].
///
/// Timestamps travel as raw strings so programmatic callers building an
/// `Operation` directly get the same canonical validation the parser applies;
/// the executor normalizes them through `orbis_core::timekey` before any
/// store access.
///
/// [`parser::parse`]: crate::parser::parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Return the whole agenda.
    List,
    /// Insert (or overwrite) the task at `when`.
    Register { when: String, text: String },
    /// Remove the exact key `when`.
    Delete { when: String },
    /// Remove every appointment on the given day.
    DeleteByDate { date: NaiveDate },
    /// Clear the agenda.
    DeleteAll,
    /// Case-insensitive substring match over task texts.
    Search { query: String },
    /// Like [`Operation::Search`] but returns only the matching times.
    FindDatesByText { query: String },
    /// All appointments on the given day.
    FindByDate { date: NaiveDate },
    /// Move the task at `old_when` to `new_when`.
    Reschedule { old_when: String, new_when: String },
    /// Replace the task text at `when`, keeping the key.
    Modify { when: String, new_text: String },
    /// Appointments in `[now, now + window]`, both bounds inclusive.
    UpcomingWithin { window_secs: u64 },
}

/// One line of a full listing. `when` is `None` for snapshot keys that do not
/// parse as time keys; those sort after every valid entry instead of being
/// dropped, so the listing's count always matches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    pub key: String,
    pub when: Option<NaiveDateTime>,
    pub text: String,
}

/// Structured success result of one executed [`Operation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Listing(Vec<ListedEntry>),
    Registered(Appointment),
    Deleted(Appointment),
    DeletedByDate {
        date: NaiveDate,
        removed: Vec<Appointment>,
    },
    Cleared {
        count: usize,
    },
    Matches(Vec<Appointment>),
    MatchedTimes(Vec<NaiveDateTime>),
    OnDate {
        date: NaiveDate,
        entries: Vec<Appointment>,
    },
    Rescheduled {
        old_when: NaiveDateTime,
        appointment: Appointment,
    },
    Modified(Appointment),
    Upcoming(Vec<Appointment>),
}
