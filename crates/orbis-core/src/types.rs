use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::timekey;

/// A single agenda entry: one task at one minute-precision instant.
///
/// Appointments are uniquely keyed by `when`; registering a second task at
/// the same instant overwrites the first (last-write-wins, no merge).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub when: NaiveDateTime,
    pub text: String,
}

impl Appointment {
    pub fn new(when: NaiveDateTime, text: impl Into<String>) -> Self {
        Self {
            when,
            text: text.into(),
        }
    }

    /// Canonical store key for this appointment.
    pub fn key(&self) -> String {
        timekey::format_key(self.when)
    }
}

impl fmt::Display for Appointment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.key(), self.text)
    }
}

impl PartialOrd for Appointment {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Appointment {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.when.cmp(&other.when).then_with(|| self.text.cmp(&other.text))
    }
}
