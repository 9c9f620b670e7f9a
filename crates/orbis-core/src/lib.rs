//! `orbis-core` — shared foundation for the Orbis agenda service.
//!
//! Holds the pieces every other crate needs: configuration loading,
//! the canonical time-key parser, the [`Appointment`](types::Appointment)
//! type and the [`ReminderSink`](reminder::ReminderSink) seam between the
//! command engine and the reminder scheduler.

pub mod config;
pub mod error;
pub mod reminder;
pub mod timekey;
pub mod types;

pub use config::OrbisConfig;
pub use error::{OrbisError, Result};
pub use reminder::ReminderSink;
pub use types::Appointment;
