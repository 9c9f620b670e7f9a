//! `orbis-agenda` — the agenda command engine.
//!
//! # Overview
//!
//! A raw command string flows through [`parser::parse`] into a typed
//! [`Operation`], which [`executor::CommandExecutor`] applies to the
//! JSON-snapshot-backed [`store::AppointmentStore`], producing a structured
//! [`Outcome`] (or a [`ParseError`] / [`ExecError`]). [`render`] turns either
//! into the user-facing Spanish message the transport sends back.
//!
//! # Command verbs
//!
//! | Verb            | Args                                  |
//! |-----------------|---------------------------------------|
//! | `/agenda`       | —                                     |
//! | `/registrar`    | `DATE TIME TEXT...`                   |
//! | `/borrar`       | `DATE TIME`                           |
//! | `/borrar_fecha` | `DATE` (also `DD/MM/YYYY`)            |
//! | `/borrar_todo`  | —                                     |
//! | `/buscar`       | `TEXT...`                             |
//! | `/cuando`       | `NAME...`                             |
//! | `/reprogramar`  | `OLD_DATE OLD_TIME NEW_DATE NEW_TIME` |
//! | `/modificar`    | `DATE TIME NEW_TEXT...`               |
//! | `/buscar_fecha` | `DATE`                                |
//! | `/proximos`     | — (one-minute look-ahead)             |

pub mod error;
pub mod executor;
pub mod ops;
pub mod parser;
pub mod render;
pub mod store;

pub use error::{ExecError, ParseError};
pub use executor::CommandExecutor;
pub use ops::{ListedEntry, Operation, Outcome};
pub use store::AppointmentStore;
