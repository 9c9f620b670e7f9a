//! Renders structured outcomes and errors into the user-facing Spanish
//! messages the assistant sends back over the chat transport.

use orbis_core::timekey;

use crate::error::{ExecError, ParseError};
use crate::ops::Outcome;

pub fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Listing(entries) => {
            if entries.is_empty() {
                "📭 Tu agenda está vacía.".to_string()
            } else {
                let mut out = String::from("📝 Agenda:");
                for e in entries {
                    out.push_str(&format!("\n🕒 {} → {}", e.key, e.text));
                }
                out
            }
        }
        Outcome::Registered(a) => {
            format!("✅ He registrado '{}' a las {}.", a.text, a.key())
        }
        Outcome::Deleted(a) => {
            format!(
                "🗑️ He borrado la tarea '{}' programada para {}.",
                a.text,
                a.key()
            )
        }
        Outcome::DeletedByDate { date, removed } => {
            let date = timekey::format_date(*date);
            if removed.is_empty() {
                format!("📭 No había tareas el {date}.")
            } else {
                format!("🗑️ He borrado {} tareas del {date}.", removed.len())
            }
        }
        Outcome::Cleared { count } => {
            format!("🗑️ Agenda vaciada ({count} tareas).")
        }
        Outcome::Matches(hits) => {
            if hits.is_empty() {
                "🔍 No encontré tareas que coincidan.".to_string()
            } else {
                let mut out = String::from("🔍 Coincidencias:");
                for a in hits {
                    out.push_str(&format!("\n🕒 {a}"));
                }
                out
            }
        }
        Outcome::MatchedTimes(times) => {
            if times.is_empty() {
                "🤔 No encontré esa tarea.".to_string()
            } else {
                let mut out = String::from("📅 La tienes programada para:");
                for t in times {
                    out.push_str(&format!("\n🕒 {}", timekey::format_key(*t)));
                }
                out
            }
        }
        Outcome::OnDate { date, entries } => {
            let date = timekey::format_date(*date);
            if entries.is_empty() {
                format!("📭 No tienes tareas el {date}.")
            } else {
                let mut out = format!("📅 Tareas del {date}:");
                for a in entries {
                    out.push_str(&format!("\n🕒 {a}"));
                }
                out
            }
        }
        Outcome::Rescheduled {
            old_when,
            appointment,
        } => format!(
            "⏳ He movido '{}' de {} a {}.",
            appointment.text,
            timekey::format_key(*old_when),
            appointment.key()
        ),
        Outcome::Modified(a) => {
            format!("✏️ Tarea de las {} actualizada: {}.", a.key(), a.text)
        }
        Outcome::Upcoming(entries) => {
            if entries.is_empty() {
                "📭 Nada en el próximo minuto.".to_string()
            } else {
                let mut out = String::from("⏰ Próximas tareas:");
                for a in entries {
                    out.push_str(&format!("\n🕒 {a}"));
                }
                out
            }
        }
    }
}

pub fn render_parse_error(err: &ParseError) -> String {
    match err {
        ParseError::UnknownCommand { .. } => "🤔 No entendí tu solicitud.".to_string(),
        ParseError::BadDatetime { input } => {
            format!("⚠️ Fecha u hora inválida: '{input}'. Usa YYYY-MM-DD HH:MM.")
        }
        ParseError::MissingArgument { what } => {
            format!("⚠️ Faltan argumentos: {what}.")
        }
    }
}

pub fn render_exec_error(err: &ExecError) -> String {
    match err {
        ExecError::InvalidDatetime { input } => {
            format!("⚠️ Fecha u hora inválida: '{input}'. Usa YYYY-MM-DD HH:MM.")
        }
        ExecError::NotFound { when } => {
            format!("⚠️ No encontré ninguna tarea a las {when}.")
        }
        ExecError::Io(e) => {
            format!("❌ No pude guardar la agenda: {e}.")
        }
    }
}
