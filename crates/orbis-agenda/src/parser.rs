//! Command-string parser.
//!
//! Input is whitespace-tokenized; the first token is the verb
//! (case-insensitive, leading `/` optional). Each argument token is cleaned
//! of surrounding quotes and whitespace before interpretation. Free-text
//! tails are rejoined with single spaces.

use orbis_core::timekey;

use crate::error::ParseError;
use crate::ops::Operation;

/// Window used by `/proximos`, matching the external poll cadence.
const UPCOMING_WINDOW_SECS: u64 = 60;

/// Parse one raw command string into a typed [`Operation`].
pub fn parse(input: &str) -> Result<Operation, ParseError> {
    let mut tokens = input.split_whitespace().map(clean_token);
    let verb_raw = tokens.next().unwrap_or("");
    let verb = verb_raw.trim_start_matches('/').to_lowercase();
    let args: Vec<&str> = tokens.collect();

    match verb.as_str() {
        "agenda" => Ok(Operation::List),
        "registrar" => {
            let when = take_when(&args, "DATE TIME")?;
            let text = take_tail(&args, 2, "TEXT")?;
            Ok(Operation::Register { when, text })
        }
        "borrar" => {
            let when = take_when(&args, "DATE TIME")?;
            Ok(Operation::Delete { when })
        }
        "borrar_fecha" => {
            let date = take_date(&args, "DATE")?;
            Ok(Operation::DeleteByDate { date })
        }
        "borrar_todo" => Ok(Operation::DeleteAll),
        "buscar" => {
            let query = take_tail(&args, 0, "TEXT")?.to_lowercase();
            Ok(Operation::Search { query })
        }
        "cuando" => {
            let query = take_tail(&args, 0, "NAME")?.to_lowercase();
            Ok(Operation::FindDatesByText { query })
        }
        "reprogramar" => {
            if args.len() < 4 {
                return Err(ParseError::MissingArgument {
                    what: "OLD_DATE OLD_TIME NEW_DATE NEW_TIME",
                });
            }
            let old_when = join_when(args[0], args[1])?;
            let new_when = join_when(args[2], args[3])?;
            Ok(Operation::Reschedule { old_when, new_when })
        }
        "modificar" => {
            let when = take_when(&args, "DATE TIME")?;
            let new_text = take_tail(&args, 2, "NEW_TEXT")?;
            Ok(Operation::Modify { when, new_text })
        }
        "buscar_fecha" => {
            let date = take_date(&args, "DATE")?;
            Ok(Operation::FindByDate { date })
        }
        "proximos" => Ok(Operation::UpcomingWithin {
            window_secs: UPCOMING_WINDOW_SECS,
        }),
        _ => Err(ParseError::UnknownCommand {
            verb: verb_raw.to_string(),
        }),
    }
}

/// Strip surrounding quotes and whitespace from one token.
fn clean_token(tok: &str) -> &str {
    tok.trim().trim_matches(|c| c == '"' || c == '\'')
}

/// First two args as a validated, normalized `"YYYY-MM-DD HH:MM"` key.
fn take_when(args: &[&str], what: &'static str) -> Result<String, ParseError> {
    if args.len() < 2 {
        return Err(ParseError::MissingArgument { what });
    }
    join_when(args[0], args[1])
}

fn join_when(date: &str, time: &str) -> Result<String, ParseError> {
    let candidate = format!("{date} {time}");
    match timekey::parse_key(&candidate) {
        Some(dt) => Ok(timekey::format_key(dt)),
        None => Err(ParseError::BadDatetime { input: candidate }),
    }
}

/// Single date argument, accepting `YYYY-MM-DD` or `DD/MM/YYYY`.
fn take_date(args: &[&str], what: &'static str) -> Result<chrono::NaiveDate, ParseError> {
    let raw = args.first().ok_or(ParseError::MissingArgument { what })?;
    timekey::parse_date(raw).ok_or_else(|| ParseError::BadDatetime {
        input: raw.to_string(),
    })
}

/// Args from `skip` onward, rejoined with single spaces. Empty tail is a
/// parse error for verbs that require text.
fn take_tail(args: &[&str], skip: usize, what: &'static str) -> Result<String, ParseError> {
    let tail: Vec<&str> = args.iter().skip(skip).copied().filter(|s| !s.is_empty()).collect();
    if tail.is_empty() {
        return Err(ParseError::MissingArgument { what });
    }
    Ok(tail.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agenda_lists() {
        assert_eq!(parse("/agenda").unwrap(), Operation::List);
    }

    #[test]
    fn verb_is_case_insensitive_and_slash_optional() {
        assert_eq!(parse("AGENDA").unwrap(), Operation::List);
        assert_eq!(parse("/Agenda").unwrap(), Operation::List);
        assert_eq!(parse("borrar_todo").unwrap(), Operation::DeleteAll);
    }

    #[test]
    fn registrar_joins_tail_with_single_spaces() {
        let op = parse("/registrar 2025-09-22 16:00 Reunión   con   Laura").unwrap();
        assert_eq!(
            op,
            Operation::Register {
                when: "2025-09-22 16:00".into(),
                text: "Reunión con Laura".into(),
            }
        );
    }

    #[test]
    fn registrar_strips_quotes_from_arguments() {
        let op = parse(r#"/registrar "2025-09-22" '16:00' "cita""#).unwrap();
        assert_eq!(
            op,
            Operation::Register {
                when: "2025-09-22 16:00".into(),
                text: "cita".into(),
            }
        );
    }

    #[test]
    fn registrar_without_text_is_missing_argument() {
        assert!(matches!(
            parse("/registrar 2025-09-22 16:00"),
            Err(ParseError::MissingArgument { .. })
        ));
    }

    #[test]
    fn registrar_with_bad_datetime_fails() {
        assert!(matches!(
            parse("/registrar 2025-13-22 16:00 cita"),
            Err(ParseError::BadDatetime { .. })
        ));
    }

    #[test]
    fn borrar_requires_date_and_time() {
        assert_eq!(
            parse("/borrar 2025-09-22 16:00").unwrap(),
            Operation::Delete {
                when: "2025-09-22 16:00".into()
            }
        );
        assert!(matches!(
            parse("/borrar 2025-09-22"),
            Err(ParseError::MissingArgument { .. })
        ));
    }

    #[test]
    fn borrar_fecha_normalizes_dd_mm_yyyy() {
        let op = parse("/borrar_fecha 22/09/2025").unwrap();
        let Operation::DeleteByDate { date } = op else {
            panic!("wrong operation");
        };
        assert_eq!(timekey::format_date(date), "2025-09-22");
    }

    #[test]
    fn borrar_fecha_accepts_iso() {
        assert!(matches!(
            parse("/borrar_fecha 2025-09-22"),
            Ok(Operation::DeleteByDate { .. })
        ));
    }

    #[test]
    fn buscar_lowercases_query() {
        assert_eq!(
            parse("/buscar LAURA García").unwrap(),
            Operation::Search {
                query: "laura garcía".into()
            }
        );
    }

    #[test]
    fn cuando_lowercases_query() {
        assert_eq!(
            parse("/cuando Dentista").unwrap(),
            Operation::FindDatesByText {
                query: "dentista".into()
            }
        );
    }

    #[test]
    fn reprogramar_needs_four_arguments() {
        let op = parse("/reprogramar 2025-09-22 16:00 2025-09-23 10:30").unwrap();
        assert_eq!(
            op,
            Operation::Reschedule {
                old_when: "2025-09-22 16:00".into(),
                new_when: "2025-09-23 10:30".into(),
            }
        );
        assert!(matches!(
            parse("/reprogramar 2025-09-22 16:00 2025-09-23"),
            Err(ParseError::MissingArgument { .. })
        ));
    }

    #[test]
    fn modificar_carries_new_text() {
        assert_eq!(
            parse("/modificar 2025-09-22 16:00 ahora virtual").unwrap(),
            Operation::Modify {
                when: "2025-09-22 16:00".into(),
                new_text: "ahora virtual".into(),
            }
        );
    }

    #[test]
    fn buscar_fecha_produces_find_by_date() {
        assert!(matches!(
            parse("/buscar_fecha 2025-09-22"),
            Ok(Operation::FindByDate { .. })
        ));
    }

    #[test]
    fn proximos_uses_one_minute_window() {
        assert_eq!(
            parse("/proximos").unwrap(),
            Operation::UpcomingWithin { window_secs: 60 }
        );
    }

    #[test]
    fn unknown_verb_is_rejected() {
        let err = parse("/volar a marte").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownCommand {
                verb: "/volar".into()
            }
        );
    }

    #[test]
    fn empty_input_is_unknown_command() {
        assert!(matches!(parse(""), Err(ParseError::UnknownCommand { .. })));
        assert!(matches!(parse("   "), Err(ParseError::UnknownCommand { .. })));
    }

    #[test]
    fn non_padded_input_normalizes_to_canonical_key() {
        let op = parse("/borrar 2025-9-2 6:05").unwrap();
        assert_eq!(
            op,
            Operation::Delete {
                when: "2025-09-02 06:05".into()
            }
        );
    }
}
