// End-to-end command flow: raw string → parser → executor → rendered reply,
// over a real snapshot file.

use orbis_agenda::{parser, render, AppointmentStore, CommandExecutor, Outcome};

fn run(ex: &CommandExecutor, cmd: &str) -> String {
    match parser::parse(cmd) {
        Ok(op) => match ex.execute(op, None) {
            Ok(outcome) => render::render_outcome(&outcome),
            Err(e) => render::render_exec_error(&e),
        },
        Err(e) => render::render_parse_error(&e),
    }
}

#[test]
fn full_session_over_one_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agenda.json");
    let ex = CommandExecutor::new(AppointmentStore::load(&path));

    assert_eq!(run(&ex, "/agenda"), "📭 Tu agenda está vacía.");

    let reply = run(&ex, "/registrar 2025-09-22 16:00 Reunión con Laura");
    assert_eq!(
        reply,
        "✅ He registrado 'Reunión con Laura' a las 2025-09-22 16:00."
    );

    run(&ex, "/registrar 2025-09-22 09:30 Audiencia");
    run(&ex, "/registrar 2025-09-23 10:00 Dentista");

    let listing = run(&ex, "/agenda");
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines[0], "📝 Agenda:");
    assert!(lines[1].contains("2025-09-22 09:30"));
    assert!(lines[2].contains("2025-09-22 16:00"));
    assert!(lines[3].contains("2025-09-23 10:00"));

    // Case-insensitive search.
    let search = run(&ex, "/buscar laura");
    assert!(search.contains("Reunión con Laura"));

    // Day delete with the DD/MM/YYYY surface form.
    let wiped = run(&ex, "/borrar_fecha 22/09/2025");
    assert_eq!(wiped, "🗑️ He borrado 2 tareas del 2025-09-22.");

    let listing = run(&ex, "/agenda");
    assert!(listing.contains("Dentista"));
    assert!(!listing.contains("Laura"));

    // Second wipe of the same day is a zero-count success.
    assert_eq!(run(&ex, "/borrar_fecha 22/09/2025"), "📭 No había tareas el 2025-09-22.");
}

#[test]
fn reschedule_and_modify_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let ex = CommandExecutor::new(AppointmentStore::load(dir.path().join("agenda.json")));

    run(&ex, "/registrar 2025-09-22 16:00 cita presencial");

    let moved = run(&ex, "/reprogramar 2025-09-22 16:00 2025-09-23 10:30");
    assert_eq!(
        moved,
        "⏳ He movido 'cita presencial' de 2025-09-22 16:00 a 2025-09-23 10:30."
    );

    let edited = run(&ex, "/modificar 2025-09-23 10:30 cita virtual");
    assert!(edited.contains("cita virtual"));

    let when = run(&ex, "/cuando cita");
    assert!(when.contains("2025-09-23 10:30"));
}

#[test]
fn parse_and_exec_errors_become_user_messages() {
    let dir = tempfile::tempdir().unwrap();
    let ex = CommandExecutor::new(AppointmentStore::load(dir.path().join("agenda.json")));

    assert_eq!(run(&ex, "hola orbis"), "🤔 No entendí tu solicitud.");
    assert!(run(&ex, "/registrar mañana temprano cita").starts_with("⚠️ Fecha u hora inválida"));
    assert!(run(&ex, "/registrar 2025-09-22 16:00").starts_with("⚠️ Faltan argumentos"));
    assert_eq!(
        run(&ex, "/borrar 2025-09-22 16:00"),
        "⚠️ No encontré ninguna tarea a las 2025-09-22 16:00."
    );
}

#[test]
fn snapshot_survives_restart_mid_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agenda.json");

    {
        let ex = CommandExecutor::new(AppointmentStore::load(&path));
        run(&ex, "/registrar 2025-09-22 16:00 sobrevive");
    }

    let ex = CommandExecutor::new(AppointmentStore::load(&path));
    let outcome = ex
        .execute(parser::parse("/agenda").unwrap(), None)
        .unwrap();
    let Outcome::Listing(entries) = outcome else {
        panic!("wrong outcome");
    };
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "sobrevive");
}
