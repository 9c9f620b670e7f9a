use thiserror::Error;

/// Errors produced while turning a raw command string into an [`Operation`].
///
/// [`Operation`]: crate::ops::Operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The first token is not a recognized command verb.
    #[error("unknown command: {verb}")]
    UnknownCommand { verb: String },

    /// A `DATE TIME` pair (or bare date) did not parse.
    #[error("bad date/time: {input}")]
    BadDatetime { input: String },

    /// A required positional argument is absent.
    #[error("missing argument: {what}")]
    MissingArgument { what: &'static str },
}

/// Errors produced while applying an operation to the store.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The supplied timestamp is not a valid `YYYY-MM-DD HH:MM` instant.
    #[error("invalid date/time: {input}")]
    InvalidDatetime { input: String },

    /// No appointment exists at the given key.
    #[error("no appointment at {when}")]
    NotFound { when: String },

    /// The snapshot could not be persisted; the mutation is not durable.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
}
