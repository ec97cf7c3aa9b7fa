use std::num::ParseIntError;
use thiserror::Error;

/// Why a single script line could not be turned into a [`Command`](crate::Command).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("{command} requires an argument")]
    MissingArgument { command: &'static str },

    #[error("{command} expects a non-negative integer, got '{value}'")]
    InvalidNumber {
        command: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Errors returned by [`Engine::step`](crate::Engine::step).
#[derive(Debug, Error)]
pub enum Error {
    /// A line could not be parsed. The run cannot continue past it.
    #[error("line {line}: {source}: {text}")]
    Parse {
        line: usize,
        text: String,
        #[source]
        source: ParseError,
    },

    /// The keyboard or layout backend failed.
    #[error(transparent)]
    Device(#[from] anyhow::Error),
}
