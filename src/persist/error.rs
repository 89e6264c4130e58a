//! Persistence error types.

use crate::automaton::BuildError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// What was wrong with a single line of a saved automaton.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormatErrorKind {
    /// The input holds no records at all
    #[error("expected a 'startstate' record, found end of input")]
    MissingStartState,

    /// The record keyword is not valid at this point
    #[error("expected '{expected}', found '{found}'")]
    UnexpectedKeyword {
        expected: &'static str,
        found: String,
    },

    /// The record has the wrong number of fields
    #[error("expected {expected} fields, found {found}")]
    WrongFieldCount { expected: &'static str, found: usize },

    /// A field that must be an integer is not one
    #[error("field '{field}' is not an integer: '{value}'")]
    InvalidInteger { field: &'static str, value: String },

    /// A field that must be a boolean is not one
    #[error("field '{field}' is not a boolean: '{value}'")]
    InvalidBoolean { field: &'static str, value: String },

    /// A transition names a state index that does not exist
    #[error("field '{field}' is {index}, but only {states} states are defined")]
    IndexOutOfRange {
        field: &'static str,
        index: i64,
        states: usize,
    },

    /// The records parsed but do not assemble into an automaton
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// A rejected line, with enough context to locate it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("line {line}: {kind} (in '{content}')")]
pub struct FormatError {
    /// 1-based line number
    pub line: usize,
    /// The offending line as read
    pub content: String,
    pub kind: FormatErrorKind,
}

/// Errors that can occur while saving or loading an automaton
#[derive(Debug, Error)]
pub enum PersistError {
    /// Reading or writing the file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file contents are not a valid automaton
    #[error("Invalid automaton format: {0}")]
    Format(#[from] FormatError),
}

impl PersistError {
    /// The format error kind, if this is a format error.
    pub fn format_kind(&self) -> Option<&FormatErrorKind> {
        match self {
            PersistError::Format(e) => Some(&e.kind),
            PersistError::Io { .. } => None,
        }
    }
}
