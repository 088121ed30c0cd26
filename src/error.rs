//! Error types shared across the crate.
//!
//! Parser and store failures are ordinary values the dispatcher turns into
//! replies. Storage failures carry the path and the underlying I/O error.

use std::path::PathBuf;

use thiserror::Error;

use crate::fields::CommandKind;

/// Failure to normalise a date-spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("invalid date")]
    InvalidDate,
    #[error("invalid time")]
    InvalidTime,
}

/// Failure to parse or execute a single command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command")]
    InvalidCommand,
    #[error("wrong number of arguments for `{0}`")]
    InvalidArgument(CommandKind),
    #[error("`{0}` needs a description")]
    MissingDescription(CommandKind),
    #[error("`{0}` needs a date")]
    MissingDate(CommandKind),
    #[error("invalid date for `{0}`")]
    InvalidDate(CommandKind),
    #[error("invalid time for `{0}`")]
    InvalidTime(CommandKind),
    #[error("`{0}` needs an integer argument")]
    WrongArgumentType(CommandKind),
    #[error("description for `{0}` may not contain `|`")]
    ReservedDelimiter(CommandKind),
    #[error("task {index} does not exist (list has {size})")]
    IndexOutOfRange { index: i64, size: usize },
}

impl CommandError {
    /// Attach the command a date-spec belonged to.
    pub fn from_date(kind: CommandKind, err: DateError) -> Self {
        match err {
            DateError::InvalidDate => CommandError::InvalidDate(kind),
            DateError::InvalidTime => CommandError::InvalidTime(kind),
        }
    }

    /// The command this error is about, when known.
    pub fn command(&self) -> Option<CommandKind> {
        match self {
            CommandError::InvalidCommand | CommandError::IndexOutOfRange { .. } => None,
            CommandError::InvalidArgument(kind)
            | CommandError::MissingDescription(kind)
            | CommandError::MissingDate(kind)
            | CommandError::InvalidDate(kind)
            | CommandError::InvalidTime(kind)
            | CommandError::WrongArgumentType(kind)
            | CommandError::ReservedDelimiter(kind) => Some(*kind),
        }
    }
}

/// Failure touching the backing task file.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to back up {path} before rewriting it: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure that ends the read-execute-reply loop.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to read input: {0}")]
    Input(#[source] std::io::Error),
    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

/// Reason a persisted line could not be turned back into a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("line is not valid UTF-8")]
    Encoding,
    #[error("unknown task kind `{0}`")]
    UnknownKind(String),
    #[error("done flag must be 0 or 1, found `{0}`")]
    BadFlag(String),
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("empty description")]
    EmptyDescription,
    #[error("unreadable date `{0}`")]
    BadDate(String),
}

/// Failure loading the optional settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
