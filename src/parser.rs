//! Command-line parsing and validation.
//!
//! A raw input line becomes a fully validated [`Command`] or a
//! [`CommandError`]. Each [`CommandKind`] is matched explicitly; the
//! separator words come from [`crate::fields::COMMANDS`]. Nothing here
//! executes a command.

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::datetime;
use crate::error::CommandError;
use crate::fields::CommandKind;

/// Word that may never appear inside a stored description.
const RESERVED_WORD: &str = "|";

/// A validated command, carrying only what execution needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Todo { description: String },
    Deadline { description: String, due: NaiveDateTime },
    Event { description: String, at: NaiveDateTime },
    Done { index: i64 },
    Delete { index: i64 },
    Find { keyword: String },
    Dates,
    Help,
    Bye,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::List => CommandKind::List,
            Command::Todo { .. } => CommandKind::Todo,
            Command::Deadline { .. } => CommandKind::Deadline,
            Command::Event { .. } => CommandKind::Event,
            Command::Done { .. } => CommandKind::Done,
            Command::Delete { .. } => CommandKind::Delete,
            Command::Find { .. } => CommandKind::Find,
            Command::Dates => CommandKind::Dates,
            Command::Help => CommandKind::Help,
            Command::Bye => CommandKind::Bye,
        }
    }

    /// Whether executing this command changes the task list.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::Todo { .. }
                | Command::Deadline { .. }
                | Command::Event { .. }
                | Command::Done { .. }
                | Command::Delete { .. }
        )
    }
}

/// Parse a line against today's local date.
pub fn parse(raw: &str) -> Result<Command, CommandError> {
    parse_at(raw, Local::now().date_naive())
}

/// Parse a line, resolving `today`/`tomorrow` against `today`.
pub fn parse_at(raw: &str, today: NaiveDate) -> Result<Command, CommandError> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let Some((word, args)) = tokens.split_first() else {
        return Err(CommandError::InvalidCommand);
    };
    let kind = CommandKind::from_word(word).ok_or(CommandError::InvalidCommand)?;

    match kind {
        CommandKind::List => no_args(kind, args).map(|()| Command::List),
        CommandKind::Dates => no_args(kind, args).map(|()| Command::Dates),
        CommandKind::Help => no_args(kind, args).map(|()| Command::Help),
        CommandKind::Bye => no_args(kind, args).map(|()| Command::Bye),
        CommandKind::Done => index_arg(kind, args).map(|index| Command::Done { index }),
        CommandKind::Delete => index_arg(kind, args).map(|index| Command::Delete { index }),
        CommandKind::Todo => text_args(kind, args)
            .and_then(|words| checked_description(kind, words))
            .map(|description| Command::Todo { description }),
        CommandKind::Find => text_args(kind, args).map(|words| Command::Find {
            keyword: words.join(" "),
        }),
        CommandKind::Deadline => dated_args(kind, args, today)
            .map(|(description, due)| Command::Deadline { description, due }),
        CommandKind::Event => dated_args(kind, args, today)
            .map(|(description, at)| Command::Event { description, at }),
    }
}

fn no_args(kind: CommandKind, args: &[&str]) -> Result<(), CommandError> {
    match args {
        [] => Ok(()),
        _ => Err(CommandError::InvalidArgument(kind)),
    }
}

fn index_arg(kind: CommandKind, args: &[&str]) -> Result<i64, CommandError> {
    let [raw_index] = args else {
        return Err(CommandError::InvalidArgument(kind));
    };
    raw_index
        .parse::<i64>()
        .map_err(|_| CommandError::WrongArgumentType(kind))
}

fn text_args<'a, 'b>(kind: CommandKind, args: &'a [&'b str]) -> Result<&'a [&'b str], CommandError> {
    if args.is_empty() {
        return Err(CommandError::MissingDescription(kind));
    }
    Ok(args)
}

fn dated_args(
    kind: CommandKind,
    args: &[&str],
    today: NaiveDate,
) -> Result<(String, NaiveDateTime), CommandError> {
    let separator = kind
        .spec()
        .arity
        .separator()
        .ok_or(CommandError::MissingDate(kind))?;
    let args = text_args(kind, args)?;
    let (description, when) = split_dated(kind, args, separator)?;
    let when =
        datetime::normalize(&when, today).map_err(|err| CommandError::from_date(kind, err))?;
    Ok((description, when))
}

/// Split `words... SEP date-spec...` around exactly one separator.
///
/// A separator only counts when words precede and follow it, which is the
/// same as finding `" /by "` in the space-joined text. Every occurrence is
/// counted, so `a /by /by b` is ambiguous rather than "first wins".
fn split_dated(
    kind: CommandKind,
    args: &[&str],
    separator: &str,
) -> Result<(String, String), CommandError> {
    let last = args.len().saturating_sub(1);
    let positions: Vec<usize> = args
        .iter()
        .enumerate()
        .filter(|(position, word)| **word == separator && *position > 0 && *position < last)
        .map(|(position, _)| position)
        .collect();

    let split = match positions.as_slice() {
        [] => return Err(CommandError::MissingDate(kind)),
        [single] => *single,
        _ => return Err(CommandError::InvalidDate(kind)),
    };
    let description = checked_description(kind, &args[..split])?;
    Ok((description, args[split + 1..].join(" ")))
}

fn checked_description(kind: CommandKind, words: &[&str]) -> Result<String, CommandError> {
    if words.iter().any(|word| *word == RESERVED_WORD) {
        return Err(CommandError::ReservedDelimiter(kind));
    }
    let description = words.join(" ");
    if description.trim().is_empty() {
        return Err(CommandError::MissingDescription(kind));
    }
    Ok(description)
}
