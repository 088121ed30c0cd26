//! Enumerations and static schema tables.
//!
//! This module defines the task kinds, the command kinds understood by the
//! parser, and the per-command argument schema. The schema is plain data:
//! the parser reads it to validate arity and the help menu reads it to
//! describe each command.

use std::fmt;

/// The three flavours of task a user can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Todo,
    Deadline,
    Event,
}

impl TaskKind {
    /// Single-letter tag used as the first field of a persisted record.
    pub const fn tag(self) -> &'static str {
        match self {
            TaskKind::Todo => "T",
            TaskKind::Deadline => "D",
            TaskKind::Event => "E",
        }
    }

    /// Bracketed glyph shown in front of a rendered task.
    pub const fn glyph(self) -> &'static str {
        match self {
            TaskKind::Todo => "[T]",
            TaskKind::Deadline => "[D]",
            TaskKind::Event => "[E]",
        }
    }

    /// Parse a record tag back into a kind.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "T" => Some(TaskKind::Todo),
            "D" => Some(TaskKind::Deadline),
            "E" => Some(TaskKind::Event),
            _ => None,
        }
    }
}

/// Every command word the parser accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    List,
    Todo,
    Deadline,
    Event,
    Done,
    Delete,
    Find,
    Dates,
    Help,
    Bye,
}

impl CommandKind {
    /// Static schema entry for this kind.
    pub fn spec(self) -> &'static CommandSpec {
        // COMMANDS holds exactly one entry per kind, in declaration order.
        &COMMANDS[self as usize]
    }

    /// Lower-case command word.
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Case-insensitive lookup of a command word.
    pub fn from_word(word: &str) -> Option<Self> {
        COMMANDS
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(word))
            .map(|spec| spec.kind)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape of the arguments a command takes after its command word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// No arguments at all.
    Bare,
    /// Exactly one integer argument.
    Index,
    /// One or more words joined into free text.
    Text,
    /// Free text, then a separator word, then a date-spec.
    Dated { separator: &'static str },
}

impl Arity {
    /// Separator word between description and date-spec, for dated commands.
    pub fn separator(self) -> Option<&'static str> {
        match self {
            Arity::Dated { separator } => Some(separator),
            Arity::Bare | Arity::Index | Arity::Text => None,
        }
    }
}

/// Schema entry describing one command.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub kind: CommandKind,
    pub name: &'static str,
    pub arity: Arity,
    pub arguments: &'static str,
    pub summary: &'static str,
    pub example: &'static str,
}

/// One entry per [`CommandKind`], in the same order as the enum.
pub static COMMANDS: [CommandSpec; 10] = [
    CommandSpec {
        kind: CommandKind::List,
        name: "list",
        arity: Arity::Bare,
        arguments: "",
        summary: "Lists all the tasks.",
        example: "list",
    },
    CommandSpec {
        kind: CommandKind::Todo,
        name: "todo",
        arity: Arity::Text,
        arguments: "[description]",
        summary: "Adds a todo task.",
        example: "todo watch Borat",
    },
    CommandSpec {
        kind: CommandKind::Deadline,
        name: "deadline",
        arity: Arity::Dated { separator: "/by" },
        arguments: "[description] /by [date]",
        summary: "Adds a task with a deadline.",
        example: "deadline watch Borat /by 2021-08-21 18:00",
    },
    CommandSpec {
        kind: CommandKind::Event,
        name: "event",
        arity: Arity::Dated { separator: "/at" },
        arguments: "[description] /at [date]",
        summary: "Adds an event happening at a given time.",
        example: "event Borat concert /at 2021-08-21 18:00",
    },
    CommandSpec {
        kind: CommandKind::Done,
        name: "done",
        arity: Arity::Index,
        arguments: "[index]",
        summary: "Marks a task as done.",
        example: "done 5",
    },
    CommandSpec {
        kind: CommandKind::Delete,
        name: "delete",
        arity: Arity::Index,
        arguments: "[index]",
        summary: "Removes a task from the list.",
        example: "delete 5",
    },
    CommandSpec {
        kind: CommandKind::Find,
        name: "find",
        arity: Arity::Text,
        arguments: "[keyword]",
        summary: "Finds tasks whose description contains the keyword.",
        example: "find book",
    },
    CommandSpec {
        kind: CommandKind::Dates,
        name: "dates",
        arity: Arity::Bare,
        arguments: "",
        summary: "Shows the accepted date formats.",
        example: "dates",
    },
    CommandSpec {
        kind: CommandKind::Help,
        name: "help",
        arity: Arity::Bare,
        arguments: "",
        summary: "Shows all the commands available.",
        example: "help",
    },
    CommandSpec {
        kind: CommandKind::Bye,
        name: "bye",
        arity: Arity::Bare,
        arguments: "",
        summary: "Quits the app.",
        example: "bye",
    },
];

/// Accepted date-spec shapes with a sample of each.
pub const DATE_FORMATS: [(&str, &str); 8] = [
    ("today", "today"),
    ("tomorrow", "tomorrow"),
    ("yyyy-m-d", "2021-8-6"),
    ("yyyy/m/d", "2021/08/06"),
    ("d-m-yyyy", "6-8-2021"),
    ("d/m/yyyy", "06/08/2021"),
    ("[date] h:mm", "2021-08-06 9:05"),
    ("[date] hhmm", "6/8/2021 1800"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_table_matches_enum_order() {
        for (position, spec) in COMMANDS.iter().enumerate() {
            assert_eq!(spec.kind as usize, position, "{} out of order", spec.name);
        }
    }

    #[test]
    fn command_words_match_case_insensitively() {
        assert_eq!(CommandKind::from_word("LIST"), Some(CommandKind::List));
        assert_eq!(CommandKind::from_word("DeadLine"), Some(CommandKind::Deadline));
        assert_eq!(CommandKind::from_word("lists"), None);
        assert_eq!(CommandKind::from_word(""), None);
    }

    #[test]
    fn record_tags_round_trip() {
        for kind in [TaskKind::Todo, TaskKind::Deadline, TaskKind::Event] {
            assert_eq!(TaskKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(TaskKind::from_tag("X"), None);
    }
}
