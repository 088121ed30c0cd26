//! Task data structure.
//!
//! A task is a description, a done flag, and kind-specific timing: nothing
//! for a todo, a due date for a deadline, a start time for an event.

use std::fmt;

use chrono::NaiveDateTime;

use crate::datetime::format_human;
use crate::fields::TaskKind;

/// Kind-specific part of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    Todo,
    Deadline { due: NaiveDateTime },
    Event { at: NaiveDateTime },
}

/// A single entry in the task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub description: String,
    pub schedule: Schedule,
    pub done: bool,
}

impl Task {
    pub fn todo(description: impl Into<String>) -> Self {
        Self::with_schedule(description, Schedule::Todo)
    }

    pub fn deadline(description: impl Into<String>, due: NaiveDateTime) -> Self {
        Self::with_schedule(description, Schedule::Deadline { due })
    }

    pub fn event(description: impl Into<String>, at: NaiveDateTime) -> Self {
        Self::with_schedule(description, Schedule::Event { at })
    }

    fn with_schedule(description: impl Into<String>, schedule: Schedule) -> Self {
        Task {
            description: description.into(),
            schedule,
            done: false,
        }
    }

    pub fn kind(&self) -> TaskKind {
        match self.schedule {
            Schedule::Todo => TaskKind::Todo,
            Schedule::Deadline { .. } => TaskKind::Deadline,
            Schedule::Event { .. } => TaskKind::Event,
        }
    }

    /// The due date or start time, if the kind has one.
    pub fn when(&self) -> Option<NaiveDateTime> {
        match self.schedule {
            Schedule::Todo => None,
            Schedule::Deadline { due } => Some(due),
            Schedule::Event { at } => Some(at),
        }
    }

    pub fn mark_done(&mut self) {
        self.done = true;
    }

    fn done_marker(&self) -> &'static str {
        if self.done {
            "[X]"
        } else {
            "[ ]"
        }
    }
}

/// `[D][ ] return book (by: Aug 06 2021, 18:00)`
impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {}",
            self.kind().glyph(),
            self.done_marker(),
            self.description
        )?;
        match &self.schedule {
            Schedule::Todo => Ok(()),
            Schedule::Deadline { due } => write!(f, " (by: {})", format_human(due)),
            Schedule::Event { at } => write!(f, " (at: {})", format_human(at)),
        }
    }
}
