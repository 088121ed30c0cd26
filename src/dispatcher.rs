//! The read-parse-execute-persist-reply loop.
//!
//! [`Dispatcher`] owns the task list, its file mirror and the I/O ports.
//! Every mutating command changes the list and the mirror in the same step
//! and then rewrites the file; a failed rewrite ends the loop.

use std::io::{BufRead, Write};
use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::db::{LoadReport, PersistenceLog, Record};
use crate::error::{CommandError, RunError, StorageError};
use crate::fields::Arity;
use crate::parser::{self, Command};
use crate::store::TaskList;
use crate::task::Task;
use crate::ui::{self, Ui};

/// Whether the loop keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Stopped,
}

/// Text to show for one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub failed: bool,
}

impl Reply {
    fn ok(text: impl Into<String>) -> Self {
        Reply {
            text: text.into(),
            failed: false,
        }
    }

    fn failed(text: impl Into<String>) -> Self {
        Reply {
            text: text.into(),
            failed: true,
        }
    }
}

#[derive(Debug, Error)]
enum Failure {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct Dispatcher<R: BufRead, W: Write> {
    input: R,
    ui: Ui<W>,
    tasks: TaskList,
    log: PersistenceLog,
    state: State,
    today: Option<NaiveDate>,
    notice: Option<String>,
}

impl<R: BufRead, W: Write> Dispatcher<R, W> {
    /// Open the task file at `path` and wire up the ports.
    ///
    /// A file that cannot be created, or that needs a backup which cannot
    /// be written, is an error. Other load problems become a startup notice.
    pub fn open(path: &Path, input: R, ui: Ui<W>) -> Result<Self, StorageError> {
        let (log, report) = PersistenceLog::open(path)?;
        let tasks = TaskList::new(log.tasks());
        let notice = load_notice(path, &report);
        info!(path = %path.display(), tasks = tasks.len(), "session started");
        Ok(Dispatcher {
            input,
            ui,
            tasks,
            log,
            state: State::Running,
            today: None,
            notice,
        })
    }

    /// Resolve `today`/`tomorrow` against a fixed date instead of the clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn log(&self) -> &PersistenceLog {
        &self.log
    }

    /// Warning produced while loading the task file, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn into_ui(self) -> Ui<W> {
        self.ui
    }

    /// Handle one input line.
    ///
    /// Parse and index errors come back as failed replies. Only a failed
    /// file rewrite is returned as an error.
    pub fn respond(&mut self, line: &str) -> Result<Reply, StorageError> {
        let parsed = match self.today {
            Some(today) => parser::parse_at(line, today),
            None => parser::parse(line),
        };
        let outcome = parsed
            .map_err(Failure::from)
            .and_then(|command| self.execute(command));
        match outcome {
            Ok(text) => Ok(Reply::ok(text)),
            Err(Failure::Command(err)) => {
                debug!(error = %err, "command rejected");
                Ok(Reply::failed(reply_for(&err)))
            }
            Err(Failure::Storage(err)) => Err(err),
        }
    }

    /// Drive the loop until `bye`, end of input, or a fatal error.
    pub fn run(&mut self, banner: bool) -> Result<(), RunError> {
        if banner {
            self.ui.show_banner().map_err(RunError::Output)?;
        }
        if let Some(notice) = self.notice.take() {
            self.ui.show_error(&notice).map_err(RunError::Output)?;
        }

        let mut line = String::new();
        while self.state == State::Running {
            line.clear();
            let read = self.input.read_line(&mut line).map_err(RunError::Input)?;
            if read == 0 {
                info!("end of input");
                self.state = State::Stopped;
                break;
            }
            let shown = match self.respond(&line) {
                Ok(reply) if reply.failed => self.ui.show_error(&reply.text),
                Ok(reply) => self.ui.show_message(&reply.text),
                Err(err) => {
                    error!(error = %err, "could not save tasks, stopping");
                    self.ui
                        .show_error(&format!(
                            "I could not save your tasks, so I must stop.\n{err}"
                        ))
                        .map_err(RunError::Output)?;
                    return Err(err.into());
                }
            };
            shown.map_err(RunError::Output)?;
        }
        Ok(())
    }

    fn execute(&mut self, command: Command) -> Result<String, Failure> {
        debug!(kind = %command.kind(), ?command, "executing");
        let mutation = command.is_mutation();
        let reply = match command {
            Command::List => self.tasks.render(),
            Command::Find { keyword } => self.tasks.find(&keyword),
            Command::Help => ui::help_menu(),
            Command::Dates => ui::dates_menu(),
            Command::Bye => {
                self.state = State::Stopped;
                ui::FAREWELL.to_string()
            }
            Command::Todo { description } => self.add(Task::todo(description)),
            Command::Deadline { description, due } => self.add(Task::deadline(description, due)),
            Command::Event { description, at } => self.add(Task::event(description, at)),
            Command::Done { index } => {
                let (reply, task) = self.tasks.mark_done(index)?;
                self.log.rewrite_at(index, Record::from_task(task))?;
                reply
            }
            Command::Delete { index } => {
                let reply = self.tasks.remove(index)?;
                self.log.remove_at(index)?;
                reply
            }
        };
        debug_assert_eq!(self.tasks.len(), self.log.len());
        if mutation {
            self.log.flush()?;
        }
        Ok(reply)
    }

    fn add(&mut self, task: Task) -> String {
        self.log.append(Record::from_task(&task));
        self.tasks.add(task)
    }
}

/// User-facing text for a rejected command.
pub fn reply_for(err: &CommandError) -> String {
    let message = match err {
        CommandError::InvalidCommand => {
            return "What you mean? Do: `help` to list all commands.".to_string()
        }
        CommandError::IndexOutOfRange { size: 0, .. } => {
            return "Your list is empty, there is nothing to pick.".to_string()
        }
        CommandError::IndexOutOfRange { index, size } => {
            return format!("There is no task {index}. Pick a number from 1 to {size}.")
        }
        CommandError::InvalidArgument(kind) => match kind.spec().arity {
            Arity::Bare => format!("`{kind}` command has no arguments."),
            _ => format!("`{kind}` command needs exactly 1 argument."),
        },
        CommandError::MissingDescription(kind) => format!("`{kind}` command needs a description."),
        CommandError::MissingDate(kind) => match kind.spec().arity {
            Arity::Dated { separator } => {
                format!("`{kind}` command needs a date. Use '{separator}' once.")
            }
            _ => format!("`{kind}` command needs a date."),
        },
        CommandError::InvalidDate(_) => {
            "That date I do not understand. Do: `dates` to see what I accept.".to_string()
        }
        CommandError::InvalidTime(_) => {
            "That time I do not understand. Use hh:mm or hhmm.".to_string()
        }
        CommandError::WrongArgumentType(kind) => {
            format!("`{kind}` command needs a task number.")
        }
        CommandError::ReservedDelimiter(_) => {
            "A description cannot contain the word `|`.".to_string()
        }
    };
    match err.command() {
        Some(kind) => format!("{message} (example: '{}')", kind.spec().example),
        None => message,
    }
}

fn load_notice(path: &Path, report: &LoadReport) -> Option<String> {
    if report.is_clean() {
        return None;
    }
    let mut lines = Vec::new();
    if let Some(err) = &report.unreadable {
        lines.push(format!("No saved tasks loaded: {err}"));
    }
    if report.skipped > 0 {
        lines.push(format!(
            "Skipped {} unreadable line(s) in {}; they will be dropped on the next save.",
            report.skipped,
            path.display()
        ));
    }
    if let Some(backup) = &report.backup {
        lines.push(format!("The old file was copied to {}.", backup.display()));
    }
    if report.unreadable.is_some() {
        lines.push("Starting with an empty list.".to_string());
    }
    Some(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::CommandKind;

    #[test]
    fn replies_cite_usage_examples() {
        assert_eq!(
            reply_for(&CommandError::WrongArgumentType(CommandKind::Done)),
            "`done` command needs a task number. (example: 'done 5')"
        );
        assert_eq!(
            reply_for(&CommandError::MissingDate(CommandKind::Event)),
            "`event` command needs a date. Use '/at' once. \
             (example: 'event Borat concert /at 2021-08-21 18:00')"
        );
        assert_eq!(
            reply_for(&CommandError::InvalidArgument(CommandKind::List)),
            "`list` command has no arguments. (example: 'list')"
        );
    }

    #[test]
    fn index_replies_depend_on_size() {
        assert_eq!(
            reply_for(&CommandError::IndexOutOfRange { index: 4, size: 3 }),
            "There is no task 4. Pick a number from 1 to 3."
        );
        assert_eq!(
            reply_for(&CommandError::IndexOutOfRange { index: 1, size: 0 }),
            "Your list is empty, there is nothing to pick."
        );
    }

    #[test]
    fn clean_load_has_no_notice() {
        assert_eq!(load_notice(Path::new("x"), &LoadReport::default()), None);
        let report = LoadReport {
            skipped: 2,
            ..LoadReport::default()
        };
        let notice = load_notice(Path::new("duke.txt"), &report).unwrap();
        assert!(notice.starts_with("Skipped 2 unreadable line(s) in duke.txt"));
    }

    #[test]
    fn unreadable_load_names_backup_and_empty_start() {
        let report = LoadReport {
            skipped: 0,
            unreadable: Some(StorageError::Read {
                path: "duke.txt".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            }),
            backup: Some(Path::new("backup").join("2021-08-20_10-00-00_duke.txt")),
        };
        let notice = load_notice(Path::new("duke.txt"), &report).expect("notice");
        let lines: Vec<&str> = notice.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("No saved tasks loaded: failed to read duke.txt"));
        assert_eq!(
            lines[1],
            format!(
                "The old file was copied to {}.",
                Path::new("backup").join("2021-08-20_10-00-00_duke.txt").display()
            )
        );
        assert_eq!(lines[2], "Starting with an empty list.");
    }
}
