//! Terminal presentation.
//!
//! Frames replies between rule lines and prints the greeting banner. Holds
//! no task logic: it only receives finished strings.

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

use crate::fields::{COMMANDS, DATE_FORMATS};

pub const INDENT: &str = "    ";
pub const BOT_LINE: &str = "============================================================";
pub const USER_LINE: &str = "_ _ _ _ _ _ _ _ _ _ _ _ _ _ _ _ _ _ _ _ _ _ _ _ _ _ _ _ _ _";

const LOGO: [&str; 5] = [
    "██████   ██████  ██████   █████  ████████ ",
    "██   ██ ██    ██ ██   ██ ██   ██    ██    ",
    "██████  ██    ██ ██████  ███████    ██    ",
    "██   ██ ██    ██ ██   ██ ██   ██    ██    ",
    "██████   ██████  ██   ██ ██   ██    ██",
];

pub const GREETING: &str = "Jak się masz? My name-a Borat. I like you.\nWhat I do for you?";
pub const FAREWELL: &str = "Bye. Have a good time!";

/// Output port used by the dispatcher.
pub struct Ui<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> Ui<W> {
    pub fn new(out: W, color: bool) -> Self {
        Ui { out, color }
    }

    /// Logo and greeting.
    pub fn show_banner(&mut self) -> io::Result<()> {
        self.rule(BOT_LINE, Color::Yellow)?;
        for line in LOGO {
            self.colored(&format!("{INDENT}{line}\n"), Color::Yellow)?;
        }
        self.rule(BOT_LINE, Color::Yellow)?;
        self.show_message(GREETING)
    }

    /// Frame one reply.
    pub fn show_message(&mut self, message: &str) -> io::Result<()> {
        self.rule(USER_LINE, Color::DarkGrey)?;
        for line in message.lines() {
            writeln!(self.out, "{INDENT}{line}")?;
        }
        writeln!(self.out, " ")?;
        self.rule(BOT_LINE, Color::Yellow)?;
        self.out.flush()
    }

    /// Frame an error or warning.
    pub fn show_error(&mut self, message: &str) -> io::Result<()> {
        self.rule(USER_LINE, Color::DarkGrey)?;
        for line in message.lines() {
            self.colored(&format!("{INDENT}{line}\n"), Color::Red)?;
        }
        writeln!(self.out, " ")?;
        self.rule(BOT_LINE, Color::Yellow)?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn rule(&mut self, line: &str, color: Color) -> io::Result<()> {
        self.colored(&format!("{INDENT}{line}\n"), color)
    }

    fn colored(&mut self, text: &str, color: Color) -> io::Result<()> {
        if self.color {
            queue!(self.out, SetForegroundColor(color), Print(text), ResetColor)
        } else {
            self.out.write_all(text.as_bytes())
        }
    }
}

/// `(1) list   -->   Lists all the tasks.` for every command.
pub fn help_menu() -> String {
    COMMANDS
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let usage = if spec.arguments.is_empty() {
                spec.name.to_string()
            } else {
                format!("{} {}", spec.name, spec.arguments)
            };
            format!("({}) {usage}   -->   {}", i + 1, spec.summary)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Accepted date-spec shapes with an example each.
pub fn dates_menu() -> String {
    let mut lines = vec!["Dates can be written as:".to_string()];
    lines.extend(
        DATE_FORMATS
            .iter()
            .enumerate()
            .map(|(i, (shape, sample))| format!("({}) {shape}   e.g. {sample}", i + 1)),
    );
    lines.push("A missing time means 23:59.".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_framed_and_indented() {
        let mut ui = Ui::new(Vec::new(), false);
        ui.show_message("first\nsecond").unwrap();
        let text = String::from_utf8(ui.into_inner()).unwrap();
        assert_eq!(
            text,
            format!("{INDENT}{USER_LINE}\n{INDENT}first\n{INDENT}second\n \n{INDENT}{BOT_LINE}\n")
        );
    }

    #[test]
    fn colour_adds_escape_codes() {
        let mut ui = Ui::new(Vec::new(), true);
        ui.show_error("oops").unwrap();
        let text = String::from_utf8(ui.into_inner()).unwrap();
        assert!(text.contains('\u{1b}'));
        assert!(text.contains("oops"));
    }

    #[test]
    fn help_lists_every_command() {
        let menu = help_menu();
        assert_eq!(menu.lines().count(), COMMANDS.len());
        assert!(menu.starts_with("(1) list   -->   Lists all the tasks."));
        assert!(menu.contains("(3) deadline [description] /by [date]"));
    }

    #[test]
    fn dates_menu_mentions_default_time() {
        let menu = dates_menu();
        assert!(menu.contains("6/8/2021 1800"));
        assert!(menu.ends_with("A missing time means 23:59."));
    }
}
