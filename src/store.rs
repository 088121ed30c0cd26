//! In-memory task list.
//!
//! Tasks are addressed by 1-based position. Every operation returns the
//! confirmation text shown to the user.

use crate::error::CommandError;
use crate::task::Task;

/// Ordered list of tasks in insertion order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        TaskList { tasks }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Append a task.
    pub fn add(&mut self, task: Task) -> String {
        let line = task.to_string();
        self.tasks.push(task);
        format!(
            "Got it. I've added this task:\n  {line}\n{}",
            self.count_sentence()
        )
    }

    /// Remove the task at a 1-based position.
    pub fn remove(&mut self, index: i64) -> Result<String, CommandError> {
        let slot = slot(index, self.len())?;
        let task = self.tasks.remove(slot);
        Ok(format!(
            "Noted. I've removed this task:\n  {task}\n{}",
            self.count_sentence()
        ))
    }

    /// Mark the task at a 1-based position as done. Re-marking is allowed.
    ///
    /// Returns the confirmation text and the updated task.
    pub fn mark_done(&mut self, index: i64) -> Result<(String, &Task), CommandError> {
        let slot = slot(index, self.len())?;
        let task = &mut self.tasks[slot];
        task.mark_done();
        let reply = format!("Nice! I've marked this task as done:\n  {task}");
        Ok((reply, task))
    }

    /// Tasks whose description contains `keyword`, keeping their positions.
    pub fn find(&self, keyword: &str) -> String {
        let matches: Vec<(usize, &Task)> = self
            .numbered()
            .filter(|(_, task)| task.description.contains(keyword))
            .collect();
        if matches.is_empty() {
            return format!("No tasks match \"{keyword}\".");
        }
        let mut out = String::from("Here are the matching tasks in your list:");
        push_lines(&mut out, matches);
        out
    }

    /// Numbered listing of every task.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return "Your list is empty.".to_string();
        }
        let mut out = String::from("Here are the tasks in your list:");
        push_lines(&mut out, self.numbered());
        out
    }

    fn numbered(&self) -> impl Iterator<Item = (usize, &Task)> {
        self.tasks.iter().enumerate().map(|(slot, task)| (slot + 1, task))
    }

    fn count_sentence(&self) -> String {
        match self.len() {
            1 => "Now you have 1 task in the list.".to_string(),
            n => format!("Now you have {n} tasks in the list."),
        }
    }
}

/// Convert a 1-based position into a vector slot, checking bounds.
pub fn slot(index: i64, size: usize) -> Result<usize, CommandError> {
    usize::try_from(index)
        .ok()
        .filter(|position| (1..=size).contains(position))
        .map(|position| position - 1)
        .ok_or(CommandError::IndexOutOfRange { index, size })
}

fn push_lines<'a>(out: &mut String, lines: impl IntoIterator<Item = (usize, &'a Task)>) {
    for (position, task) in lines {
        out.push_str(&format!("\n{position}. {task}"));
    }
}
