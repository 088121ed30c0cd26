//! # borat - chat-style task tracker
//!
//! Reads one command per line, keeps an ordered task list in memory and
//! mirrors every change to a plain-text file.
//!
//! ```text
//! todo read book
//! deadline return book /by 6/8/2021 1800
//! event project meeting /at tomorrow 14:00
//! list
//! done 2
//! find book
//! delete 1
//! bye
//! ```
//!
//! Tasks are stored in `./data/duke.txt` unless `--file` says otherwise.

pub mod cli;
pub mod config;
pub mod datetime;
pub mod db;
pub mod dispatcher;
pub mod error;
pub mod fields;
pub mod parser;
pub mod store;
pub mod task;
pub mod ui;
