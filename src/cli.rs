use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Line-oriented task tracker.
/// Tasks live in ./data/duke.txt or a path passed via --file.
#[derive(Parser, Debug)]
#[command(name = "borat", version, about = "Chat-style task tracking assistant")]
pub struct Cli {
    /// Path to the task file.
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    /// Path to a JSON settings file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable coloured output.
    #[arg(long)]
    pub no_color: bool,

    /// Skip the greeting banner.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
