//! CLI 模块

pub mod tasks;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "todo")]
#[command(version)]
#[command(about = "A single-list task manager for the terminal")]
pub struct Cli {
    /// Directory holding the task list and log file (default: ~/.todo)
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the interactive UI (default)
    Tui,
    /// Print all tasks
    List,
    /// Add a task
    Add {
        /// Task text (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Toggle a task between done and not done
    Toggle {
        /// Task id or 1-based position
        selector: String,
    },
    /// Delete a task
    Remove {
        /// Task id or 1-based position
        selector: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
