//! Command implementations for the CLI interface.
//!
//! Each subcommand maps onto exactly one store operation; validation
//! and confirmation live here, at the boundary, never in the store.

use std::io::{self, Write};
use std::path::Path;

use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::store::{StoreError, TaskStore};
use crate::storage;
use crate::task::Task;
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI.
    Ui,

    /// Add a new task.
    Add {
        /// Task text.
        text: String,
    },

    /// List tasks.
    List {
        /// Only show tasks that are not done yet.
        #[arg(long)]
        pending: bool,
    },

    /// Toggle a task between done and pending.
    Done {
        /// Task ID.
        id: u64,
    },

    /// Replace the text of a task.
    Edit {
        /// Task ID.
        id: u64,
        /// Replacement text.
        text: String,
    },

    /// Delete a task.
    Delete {
        /// Task ID.
        id: u64,
    },

    /// Delete ALL tasks.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Create a timestamped backup of the store file.
    Backup,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface.
pub fn cmd_ui(db_path: &Path) {
    if let Err(e) = run_tui(db_path) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Add a new task to the store.
pub fn cmd_add(store: &mut TaskStore, text: String) {
    match store.add(&text) {
        Ok(id) => {
            warn_if_write_failed(store);
            println!("Added task {id}");
        }
        Err(StoreError::EmptyText) => {
            eprintln!("Please enter a task before adding.");
            std::process::exit(1);
        }
    }
}

/// Print the task list as a table.
pub fn cmd_list(store: &TaskStore, pending: bool) {
    let tasks: Vec<&Task> = store
        .tasks()
        .iter()
        .filter(|t| !pending || !t.completed)
        .collect();

    if tasks.is_empty() {
        println!("No tasks yet — add something!");
        return;
    }

    println!("{:<5} {:<5} {}", "ID", "Done", "Text");
    for t in tasks {
        let mark = if t.completed { "[x]" } else { "[ ]" };
        println!("{:<5} {:<5} {}", t.id, mark, t.text);
    }
}

/// Toggle a task's completion flag.
pub fn cmd_done(store: &mut TaskStore, id: u64) {
    if !store.toggle(id) {
        println!("Task {id} not found.");
        return;
    }
    warn_if_write_failed(store);
    match store.get(id) {
        Some(t) if t.completed => println!("Marked {id} done"),
        _ => println!("Reopened {id}"),
    }
}

/// Replace a task's text.
pub fn cmd_edit(store: &mut TaskStore, id: u64, text: String) {
    match store.edit(id, &text) {
        Ok(true) => {
            warn_if_write_failed(store);
            println!("Updated {id}");
        }
        Ok(false) => println!("Task {id} not found."),
        Err(StoreError::EmptyText) => {
            eprintln!("Task not updated — text cannot be empty.");
            std::process::exit(1);
        }
    }
}

/// Delete a single task.
pub fn cmd_delete(store: &mut TaskStore, id: u64) {
    if store.remove(id) {
        warn_if_write_failed(store);
        println!("Deleted {id}");
    } else {
        println!("Task {id} not found.");
    }
}

/// Delete every task, asking for confirmation unless `--yes` was given.
pub fn cmd_clear(store: &mut TaskStore, yes: bool) {
    if store.is_empty() {
        println!("Nothing to clear.");
        return;
    }
    if !yes && !confirm("Clear ALL tasks?") {
        println!("Aborted.");
        return;
    }
    let n = store.clear();
    warn_if_write_failed(store);
    println!("Cleared {n} task(s).");
}

/// Create a timestamped backup of the store file.
pub fn cmd_backup(db_path: &Path) {
    match storage::create_backup(db_path) {
        Ok(backup_path) => {
            println!("Backup created: {}", backup_path.display());
        }
        Err(e) => {
            eprintln!("Failed to create backup: {e}");
            std::process::exit(1);
        }
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;

    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

/// Ask a yes/no question on the terminal; anything but y/yes declines.
fn confirm(question: &str) -> bool {
    print!("{question} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Surface a failed persistence write as a warning. The in-memory
/// mutation already happened and is reported normally.
fn warn_if_write_failed(store: &mut TaskStore) {
    if let Some(w) = store.take_write_warning() {
        eprintln!("Warning: {w}");
    }
}
