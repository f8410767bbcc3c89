//! # tick - a to-do list for the terminal
//!
//! A small, file-backed to-do list with an interactive TUI and a CLI
//! exposing the same operations for scripted use.
//!
//! ## Quick start
//!
//! ```bash
//! # Launch the interactive UI
//! tick ui
//!
//! # Or drive it from the shell
//! tick add "Buy milk"
//! tick list
//! tick done 1
//! tick edit 1 "Buy oat milk"
//! tick delete 1
//! ```
//!
//! Tasks are stored as a single JSON file at `~/.tick/tasks.json`
//! (override with `--db`). The whole collection is rewritten after
//! every change, so the file is always a complete, current snapshot.

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod storage;
pub mod store;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod input;
    pub mod run;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use store::TaskStore;

fn main() {
    let cli = Cli::parse();

    // Completions write to stdout and never touch the store.
    if let Commands::Completions { shell } = &cli.command {
        cmd_completions(*shell);
        return;
    }

    let db_path = cli.db.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let app_dir = PathBuf::from(home).join(".tick");
        if let Err(e) = std::fs::create_dir_all(&app_dir) {
            eprintln!("Failed to create app directory {}: {}", app_dir.display(), e);
            std::process::exit(1);
        }
        app_dir.join(storage::STORE_FILE)
    });

    // The UI and backup commands manage the store file themselves.
    match &cli.command {
        Commands::Ui => {
            cmd_ui(&db_path);
            return;
        }
        Commands::Backup => {
            cmd_backup(&db_path);
            return;
        }
        _ => {}
    }

    let (mut store, warning) = TaskStore::open(&db_path);
    if let Some(w) = warning {
        eprintln!("Warning: {w}");
    }

    match cli.command {
        Commands::Ui => unreachable!("UI command handled above"),
        Commands::Backup => unreachable!("Backup command handled above"),
        Commands::Completions { .. } => unreachable!("Completions command handled above"),

        Commands::Add { text } => cmd_add(&mut store, text),

        Commands::List { pending } => cmd_list(&store, pending),

        Commands::Done { id } => cmd_done(&mut store, id),

        Commands::Edit { id, text } => cmd_edit(&mut store, id, text),

        Commands::Delete { id } => cmd_delete(&mut store, id),

        Commands::Clear { yes } => cmd_clear(&mut store, yes),
    }
}
