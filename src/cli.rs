use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Simple, file-backed to-do list.
/// Storage defaults to ~/.tick/tasks.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "tick", version, about = "To-do list for the terminal")]
pub struct Cli {
    /// Path to the JSON store file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
