//! Task data structure.
//!
//! This module defines the `Task` struct, the sole entity in the store:
//! a short piece of text with a completion flag and a unique id.

use serde::{Deserialize, Serialize};

/// A single to-do entry.
///
/// `text` is always non-empty and trimmed of surrounding whitespace by
/// the time a task exists; the store enforces this at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Create a new pending task. Callers are responsible for id
    /// uniqueness and for trimming `text`.
    pub fn new(id: u64, text: String) -> Self {
        Task {
            id,
            text,
            completed: false,
        }
    }
}
