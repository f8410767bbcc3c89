//! In-memory task store and its mutation operations.
//!
//! `TaskStore` owns the authoritative ordered collection of tasks and
//! writes the whole collection back to disk after every successful
//! mutation. Input validation happens here: task text is trimmed and
//! may never be empty. Lookups for an id that no longer exists are
//! silent no-ops, so a stale selection in the UI can never corrupt
//! state or crash.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::storage;
use crate::task::Task;

/// Validation failures surfaced to the user as short status messages.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("task text cannot be empty")]
    EmptyText,
}

/// Owns the task collection for one store file.
///
/// Ids come from a monotonic counter seeded with `max(id) + 1` at load
/// time, so they stay unique for the lifetime of the session no matter
/// how quickly tasks are added.
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
    path: PathBuf,
    write_warning: Option<String>,
}

impl TaskStore {
    /// Open the store at `path`, loading any persisted tasks.
    ///
    /// Returns the store and an optional warning from the load (e.g.
    /// an unreadable or malformed file that was replaced by an empty
    /// collection).
    pub fn open(path: &Path) -> (Self, Option<String>) {
        let loaded = storage::load(path);
        let next_id = loaded.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let store = TaskStore {
            tasks: loaded.tasks,
            next_id,
            path: path.to_path_buf(),
            write_warning: None,
        };
        (store, loaded.warning)
    }

    /// The current collection, in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Get a task by id.
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Add a new pending task from raw user text.
    ///
    /// The text is trimmed; if nothing remains the collection is left
    /// untouched and `StoreError::EmptyText` is returned. On success
    /// the new task is appended and its id returned.
    pub fn add(&mut self, raw_text: &str) -> Result<u64, StoreError> {
        let text = raw_text.trim();
        if text.is_empty() {
            return Err(StoreError::EmptyText);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.tasks.push(Task::new(id, text.to_string()));
        self.persist();
        Ok(id)
    }

    /// Flip the completion flag of the task with `id`.
    ///
    /// Returns whether a task was found; an absent id is a no-op.
    pub fn toggle(&mut self, id: u64) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        task.completed = !task.completed;
        self.persist();
        true
    }

    /// Replace the text of the task with `id`.
    ///
    /// The replacement is trimmed; if nothing remains the task is left
    /// unchanged and `StoreError::EmptyText` is returned. An absent id
    /// is a no-op returning `Ok(false)`.
    pub fn edit(&mut self, id: u64, raw_text: &str) -> Result<bool, StoreError> {
        let text = raw_text.trim();
        if text.is_empty() {
            return Err(StoreError::EmptyText);
        }
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        task.text = text.to_string();
        self.persist();
        Ok(true)
    }

    /// Remove the task with `id`. Idempotent: an absent id is a no-op
    /// returning `false`.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return false;
        }
        self.persist();
        true
    }

    /// Remove every task, returning how many were dropped. Asking the
    /// user first is the caller's job, not this one's.
    pub fn clear(&mut self) -> usize {
        let n = self.tasks.len();
        if n == 0 {
            return 0;
        }
        self.tasks.clear();
        self.persist();
        n
    }

    /// Take the warning from the most recent failed write, if any.
    ///
    /// A failed write never rolls back the in-memory mutation; the
    /// warning tells the user the change may not survive a restart.
    pub fn take_write_warning(&mut self) -> Option<String> {
        self.write_warning.take()
    }

    fn persist(&mut self) {
        if let Err(e) = storage::save(&self.path, &self.tasks) {
            self.write_warning = Some(format!(
                "could not save tasks to {}: {e}",
                self.path.display()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_empty(dir: &tempfile::TempDir) -> TaskStore {
        let (store, warning) = TaskStore::open(&dir.path().join(storage::STORE_FILE));
        assert!(warning.is_none());
        store
    }

    #[test]
    fn add_appends_trimmed_pending_task() {
        let dir = tempdir().unwrap();
        let mut store = open_empty(&dir);
        let id = store.add("  Buy milk  ").unwrap();
        assert_eq!(store.len(), 1);
        let task = store.get(id).unwrap();
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
    }

    #[test]
    fn add_rejects_empty_and_whitespace_text() {
        let dir = tempdir().unwrap();
        let mut store = open_empty(&dir);
        assert_eq!(store.add(""), Err(StoreError::EmptyText));
        assert_eq!(store.add("   "), Err(StoreError::EmptyText));
        assert!(store.is_empty());
    }

    #[test]
    fn ids_stay_unique_under_rapid_adds() {
        let dir = tempdir().unwrap();
        let mut store = open_empty(&dir);
        let ids: Vec<u64> = (0..50).map(|i| store.add(&format!("t{i}")).unwrap()).collect();
        let mut deduped = ids.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn id_counter_resumes_past_persisted_ids() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(storage::STORE_FILE);
        {
            let (mut store, _) = TaskStore::open(&path);
            store.add("first").unwrap();
            store.add("second").unwrap();
        }
        let (mut store, _) = TaskStore::open(&path);
        let id = store.add("third").unwrap();
        assert_eq!(id, 3);
    }

    #[test]
    fn toggle_flips_only_the_flag() {
        let dir = tempdir().unwrap();
        let mut store = open_empty(&dir);
        let id = store.add("call the bank").unwrap();
        assert!(store.toggle(id));
        let task = store.get(id).unwrap();
        assert!(task.completed);
        assert_eq!(task.text, "call the bank");
        assert_eq!(task.id, id);
    }

    #[test]
    fn toggle_twice_restores_original_state() {
        let dir = tempdir().unwrap();
        let mut store = open_empty(&dir);
        let id = store.add("water plants").unwrap();
        store.toggle(id);
        store.toggle(id);
        assert!(!store.get(id).unwrap().completed);
    }

    #[test]
    fn toggle_missing_id_is_a_noop() {
        let dir = tempdir().unwrap();
        let mut store = open_empty(&dir);
        store.add("only task").unwrap();
        assert!(!store.toggle(999));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn edit_replaces_text_and_keeps_completion() {
        let dir = tempdir().unwrap();
        let mut store = open_empty(&dir);
        let id = store.add("Buy milk").unwrap();
        store.toggle(id);
        assert_eq!(store.edit(id, "  Buy oat milk "), Ok(true));
        let task = store.get(id).unwrap();
        assert_eq!(task.text, "Buy oat milk");
        assert!(task.completed);
    }

    #[test]
    fn edit_rejects_empty_text_without_mutating() {
        let dir = tempdir().unwrap();
        let mut store = open_empty(&dir);
        let id = store.add("unchanged").unwrap();
        assert_eq!(store.edit(id, "   "), Err(StoreError::EmptyText));
        assert_eq!(store.get(id).unwrap().text, "unchanged");
    }

    #[test]
    fn edit_missing_id_is_a_noop() {
        let dir = tempdir().unwrap();
        let mut store = open_empty(&dir);
        assert_eq!(store.edit(42, "anything"), Ok(false));
        assert!(store.is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut store = open_empty(&dir);
        let id = store.add("one").unwrap();
        store.add("two").unwrap();
        assert!(store.remove(id));
        assert_eq!(store.len(), 1);
        assert!(!store.remove(id));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clear_empties_any_collection() {
        let dir = tempdir().unwrap();
        let mut store = open_empty(&dir);
        for i in 0..10 {
            store.add(&format!("task {i}")).unwrap();
        }
        assert_eq!(store.clear(), 10);
        assert!(store.is_empty());
        // Clearing an empty collection is a no-op.
        assert_eq!(store.clear(), 0);
    }

    #[test]
    fn mutations_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(storage::STORE_FILE);
        let id = {
            let (mut store, _) = TaskStore::open(&path);
            let id = store.add("persisted").unwrap();
            store.toggle(id);
            id
        };
        let (store, warning) = TaskStore::open(&path);
        assert!(warning.is_none());
        let task = store.get(id).unwrap();
        assert_eq!(task.text, "persisted");
        assert!(task.completed);
    }

    #[test]
    fn add_toggle_edit_delete_scenario() {
        let dir = tempdir().unwrap();
        let mut store = open_empty(&dir);

        let id = store.add("Buy milk").unwrap();
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].text, "Buy milk");
        assert!(!store.tasks()[0].completed);

        assert!(store.toggle(id));
        assert!(store.get(id).unwrap().completed);

        assert_eq!(store.edit(id, "Buy oat milk"), Ok(true));
        let task = store.get(id).unwrap();
        assert_eq!(task.text, "Buy oat milk");
        assert!(task.completed);

        assert!(store.remove(id));
        assert!(store.is_empty());
    }
}
