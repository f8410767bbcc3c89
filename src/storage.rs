//! Persistence adapter for the task store.
//!
//! The whole collection is written as one versioned JSON blob to a
//! fixed file name, overwriting the previous value on every save.
//! Loading is fail-soft: an absent file is an empty collection, and a
//! file that cannot be parsed starts the session empty with a warning
//! instead of refusing to start.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::task::Task;

/// File name of the store inside the app directory.
pub const STORE_FILE: &str = "tasks.json";

/// Current on-disk format version.
pub const STORE_VERSION: u32 = 1;

/// On-disk layout: the task array wrapped with a format version tag.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    tasks: Vec<Task>,
}

/// Result of loading the store file.
///
/// `warning` is set when the file existed but could not be used; the
/// caller decides where to surface it (stderr or the TUI status line).
#[derive(Debug, Default)]
pub struct Loaded {
    pub tasks: Vec<Task>,
    pub warning: Option<String>,
}

/// Load the task collection from `path`.
///
/// Accepts both the current versioned layout and a bare top-level task
/// array (the pre-versioning layout). Never returns an error: missing
/// data is an empty collection, unusable data is an empty collection
/// plus a warning.
pub fn load(path: &Path) -> Loaded {
    if !path.exists() {
        return Loaded::default();
    }
    let mut buf = String::new();
    if let Err(e) = File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
        return Loaded {
            tasks: Vec::new(),
            warning: Some(format!("could not read {}, starting empty: {e}", path.display())),
        };
    }
    match serde_json::from_str::<StoreFile>(&buf) {
        Ok(file) if file.version <= STORE_VERSION => Loaded {
            tasks: file.tasks,
            warning: None,
        },
        Ok(file) => Loaded {
            tasks: Vec::new(),
            warning: Some(format!(
                "{} uses format version {} (this build understands {}), starting empty",
                path.display(),
                file.version,
                STORE_VERSION
            )),
        },
        // Legacy layout: a bare array with no version wrapper.
        Err(_) => match serde_json::from_str::<Vec<Task>>(&buf) {
            Ok(tasks) => Loaded {
                tasks,
                warning: None,
            },
            Err(e) => Loaded {
                tasks: Vec::new(),
                warning: Some(format!(
                    "could not parse {}, starting empty: {e}",
                    path.display()
                )),
            },
        },
    }
}

/// Save the task collection to `path` using an atomic write
/// (temp file + rename), tagged with the current format version.
pub fn save(path: &Path, tasks: &[Task]) -> std::io::Result<()> {
    let file = StoreFile {
        version: STORE_VERSION,
        tasks: tasks.to_vec(),
    };
    let tmp = path.with_extension("json.tmp");
    let mut f = File::create(&tmp)?;
    let data = serde_json::to_string_pretty(&file).expect("task serialization cannot fail");
    f.write_all(data.as_bytes())?;
    f.flush()?;
    fs::rename(tmp, path)?;
    Ok(())
}

/// Copy the store file to a timestamped sibling and return its path.
pub fn create_backup(path: &Path) -> std::io::Result<PathBuf> {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("tasks");
    let backup = path.with_file_name(format!("{stem}_{stamp}.json"));
    fs::copy(path, &backup)?;
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn task(id: u64, text: &str, completed: bool) -> Task {
        Task {
            id,
            text: text.to_string(),
            completed,
        }
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let loaded = load(&dir.path().join(STORE_FILE));
        assert!(loaded.tasks.is_empty());
        assert!(loaded.warning.is_none());
    }

    #[test]
    fn round_trip_preserves_content_and_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        let tasks: Vec<Task> = (0..100)
            .map(|i| task(i + 1, &format!("task {i} — café naïve 日本語 ✓"), i % 3 == 0))
            .collect();
        save(&path, &tasks).unwrap();
        let loaded = load(&path);
        assert!(loaded.warning.is_none());
        assert_eq!(loaded.tasks, tasks);
    }

    #[test]
    fn round_trip_empty_collection() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        save(&path, &[]).unwrap();
        let loaded = load(&path);
        assert!(loaded.tasks.is_empty());
        assert!(loaded.warning.is_none());
    }

    #[test]
    fn save_overwrites_previous_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        save(&path, &[task(1, "old", false)]).unwrap();
        save(&path, &[task(2, "new", true)]).unwrap();
        let loaded = load(&path);
        assert_eq!(loaded.tasks, vec![task(2, "new", true)]);
    }

    #[test]
    fn load_accepts_legacy_bare_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        fs::write(
            &path,
            r#"[{"id": 7, "text": "Buy milk", "completed": true}]"#,
        )
        .unwrap();
        let loaded = load(&path);
        assert!(loaded.warning.is_none());
        assert_eq!(loaded.tasks, vec![task(7, "Buy milk", true)]);
    }

    #[test]
    fn load_malformed_file_warns_and_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        fs::write(&path, "{ not json").unwrap();
        let loaded = load(&path);
        assert!(loaded.tasks.is_empty());
        assert!(loaded.warning.is_some());
    }

    #[test]
    fn load_future_version_warns_and_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        fs::write(&path, r#"{"version": 99, "tasks": []}"#).unwrap();
        let loaded = load(&path);
        assert!(loaded.tasks.is_empty());
        assert!(loaded.warning.unwrap().contains("version 99"));
    }

    #[test]
    fn backup_copies_store_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        save(&path, &[task(1, "keep me", false)]).unwrap();
        let backup = create_backup(&path).unwrap();
        assert!(backup.exists());
        assert_ne!(backup, path);
        let loaded = load(&backup);
        assert_eq!(loaded.tasks, vec![task(1, "keep me", false)]);
    }
}
