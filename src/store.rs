//! Assignment storage - JSON file persistence
//!
//! The whole mapping lives in one JSON object keyed by assignment name. It is
//! read fresh for every operation and rewritten in full after every mutation.

use chrono::{Local, NaiveDateTime};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::assignment::{parse_deadline, AddedBy, Assignment, Priority};
use crate::error::{AssignmentError, Result};

pub const DEFAULT_ASSIGNMENTS_FILE: &str = "data/assignments.json";

/// Name → assignment. Iteration order is by name.
pub type Assignments = BTreeMap<String, Assignment>;

#[derive(Debug, Clone)]
pub struct AssignmentStore {
    path: PathBuf,
}

impl AssignmentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name: OsString = self.path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }

    pub fn backup_path(&self) -> PathBuf {
        self.sibling(".bak")
    }

    pub fn corrupt_path(&self) -> PathBuf {
        self.sibling(".corrupt")
    }

    fn data_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn ensure_data_dir(&self) -> Result<()> {
        fs::create_dir_all(self.data_dir())?;
        Ok(())
    }

    /// Load the full mapping. A missing or blank file is an empty store; a file
    /// that is not a valid mapping is copied aside and reported as
    /// [`AssignmentError::CorruptStore`].
    pub fn load(&self) -> Result<Assignments> {
        self.ensure_data_dir()?;
        if !self.path.exists() {
            return Ok(Assignments::new());
        }

        let content = fs::read(&self.path)?;
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Assignments::new());
        }

        match serde_json::from_slice::<Assignments>(&content) {
            Ok(assignments) => {
                debug!(
                    "Loaded {} assignments from {}",
                    assignments.len(),
                    self.path.display()
                );
                Ok(assignments)
            }
            Err(source) => {
                let corrupt = self.corrupt_path();
                match fs::copy(&self.path, &corrupt) {
                    Ok(_) => warn!(
                        "Assignment store {} is corrupt, copied to {}: {}",
                        self.path.display(),
                        corrupt.display(),
                        source
                    ),
                    Err(e) => warn!(
                        "Assignment store {} is corrupt and could not be copied aside: {}",
                        self.path.display(),
                        e
                    ),
                }
                Err(AssignmentError::CorruptStore {
                    path: self.path.clone(),
                    source,
                })
            }
        }
    }

    /// Like [`load`](Self::load), but a corrupt file reads as an empty store.
    /// The corrupt copy is still kept next to the original.
    pub fn load_or_default(&self) -> Result<Assignments> {
        match self.load() {
            Err(AssignmentError::CorruptStore { .. }) => Ok(Assignments::new()),
            other => other,
        }
    }

    /// Rewrite the backing file with the full mapping. The previous contents are
    /// kept as a `.bak` sibling and the new contents are renamed into place.
    pub fn save(&self, assignments: &Assignments) -> Result<()> {
        self.ensure_data_dir()?;

        if self.path.exists() {
            if let Err(e) = fs::copy(&self.path, self.backup_path()) {
                warn!("Failed to create backup: {}", e);
            }
        }

        let content = serde_json::to_string_pretty(assignments)?;
        let mut tmp = NamedTempFile::new_in(self.data_dir())?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!(
            "Saved {} assignments to {}",
            assignments.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Insert (or overwrite) an assignment under `name`, stamped with the current
/// local time. The caller persists the mapping.
pub fn add(
    assignments: &mut Assignments,
    name: &str,
    deadline: &str,
    details: Option<&str>,
    priority: Option<i64>,
    added_by: Option<AddedBy>,
) -> Result<Assignment> {
    add_at(
        assignments,
        name,
        deadline,
        details,
        priority,
        added_by,
        Local::now().naive_local(),
    )
}

pub fn add_at(
    assignments: &mut Assignments,
    name: &str,
    deadline: &str,
    details: Option<&str>,
    priority: Option<i64>,
    added_by: Option<AddedBy>,
    now: NaiveDateTime,
) -> Result<Assignment> {
    let deadline = parse_deadline(deadline)?;
    let priority = priority.map(Priority::new).unwrap_or_default();
    let assignment = Assignment::new(deadline, details.unwrap_or_default(), priority, added_by, now);

    if assignments
        .insert(name.to_string(), assignment.clone())
        .is_some()
    {
        info!("Overwrote assignment '{}'", name);
    } else {
        info!("Added assignment '{}'", name);
    }
    Ok(assignment)
}

/// Remove `name`, returning whether it was present. The caller persists the mapping.
pub fn remove(assignments: &mut Assignments, name: &str) -> bool {
    let existed = assignments.remove(name).is_some();
    if existed {
        info!("Removed assignment '{}'", name);
    }
    existed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &Path) -> AssignmentStore {
        AssignmentStore::new(dir.join("data").join("assignments.json"))
    }

    #[test]
    fn test_load_missing_file_creates_dir_and_returns_empty() -> Result<()> {
        let temp = tempdir()?;
        let store = store_in(temp.path());

        let loaded = store.load()?;
        assert!(loaded.is_empty());
        assert!(temp.path().join("data").is_dir());
        assert!(!store.path().exists());
        Ok(())
    }

    #[test]
    fn test_load_whitespace_only_file() -> Result<()> {
        let temp = tempdir()?;
        let store = store_in(temp.path());
        fs::create_dir_all(temp.path().join("data"))?;
        fs::write(store.path(), "   \n  \t  ")?;

        assert!(store.load()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_corrupt_file_reports_and_keeps_copy() -> Result<()> {
        let temp = tempdir()?;
        let store = store_in(temp.path());
        fs::create_dir_all(temp.path().join("data"))?;
        fs::write(store.path(), "{ not json")?;

        let err = store.load().unwrap_err();
        assert!(matches!(err, AssignmentError::CorruptStore { .. }));
        assert_eq!(fs::read_to_string(store.corrupt_path())?, "{ not json");
        // Original is left in place for manual recovery.
        assert_eq!(fs::read_to_string(store.path())?, "{ not json");
        Ok(())
    }

    #[test]
    fn test_load_wrong_shape_is_corrupt() -> Result<()> {
        let temp = tempdir()?;
        let store = store_in(temp.path());
        fs::create_dir_all(temp.path().join("data"))?;
        fs::write(store.path(), "[1, 2, 3]")?;

        assert!(matches!(
            store.load(),
            Err(AssignmentError::CorruptStore { .. })
        ));
        assert!(store.load_or_default()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_save_creates_backup_of_previous_contents() -> Result<()> {
        let temp = tempdir()?;
        let store = store_in(temp.path());

        let mut assignments = Assignments::new();
        add(&mut assignments, "first", "2030-01-01 09:00", None, None, None)?;
        store.save(&assignments)?;
        let first_contents = fs::read_to_string(store.path())?;

        add(&mut assignments, "second", "2030-01-02 09:00", None, None, None)?;
        store.save(&assignments)?;

        assert_eq!(fs::read_to_string(store.backup_path())?, first_contents);
        assert_eq!(store.load()?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_save_writes_iso_timestamps() -> Result<()> {
        let temp = tempdir()?;
        let store = store_in(temp.path());

        let mut assignments = Assignments::new();
        add(&mut assignments, "essay", "2030-01-01 09:00", Some("5 pages"), Some(2), None)?;
        store.save(&assignments)?;

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(store.path())?)?;
        assert_eq!(raw["essay"]["deadline"], "2030-01-01T09:00:00");
        assert_eq!(raw["essay"]["details"], "5 pages");
        assert_eq!(raw["essay"]["priority"], 2);
        Ok(())
    }

    #[test]
    fn test_add_clamps_priority() -> Result<()> {
        let mut assignments = Assignments::new();
        assert_eq!(add(&mut assignments, "a", "2030-01-01 09:00", None, Some(0), None)?.priority.get(), 1);
        assert_eq!(add(&mut assignments, "b", "2030-01-01 09:00", None, Some(9), None)?.priority.get(), 5);
        assert_eq!(add(&mut assignments, "c", "2030-01-01 09:00", None, Some(3), None)?.priority.get(), 3);
        assert_eq!(add(&mut assignments, "d", "2030-01-01 09:00", None, None, None)?.priority.get(), 3);
        Ok(())
    }

    #[test]
    fn test_add_overwrites_existing_name() -> Result<()> {
        let mut assignments = Assignments::new();
        add(&mut assignments, "X", "2030-01-01 09:00", None, None, None)?;
        add(&mut assignments, "X", "2031-02-02 10:00", None, None, None)?;

        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments["X"].deadline, parse_deadline("2031-02-02 10:00")?);
        Ok(())
    }

    #[test]
    fn test_add_invalid_deadline_leaves_mapping_untouched() {
        let mut assignments = Assignments::new();
        let result = add(&mut assignments, "X", "next friday", None, None, None);
        assert!(matches!(result, Err(AssignmentError::InvalidDeadline(_))));
        assert!(assignments.is_empty());
    }

    #[test]
    fn test_add_accepts_empty_name_and_details() -> Result<()> {
        let mut assignments = Assignments::new();
        let stored = add(&mut assignments, "", "2030-01-01 09:00", Some(""), None, None)?;
        assert_eq!(stored.details, "");
        assert!(assignments.contains_key(""));
        Ok(())
    }

    #[test]
    fn test_add_at_stamps_creation_time_and_author() -> Result<()> {
        let now = parse_deadline("2024-06-01 12:00")?;
        let mut assignments = Assignments::new();
        let stored = add_at(
            &mut assignments,
            "lab",
            "2024-06-03 12:00",
            None,
            None,
            Some(AddedBy::Id(42)),
            now,
        )?;
        assert_eq!(stored.added_at, Some(now));
        assert_eq!(stored.added_by, Some(AddedBy::Id(42)));
        Ok(())
    }

    #[test]
    fn test_remove_twice() -> Result<()> {
        let mut assignments = Assignments::new();
        add(&mut assignments, "X", "2030-01-01 09:00", None, None, None)?;
        assert!(remove(&mut assignments, "X"));
        assert!(!remove(&mut assignments, "X"));
        Ok(())
    }

    #[test]
    fn test_names_are_case_sensitive() -> Result<()> {
        let mut assignments = Assignments::new();
        add(&mut assignments, "Essay", "2030-01-01 09:00", None, None, None)?;
        assert!(!remove(&mut assignments, "essay"));
        assert_eq!(assignments.len(), 1);
        Ok(())
    }
}
