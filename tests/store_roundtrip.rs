//! Integration tests for the JSON-backed assignment store
//!
//! These drive the public store API against real files in a temporary
//! directory, including files written by hand or by older versions of the bot.

use assignments::assignment::parse_deadline;
use assignments::store::{self, AssignmentStore, Assignments};
use assignments::{AddedBy, AssignmentError, Result};
use std::fs;

fn setup_store() -> (tempfile::TempDir, AssignmentStore) {
    let temp = tempfile::TempDir::new().unwrap();
    let store = AssignmentStore::new(temp.path().join("data").join("assignments.json"));
    (temp, store)
}

#[test]
fn test_roundtrip_preserves_every_field() -> Result<()> {
    let (_temp, store) = setup_store();

    let mut assignments = Assignments::new();
    store::add(
        &mut assignments,
        "Essay",
        "2030-03-14 15:09",
        Some("Compare two poems"),
        Some(9),
        Some(AddedBy::Id(1364586484082016347)),
    )?;
    store::add(
        &mut assignments,
        "Lab report",
        "2029-11-02 08:00",
        None,
        None,
        Some(AddedBy::Name("alice".to_string())),
    )?;

    store.save(&assignments)?;
    let loaded = store.load()?;

    assert_eq!(loaded, assignments);
    assert_eq!(loaded["Essay"].priority.get(), 5);
    Ok(())
}

#[test]
fn test_load_file_written_by_older_version() -> Result<()> {
    let (_temp, store) = setup_store();
    fs::create_dir_all(store.path().parent().unwrap())?;
    fs::write(
        store.path(),
        r#"{
            "hw1": {"deadline": "2024-06-10T12:00:00", "details": "exercises 1-5"},
            "hw2": {
                "deadline": "2024-06-12T09:30:00",
                "details": "",
                "priority": 4,
                "added_by": 998877,
                "added_at": "2024-06-01T10:11:12.345678"
            }
        }"#,
    )?;

    let loaded = store.load()?;
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded["hw1"].deadline, parse_deadline("2024-06-10 12:00")?);
    assert_eq!(loaded["hw1"].priority.get(), 3);
    assert!(loaded["hw1"].added_by.is_none());
    assert_eq!(loaded["hw2"].added_by, Some(AddedBy::Id(998877)));
    assert!(loaded["hw2"].added_at.is_some());
    Ok(())
}

#[test]
fn test_load_hand_edited_timestamps_and_null_details() -> Result<()> {
    let (_temp, store) = setup_store();
    fs::create_dir_all(store.path().parent().unwrap())?;
    fs::write(
        store.path(),
        r#"{
            "spaced": {"deadline": "2024-06-10 12:00:00", "details": null},
            "short": {"deadline": "2024-06-10T12:00", "added_at": "2024-06-01 08:00"},
            "plain": {"deadline": "2024-06-10 12:00", "details": "ok"}
        }"#,
    )?;

    let loaded = store.load()?;
    let expected = parse_deadline("2024-06-10 12:00")?;
    assert_eq!(loaded.len(), 3);
    for name in ["spaced", "short", "plain"] {
        assert_eq!(loaded[name].deadline, expected, "{}", name);
    }
    assert_eq!(loaded["spaced"].details, "");
    assert_eq!(loaded["short"].added_at, Some(parse_deadline("2024-06-01 08:00")?));

    // Saving normalises everything back to the canonical ISO form.
    store.save(&loaded)?;
    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(store.path())?)?;
    assert_eq!(raw["spaced"]["deadline"], "2024-06-10T12:00:00");
    assert_eq!(raw["spaced"]["details"], "");
    Ok(())
}

#[test]
fn test_corrupt_file_is_reported_not_swallowed() -> Result<()> {
    let (_temp, store) = setup_store();
    fs::create_dir_all(store.path().parent().unwrap())?;
    fs::write(store.path(), "this is not json")?;

    match store.load() {
        Err(AssignmentError::CorruptStore { path, .. }) => assert_eq!(path, store.path()),
        other => panic!("expected CorruptStore, got {:?}", other),
    }
    assert!(store.corrupt_path().exists());
    Ok(())
}

#[test]
fn test_full_rewrite_after_each_mutation() -> Result<()> {
    let (_temp, store) = setup_store();

    let mut assignments = store.load()?;
    store::add(&mut assignments, "a", "2030-01-01 00:00", None, None, None)?;
    store::add(&mut assignments, "b", "2030-01-02 00:00", None, None, None)?;
    store.save(&assignments)?;

    let mut assignments = store.load()?;
    assert!(store::remove(&mut assignments, "a"));
    store.save(&assignments)?;

    let mut assignments = store.load()?;
    assert!(store::remove(&mut assignments, "b"));
    store.save(&assignments)?;

    // Removing everything leaves an empty object, not a missing file.
    assert!(store.path().exists());
    assert_eq!(fs::read_to_string(store.path())?.trim(), "{}");
    assert!(store.load()?.is_empty());
    Ok(())
}
